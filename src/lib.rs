//! Core library for the course-tally command line application.
//!
//! The library turns a batch of per-student enrollment workbooks into a
//! single course summary. IO adapters live under [`io`], the table types in
//! [`model`], the per-file reduction and cross-file merge in [`aggregate`],
//! the category split and sheet layout in [`report`], and the orchestration
//! that ties them together under [`pipeline`].

pub mod aggregate;
pub mod error;
pub mod io;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod report;

pub use error::{Result, ToolError};

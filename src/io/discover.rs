use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, ToolError};

/// Lists the `.xlsx` workbooks directly inside `folder`, sorted by name.
///
/// Fails with [`ToolError::MissingFolder`] when the folder does not exist and
/// with [`ToolError::MissingInput`] when it holds no workbook.
pub fn find_workbooks(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.exists() {
        return Err(ToolError::MissingFolder(folder.to_path_buf()));
    }

    let mut workbooks = Vec::new();
    for entry in fs::read_dir(folder)? {
        let path = entry?.path();
        if path.is_file() && is_workbook(&path) {
            workbooks.push(path);
        }
    }
    workbooks.sort();

    debug!(folder = %folder.display(), count = workbooks.len(), "workbooks found");
    if workbooks.is_empty() {
        return Err(ToolError::MissingInput(folder.to_path_buf()));
    }
    Ok(workbooks)
}

/// True for names of the form `<something>.xlsx`, ignoring case.
pub fn is_workbook(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .is_some_and(|name| name.len() > ".xlsx".len() && name.ends_with(".xlsx"))
}

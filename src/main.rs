use std::path::PathBuf;

use clap::{Parser, Subcommand};
use course_tally::io::discover;
use course_tally::{Result, logging, pipeline};

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    logging::init(cli.verbose)?;
    match cli.command {
        Command::Aggregate(args) => execute_aggregate(args),
        Command::List(args) => execute_list(args),
    }
}

fn execute_aggregate(args: AggregateArgs) -> Result<()> {
    let paths = match &args.input {
        Some(folder) => discover::find_workbooks(folder)?,
        None => args.files.clone(),
    };

    let table = pipeline::aggregate_workbooks(&paths)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&table)?);
    }

    let output = pipeline::write_report(&table, args.output.as_deref())?;
    println!("Data saved to {}", output.display());
    Ok(())
}

fn execute_list(args: ListArgs) -> Result<()> {
    let workbooks = discover::find_workbooks(&args.input)?;
    println!("Files Selected: {}", workbooks.len());
    for path in &workbooks {
        if let Some(name) = path.file_name() {
            println!("{}", name.to_string_lossy());
        }
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Summarise per-student course enrollment workbooks into one report."
)]
struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Aggregate workbooks into the General Education / Major & Elective report.
    Aggregate(AggregateArgs),
    /// Show the workbooks a folder would contribute.
    List(ListArgs),
}

#[derive(clap::Args)]
struct AggregateArgs {
    /// Folder scanned for `.xlsx` workbooks.
    #[arg(long, conflicts_with = "files", required_unless_present = "files")]
    input: Option<PathBuf>,

    /// Explicit workbook path. May be repeated instead of `--input`.
    #[arg(long = "file", value_name = "PATH")]
    files: Vec<PathBuf>,

    /// Report file (`*.xlsx`) or directory. Defaults to `output/result.xlsx`.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Also print the aggregated table as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
struct ListArgs {
    /// Folder scanned for `.xlsx` workbooks.
    #[arg(long)]
    input: PathBuf,
}

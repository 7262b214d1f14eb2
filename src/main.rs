use clap::{Parser, Subcommand};
use sheet_expand::cli::{self, JobArgs};
use sheet_expand::error::ExpandResult;
use sheet_expand::preview::DEFAULT_PREVIEW_ROWS;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sheet-expand")]
#[command(about = "Expand dated observations into per-state rows with external workbook references.")]
#[command(long_about = "sheet-expand - spreadsheet row expander

Reads the date and week-number columns of a workbook, repeats every date
N times, assigns STATES labels cyclically and writes VALOR/PERCENT cells as
references into an external workbook (=[book.xlsx]sheet!$C$4).

COMMANDS:
  expand   - Expand a workbook into dados_expandido.xlsx
  preview  - Show the first rows of the expansion
  labels   - Show/edit the STATES label list
  init     - Write a default YAML job file

EXAMPLES:
  sheet-expand expand datas.xlsx out.xlsx                 # Defaults
  sheet-expand expand datas.xlsx out.xlsx -c job.yaml -r 12
  sheet-expand preview datas.xlsx --value-range C:R --rows 20
  sheet-expand labels --file states.txt --add Others")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Expand a workbook and save the result.

Each non-empty date is repeated --repetitions times. STATES cycles through
the label list; VALOR and PERCENT walk their column ranges left to right
and move one row down after each full pass.

Options override the job file given with --config, which overrides the
built-in defaults (sheet 'datas', dates in column 3, weeks in column 2,
17 repetitions, VALOR C:S, PERCENT W:AM, base rows 4).")]
    /// Expand a workbook into the output .xlsx
    Expand {
        /// Input workbook (.xlsx, .xls, .ods)
        input: PathBuf,

        /// Output workbook (.xlsx)
        output: PathBuf,

        #[command(flatten)]
        job: JobArgs,

        /// Print the resolved job without reading or writing workbooks
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show verbose steps
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the first rows of an expansion without writing a file
    Preview {
        /// Input workbook (.xlsx, .xls, .ods)
        input: PathBuf,

        #[command(flatten)]
        job: JobArgs,

        /// Number of rows to show
        #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
        rows: usize,
    },

    /// Show the STATES label list after applying edits
    Labels {
        /// Start from a text file (one label per line) instead of the defaults
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Append a label (repeatable)
        #[arg(short, long)]
        add: Vec<String>,

        /// Start from the default list
        #[arg(long)]
        reset: bool,
    },

    /// Write a default YAML job file
    Init {
        /// Path of the job file to create
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> ExpandResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Expand {
            input,
            output,
            job,
            dry_run,
            verbose,
        } => cli::expand(input, output, job, dry_run, verbose),

        Commands::Preview { input, job, rows } => cli::preview(input, job, rows),

        Commands::Labels { file, add, reset } => cli::labels(file, add, reset),

        Commands::Init { path, force } => cli::init(path, force),
    }
}

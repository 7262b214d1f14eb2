use crate::config::JobConfig;
use crate::core::columns::ColumnRange;
use crate::core::dates::OnParseError;
use crate::error::{ExpandError, ExpandResult};
use crate::excel::OutputWriter;
use crate::job;
use crate::labels as label_list;
use crate::preview::Preview;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

/// Job options shared by `expand` and `preview`.
///
/// Values given here override the job file (`--config`), which in turn
/// overrides the built-in defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct JobArgs {
    /// YAML job file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Sheet holding the dates and week numbers
    #[arg(long)]
    pub sheet: Option<String>,

    /// 1-based column index of the dates
    #[arg(long)]
    pub date_column: Option<usize>,

    /// 1-based column index of the week numbers
    #[arg(long)]
    pub week_column: Option<usize>,

    /// Leading sheet rows to ignore
    #[arg(long)]
    pub skip_rows: Option<usize>,

    /// Output rows per source date
    #[arg(short, long)]
    pub repetitions: Option<usize>,

    /// Total output rows (default: dates x repetitions)
    #[arg(long)]
    pub total_rows: Option<usize>,

    /// Sheet name used inside the generated references
    #[arg(short, long)]
    pub target_sheet: Option<String>,

    /// Workbook file name used inside the generated references
    #[arg(long)]
    pub external_workbook: Option<String>,

    /// VALOR column range, e.g. C:S
    #[arg(long)]
    pub value_range: Option<ColumnRange>,

    /// PERCENT column range, e.g. W:AM
    #[arg(long)]
    pub percent_range: Option<ColumnRange>,

    /// First sheet row referenced by VALOR
    #[arg(long)]
    pub value_base_row: Option<u32>,

    /// First sheet row referenced by PERCENT
    #[arg(long)]
    pub percent_base_row: Option<u32>,

    /// Text file with one STATES label per line
    #[arg(short, long)]
    pub labels: Option<PathBuf>,

    /// Fail on dates without a readable year instead of leaving YEAR blank
    #[arg(long)]
    pub strict_dates: bool,
}

impl JobArgs {
    /// Load the job file (if any) and apply the command-line overrides
    pub fn resolve(&self) -> ExpandResult<JobConfig> {
        let mut config = match &self.config {
            Some(path) => JobConfig::load(path)?,
            None => JobConfig::default(),
        };

        let source = &mut config.source;
        if let Some(sheet) = &self.sheet {
            source.sheet = sheet.clone();
        }
        if let Some(col) = self.date_column {
            source.date_column = col;
        }
        if let Some(col) = self.week_column {
            source.week_column = col;
        }
        if let Some(rows) = self.skip_rows {
            source.skip_rows = rows;
        }

        let expansion = &mut config.expansion;
        if let Some(reps) = self.repetitions {
            expansion.repetitions = reps;
        }
        if self.total_rows.is_some() {
            expansion.total_rows = self.total_rows;
        }
        if let Some(sheet) = &self.target_sheet {
            expansion.target_sheet_name = sheet.clone();
        }
        if let Some(workbook) = &self.external_workbook {
            expansion.external_workbook = workbook.clone();
        }
        if let Some(range) = &self.value_range {
            expansion.value_range = range.clone();
        }
        if let Some(range) = &self.percent_range {
            expansion.percent_range = range.clone();
        }
        if let Some(row) = self.value_base_row {
            expansion.value_base_row = row;
        }
        if let Some(row) = self.percent_base_row {
            expansion.percent_base_row = row;
        }
        if let Some(file) = &self.labels {
            // A file on the command line replaces whatever the job file had
            expansion.labels = Some(label_list::import_labels(file)?);
        }
        if self.strict_dates {
            expansion.on_parse_error = OnParseError::Fail;
        }

        Ok(config)
    }
}

/// Execute the expand command
pub fn expand(
    input: PathBuf,
    output: PathBuf,
    args: JobArgs,
    dry_run: bool,
    verbose: bool,
) -> ExpandResult<()> {
    println!("{}", "📊 sheet-expand - Expanding rows".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}\n", output.display());

    if dry_run {
        println!(
            "{}",
            "📋 DRY RUN MODE - No workbook will be read or written\n".yellow()
        );
        return show_job(&args);
    }

    let config = args.resolve()?;

    if verbose {
        print_job(&config);
    }

    let result = job::run_file(&input, &config)?;

    if verbose {
        println!("{}", "💾 Writing workbook...".cyan());
    }

    OutputWriter::new().save(&result.table, &output)?;

    println!("{}", "✅ Expansion Complete!".bold().green());
    println!("   Rows generated: {}", result.total_rows);
    println!("   States: {}", result.label_count);
    println!("   Excel file: {}\n", output.display());

    Ok(())
}

/// Execute the preview command
pub fn preview(input: PathBuf, args: JobArgs, rows: usize) -> ExpandResult<()> {
    println!("{}", "🔍 sheet-expand - Preview".bold().green());
    println!("   Input: {}\n", input.display());

    let config = args.resolve()?;
    let result = job::run_file(&input, &config)?;
    let preview = Preview::from_table(
        &result.table,
        result.total_rows,
        result.label_count,
        rows,
    );

    print!("{}", preview.render());
    println!();
    println!("   Total rows generated: {}", preview.total_rows);
    println!("   Total states: {}", preview.label_count);

    Ok(())
}

/// Execute the labels command: show the list after applying the edits
pub fn labels(file: Option<PathBuf>, add: Vec<String>, reset: bool) -> ExpandResult<()> {
    let mut list = match (&file, reset) {
        (_, true) => label_list::reset_labels(),
        (Some(path), false) => label_list::import_labels(path)?,
        (None, false) => label_list::default_labels(),
    };
    for label in &add {
        list = label_list::add_label(&list, label);
    }

    println!(
        "{}",
        format!("🏷️  States configured ({}):", list.len()).bold().green()
    );
    for label in &list {
        println!("{}", label);
    }
    println!();
    println!(
        "   {}",
        label_list::summarize(&list, label_list::SUMMARY_MAX_CHARS).dimmed()
    );

    Ok(())
}

/// Execute the init command: write the default job file
pub fn init(path: PathBuf, force: bool) -> ExpandResult<()> {
    if path.exists() && !force {
        return Err(ExpandError::InvalidParameter(format!(
            "'{}' already exists (use --force to overwrite)",
            path.display()
        )));
    }

    JobConfig::write_default(&path)?;

    println!("{}", "✅ Job file written".bold().green());
    println!("   {}", path.display());
    Ok(())
}

fn print_job(config: &JobConfig) {
    let source = &config.source;
    let expansion = &config.expansion;
    println!("{}", "📖 Job:".cyan());
    println!(
        "   Sheet: {} (dates: column {}, weeks: column {})",
        source.sheet.bright_blue(),
        source.date_column,
        source.week_column
    );
    println!("   Repetitions: {}", expansion.repetitions);
    if let Some(total) = expansion.total_rows {
        println!("   Total rows: {}", total);
    }
    println!(
        "   VALOR: {} from row {}",
        expansion.value_range, expansion.value_base_row
    );
    println!(
        "   PERCENT: {} from row {}",
        expansion.percent_range, expansion.percent_base_row
    );
    println!(
        "   References: [{}]{}",
        expansion.external_workbook, expansion.target_sheet_name
    );
    println!();
}

/// Resolve the job without touching the input workbook (used by `--dry-run`)
pub fn show_job(args: &JobArgs) -> ExpandResult<()> {
    let config = args.resolve()?;
    print_job(&config);
    let params = config.params()?;
    println!(
        "   States: {}",
        label_list::summarize(&params.labels, label_list::SUMMARY_MAX_CHARS)
    );
    Ok(())
}

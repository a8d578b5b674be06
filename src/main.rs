//! CLI entry point for inspecting a course-completion CSV.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use course_insight::{MetricOp, SummaryEngine};
use tracing::info;

/// CLI-compatible metric op enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliMetricOp {
    /// Mean of non-null values
    Mean,
    /// Sum of non-null values
    Sum,
    /// Number of non-null values
    Count,
    /// Fraction of non-null values that are truthy/nonzero
    Ratio,
}

impl From<CliMetricOp> for MetricOp {
    fn from(cli: CliMetricOp) -> Self {
        match cli {
            CliMetricOp::Mean => MetricOp::Mean,
            CliMetricOp::Sum => MetricOp::Sum,
            CliMetricOp::Count => MetricOp::Count,
            CliMetricOp::Ratio => MetricOp::Ratio,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Tabular summary engine for course completion analytics",
    long_about = "Inspect a course-completion CSV: descriptive statistics, frequency\n\
                  tables, missing value reports, correlations, and per-group metrics.\n\n\
                  EXAMPLES:\n  \
                  # Column overview\n  \
                  course-insight -i courses.csv\n\n  \
                  # Describe all numeric columns\n  \
                  course-insight -i courses.csv --describe\n\n  \
                  # Mean completion for one course\n  \
                  course-insight -i courses.csv --group-column course_id --key C-101 \\\n      \
                  --metric-column completion --op mean\n\n  \
                  # Machine-readable output\n  \
                  course-insight -i courses.csv --missing-report --json | jq .counts"
)]
struct Args {
    /// Path to the CSV file to inspect
    #[arg(short, long)]
    input: String,

    /// List the distinct values of a column (selection list)
    #[arg(long, value_name = "COLUMN")]
    list: Option<String>,

    /// Print descriptive statistics for numeric columns
    #[arg(long)]
    describe: bool,

    /// Print a frequency table for a column
    #[arg(long, value_name = "COLUMN")]
    value_counts: Option<String>,

    /// Print per-column null counts
    #[arg(long)]
    missing_report: bool,

    /// Print a Pearson correlation matrix over numeric columns
    #[arg(long)]
    correlations: bool,

    /// Restrict --describe/--correlations to these columns
    #[arg(long, value_delimiter = ',', value_name = "COLUMNS")]
    columns: Option<Vec<String>>,

    /// Grouping column for --key/--metric-column
    #[arg(long)]
    group_column: Option<String>,

    /// Group key to select (a value of --group-column)
    #[arg(long)]
    key: Option<String>,

    /// Column to aggregate within the selected group
    #[arg(long)]
    metric_column: Option<String>,

    /// Aggregation to apply within the selected group
    #[arg(long, value_enum, default_value = "mean")]
    op: CliMetricOp,

    /// Output JSON to stdout instead of human-readable tables
    ///
    /// Disables all logs so stdout contains only JSON.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled so stdout
/// carries only JSON.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    if !std::path::Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let engine = SummaryEngine::load(&args.input)?;
    info!(
        "Loaded {} rows x {} columns",
        engine.dataset().row_count(),
        engine.columns().len()
    );

    let mut ran_query = false;

    if let Some(ref column) = args.list {
        run_list(&engine, column, args.json)?;
        ran_query = true;
    }

    if args.describe {
        run_describe(&engine, &args)?;
        ran_query = true;
    }

    if let Some(ref column) = args.value_counts {
        run_value_counts(&engine, column, args.json)?;
        ran_query = true;
    }

    if args.missing_report {
        run_missing_report(&engine, args.json)?;
        ran_query = true;
    }

    if args.correlations {
        run_correlations(&engine, &args)?;
        ran_query = true;
    }

    if args.group_column.is_some() || args.key.is_some() || args.metric_column.is_some() {
        run_group_metric(&engine, &args)?;
        ran_query = true;
    }

    if !ran_query {
        print_overview(&engine, &args);
    }

    Ok(())
}

fn run_list(engine: &SummaryEngine, column: &str, json: bool) -> Result<()> {
    let values = engine.list_values(column)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&values)?);
    } else {
        println!("{} distinct values of '{}':", values.len(), column);
        for value in &values {
            println!("  {}", value);
        }
    }
    Ok(())
}

fn run_describe(engine: &SummaryEngine, args: &Args) -> Result<()> {
    let columns = requested_columns(engine, args);
    let refs: Vec<&str> = columns.iter().map(String::as_str).collect();
    let table = engine.describe(&refs)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    println!(
        "{:<28} {:>7} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "Column", "Count", "Mean", "Std", "Min", "25%", "50%", "75%", "Max"
    );
    println!("{}", "-".repeat(110));
    for row in &table.rows {
        let s = &row.stats;
        println!(
            "{:<28} {:>7} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
            truncate_str(&row.column, 27),
            s.count,
            s.mean,
            s.std,
            s.min,
            s.q25,
            s.median,
            s.q75,
            s.max
        );
    }
    Ok(())
}

fn run_value_counts(engine: &SummaryEngine, column: &str, json: bool) -> Result<()> {
    let table = engine.value_counts(column)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    println!("Value counts for '{}' ({} non-null rows):", column, table.total);
    println!("{:<30} {:>10}", "Value", "Count");
    println!("{}", "-".repeat(41));
    for entry in &table.entries {
        println!("{:<30} {:>10}", truncate_str(&entry.value, 29), entry.count);
    }
    Ok(())
}

fn run_missing_report(engine: &SummaryEngine, json: bool) -> Result<()> {
    let report = engine.missing_report()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{:<30} {:>10}", "Column", "Nulls");
    println!("{}", "-".repeat(41));
    for count in &report.counts {
        println!("{:<30} {:>10}", truncate_str(&count.column, 29), count.nulls);
    }
    println!("{}", "-".repeat(41));
    println!("{:<30} {:>10}", "Total", report.total());
    Ok(())
}

fn run_correlations(engine: &SummaryEngine, args: &Args) -> Result<()> {
    let columns = requested_columns(engine, args);
    let refs: Vec<&str> = columns.iter().map(String::as_str).collect();
    let matrix = engine.correlation_matrix(&refs)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&matrix)?);
        return Ok(());
    }

    print!("{:<20}", "");
    for column in &matrix.columns {
        print!(" {:>12}", truncate_str(column, 12));
    }
    println!();
    for (i, column) in matrix.columns.iter().enumerate() {
        print!("{:<20}", truncate_str(column, 19));
        for value in &matrix.values[i] {
            print!(" {:>12.4}", value);
        }
        println!();
    }
    Ok(())
}

fn run_group_metric(engine: &SummaryEngine, args: &Args) -> Result<()> {
    let group_column = args
        .group_column
        .as_deref()
        .ok_or_else(|| anyhow!("--group-column is required for group metrics"))?;
    let key = args
        .key
        .as_deref()
        .ok_or_else(|| anyhow!("--key is required for group metrics"))?;
    let metric_column = args
        .metric_column
        .as_deref()
        .ok_or_else(|| anyhow!("--metric-column is required for group metrics"))?;

    let op: MetricOp = args.op.into();
    let value = engine.group_metric(group_column, key, metric_column, op)?;

    if args.json {
        println!(
            "{}",
            serde_json::json!({
                "group_column": group_column,
                "key": key,
                "metric_column": metric_column,
                "op": op,
                "value": value,
            })
        );
    } else {
        println!(
            "{}({}) for {}='{}': {:.6}",
            op, metric_column, group_column, key, value
        );
    }
    Ok(())
}

/// Columns for --describe/--correlations: the --columns list if given,
/// otherwise every numeric column.
fn requested_columns(engine: &SummaryEngine, args: &Args) -> Vec<String> {
    match &args.columns {
        Some(columns) => columns.clone(),
        None => engine
            .numeric_columns()
            .into_iter()
            .map(str::to_string)
            .collect(),
    }
}

/// Default output with no query flags: the column table.
///
/// Uses `println!` intentionally; this is the primary output, not a log.
fn print_overview(engine: &SummaryEngine, args: &Args) {
    println!("Dataset: {}", args.input);
    println!(
        "Shape: {} rows x {} columns",
        engine.dataset().row_count(),
        engine.columns().len()
    );
    println!();
    println!("{:<28} {:<12} {:<8}", "Column", "Kind", "Nullable");
    println!("{}", "-".repeat(50));
    for descriptor in engine.columns() {
        println!(
            "{:<28} {:<12} {:<8}",
            truncate_str(&descriptor.name, 27),
            descriptor.kind.to_string(),
            if descriptor.nullable { "yes" } else { "no" }
        );
    }
    println!();
    println!("Use --describe, --value-counts, --missing-report, or --correlations");
}

/// Truncate a string to max length with ellipsis. Counts characters, not
/// bytes, so multibyte column names never split mid-character.
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

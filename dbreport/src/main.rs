//! SQLite schema report tool.
//!
//! Reads the catalog of one SQLite database file and writes a Markdown
//! report describing its tables, columns, indexes, foreign keys, views and
//! triggers, then prints a short summary to the console.

mod output;

use clap::{Parser, ValueEnum};
use dbreport_core::{
    DatabaseSchema, OutputFormat, ReportConfig, Result, SqliteCollector,
    config::{DEFAULT_DATABASE_PATH, DEFAULT_OUTPUT_PATH},
    init_logging, render,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Command-line interface for the report tool
#[derive(Parser, Debug)]
#[command(name = "dbreport")]
#[command(about = "SQLite schema documentation generator")]
#[command(version)]
#[command(long_about = "
dbreport - SQLite catalog report

Reads tables, columns, indexes, foreign keys, views and triggers from a
SQLite database file and writes them as a Markdown document.

The database is opened read-only; only SELECT and PRAGMA statements run.

EXAMPLES:
  dbreport
  dbreport --database data/stocks.db --output db.md
  dbreport --database app.sqlite --format json --output app.json
")]
struct Cli {
    /// SQLite database file to inspect
    #[arg(long, env = "DBREPORT_DATABASE", default_value = DEFAULT_DATABASE_PATH)]
    database: PathBuf,

    /// Report file to write (overwritten)
    #[arg(short, long, env = "DBREPORT_OUTPUT", default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = Format::Markdown)]
    format: Format,

    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase log verbosity (-v, -vv, -vvv)"
    )]
    verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Only log errors")]
    quiet: bool,
}

/// Available output formats
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    /// Markdown documentation
    Markdown,
    /// JSON structured output
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Markdown => Self::Markdown,
            Format::Json => Self::Json,
        }
    }
}

impl Cli {
    fn report_config(&self) -> ReportConfig {
        ReportConfig::new(&self.database)
            .with_output_path(&self.output)
            .with_format(self.format.into())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("错误: {:#}", anyhow::Error::new(e));
            ExitCode::FAILURE
        }
    }
}

/// Collects, renders and writes the report, then prints the summary.
async fn run(cli: &Cli) -> Result<()> {
    init_logging(cli.verbose, cli.quiet)?;

    let config = cli.report_config();
    config.validate()?;

    println!("正在分析数据库: {}", config.database_path.display());

    let schema = SqliteCollector::new(config.clone()).collect().await?;
    println!("数据库分析完成，共发现 {} 个表", schema.table_count());

    let generated_at = chrono::Local::now().naive_local();
    let contents = render::render(&schema, config.format, generated_at)?;
    output::save_report(&contents, &config.output_path).await?;

    println!("元数据已导出到: {}", config.output_path.display());
    print_summary(&schema);

    Ok(())
}

fn print_summary(schema: &DatabaseSchema) {
    let summary = schema.summary();
    println!();
    println!("数据库摘要:");
    println!("- 表数量: {}", summary.tables);
    println!("- 视图数量: {}", summary.views);
    println!("- 触发器数量: {}", summary.triggers);
    println!("- 独立索引数量: {}", summary.indexes);
}

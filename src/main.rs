use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sales_importer::{console, Config, Prompter, SalesReport, Session};

/// Command-line arguments for sales-importer
#[derive(Parser, Debug)]
#[command(name = "sales-importer")]
#[command(about = "Import, enter and report quarterly sales by region")]
#[command(version)]
struct Args {
    /// TOML configuration file (default: ./sales-importer.toml if present)
    #[arg(short, long, env = "SALES_IMPORTER_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding all_sales.csv and imported_files.txt
    #[arg(long, env = "SALES_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Directory batch files are imported from
    #[arg(long, env = "SALES_IMPORT_DIR")]
    import_dir: Option<PathBuf>,

    /// Restore the sales file from its backup copy and clear the import log first
    #[arg(long)]
    reset: bool,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Print the sales report and exit
    View {
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Import one batch file, save, and exit
    Import {
        /// Batch file name, e.g. sales_q1_2024_w.csv
        file: String,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    if let Some(dir) = args.import_dir {
        config.import_dir = Some(dir);
    }

    init_tracing(&config.log_level);
    info!(data_dir = %config.data_dir.display(), "starting sales importer");

    if args.reset {
        config.reset().context("Failed to reset sales file and import log")?;
    }

    let sales_file = config.sales_file_handle()?;

    sales_file
        .initialize()
        .with_context(|| format!("Failed to initialize {}", sales_file.path().display()))?;
    let loaded = sales_file
        .load()
        .with_context(|| format!("Failed to load {}", sales_file.path().display()))?;
    if loaded.skipped > 0 {
        eprintln!("⚠️  Skipped {} invalid rows in {}", loaded.skipped, sales_file.path().display());
    }

    let importer = config.importer()?;
    let mut session = Session::new(loaded.sales, sales_file, importer);

    match args.mode {
        None => run_console(&mut session),
        Some(Mode::View { json }) => run_view(&session, json),
        Some(Mode::Import { file }) => run_import(&mut session, &file),
    }
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run_console(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout().lock());
    console::run(session, &mut prompter).context("Console session failed")
}

fn run_view(session: &Session, json: bool) -> Result<()> {
    let report = SalesReport::from_records(&session.sales);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render());
    }
    Ok(())
}

fn run_import(session: &mut Session, file: &str) -> Result<()> {
    let outcome = session
        .importer
        .import(file, &mut session.sales)
        .with_context(|| format!("Fail to import sales from '{}'", file))?;

    if let Some(preview) = outcome.preview() {
        print!("{}", preview.render());
    }
    println!("{}", outcome.message());

    if !outcome.is_imported() {
        std::process::exit(1);
    }

    session.sales_file.save(&session.sales).context("Failed to save sales")?;
    println!("✓ Saved {} sales records", session.sales.len());
    Ok(())
}

// Command-line entry point for Symbol Scout.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use symbol_scout::application::ExtractUsecase;
use symbol_scout::config::ScoutConfig;
use symbol_scout::infrastructure::concurrency::init_thread_pool;
use symbol_scout::infrastructure::{DefaultSources, JsonExporter, SourceLoader};
use symbol_scout::{ImportNames, SourceLanguage, SymbolExtractor};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Source file, ESTree JSON file, or directory to scan
    path: PathBuf,

    /// Parser to use instead of the one implied by the file extension
    /// (javascript, typescript, tsx, python, estree)
    #[arg(short, long)]
    language: Option<SourceLanguage>,

    /// Names reported for import specifiers (local, local-and-imported)
    #[arg(long)]
    import_names: Option<ImportNames>,

    /// Deepest syntax tree level to visit before failing (0 = unlimited)
    #[arg(long, conflicts_with = "no_depth_limit")]
    max_depth: Option<usize>,

    /// Walk trees of any depth
    #[arg(long)]
    no_depth_limit: bool,

    /// Worker threads for directory scans
    #[arg(short, long)]
    jobs: Option<usize>,

    /// For directories, print one inventory merged over all files
    #[arg(long)]
    merged: bool,

    /// Report declared names that no identifier refers to (project-wide for
    /// directories)
    #[arg(long)]
    unused: bool,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log more to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<ScoutConfig> {
    let mut config = match &cli.config {
        Some(path) => ScoutConfig::load(path)?,
        None => ScoutConfig::default(),
    };
    if let Some(import_names) = cli.import_names {
        config.import_names = import_names;
    }
    if let Some(max_depth) = cli.max_depth {
        config.max_depth = max_depth;
    }
    if cli.no_depth_limit {
        config.max_depth = 0;
    }
    if cli.jobs.is_some() {
        config.jobs = cli.jobs;
    }
    Ok(config)
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let config = load_config(cli)?;

    let sources = DefaultSources::default();
    let extractor = SymbolExtractor::new(config.extract_config());
    let usecase = ExtractUsecase {
        sources: &sources,
        extractor: &extractor,
        exporter: &JsonExporter,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.path.is_dir() {
        init_thread_pool(config.jobs)?;
        let mut files = SourceLoader::new(config.skip_dirs.clone()).collect(&cli.path)?;
        if let Some(language) = cli.language {
            for file in &mut files {
                file.language = language;
            }
        }

        let outcomes = usecase.scan(&files);
        let summary = if cli.unused {
            usecase.write_unused(&outcomes, &mut out)?
        } else {
            usecase.write_scan(&outcomes, cli.merged, &mut out)?
        };
        out.flush()?;

        if summary.all_failed() {
            eprintln!("Error: none of the {} files could be analyzed", summary.files);
            return Ok(ExitCode::FAILURE);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let inventory = if cli.unused {
        usecase.analyze_file(&cli.path, cli.language)?.unreferenced()
    } else {
        usecase.extract_file(&cli.path, cli.language)?
    };
    usecase.write_inventory(&inventory, &mut out)?;
    out.flush()?;
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

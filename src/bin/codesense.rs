// src/bin/codesense.rs
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use codesense_core::config::Config;
use codesense_core::corpus;
use codesense_core::orchestrator::{analyze, orchestrate};
use codesense_core::report;
use codesense_core::syntax::{BuildOptions, Dialect, GrammarFeature, ModuleMode};

#[derive(Parser)]
#[command(
    name = "codesense",
    version,
    about = "Pattern-based improvement suggestions for TypeScript and JavaScript"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Read settings from this file instead of ./codesense.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Log pipeline stages to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank improvement suggestions for a source file
    Suggest(SuggestArgs),
    /// Print the aggregated patterns of a source file
    Patterns {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Terminal)]
        format: Format,
        #[command(flatten)]
        parse: ParseArgs,
    },
    /// Collect the patterns of a directory as JSON
    Corpus {
        dir: PathBuf,
        /// Write to this file instead of stdout
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct SuggestArgs {
    file: PathBuf,
    /// Previously written code used as similarity corpus
    #[arg(long, value_name = "FILE")]
    existing: Option<PathBuf>,
    /// Directory whose sources are collected into the corpus
    #[arg(long, value_name = "DIR")]
    corpus: Option<PathBuf>,
    /// Corpus written earlier by `codesense corpus`
    #[arg(long, value_name = "FILE")]
    patterns: Option<PathBuf>,
    #[arg(long)]
    max: Option<usize>,
    #[arg(long)]
    min_confidence: Option<f64>,
    #[arg(long, value_enum, default_value_t = Format::Terminal)]
    format: Format,
    #[command(flatten)]
    parse: ParseArgs,
}

#[derive(Args)]
struct ParseArgs {
    #[arg(long, value_enum)]
    dialect: Option<DialectArg>,
    /// Parse as a classic script; `import`/`export` are rejected
    #[arg(long)]
    script: bool,
    #[arg(long)]
    jsx: bool,
    #[arg(long)]
    decorators: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Terminal,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum DialectArg {
    Typed,
    Untyped,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Typed => Self::Typed,
            DialectArg::Untyped => Self::Untyped,
        }
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "error:".red().bold());
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };

    match &cli.command {
        Commands::Suggest(args) => run_suggest(&config, args),
        Commands::Patterns {
            file,
            format,
            parse,
        } => run_patterns(&config, file, *format, parse),
        Commands::Corpus { dir, output } => run_corpus(&config, dir, output.as_deref()),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}

fn run_suggest(config: &Config, args: &SuggestArgs) -> Result<()> {
    let source = read_source(&args.file)?;

    let mut options = config.suggest_options();
    options.build = build_options(config, &args.file, &args.parse);
    if let Some(max) = args.max {
        options.max_suggestions = max;
    }
    if let Some(min) = args.min_confidence {
        if !(0.0..=1.0).contains(&min) {
            bail!("--min-confidence must be between 0 and 1, got {min}");
        }
        options.min_confidence = min;
    }
    if let Some(path) = &args.existing {
        options.existing_code = Some(read_source(path)?);
    }
    if let Some(dir) = &args.corpus {
        options
            .existing_patterns
            .extend(corpus::collect(dir, &config.corpus));
    }
    if let Some(path) = &args.patterns {
        let loaded = corpus::load_patterns(path)
            .with_context(|| format!("Failed to load corpus {}", path.display()))?;
        options.existing_patterns.extend(loaded);
    }

    let suggestions = orchestrate(&source, &options)?;
    match args.format {
        Format::Terminal => print!("{}", report::format_terminal(&suggestions)),
        Format::Json => println!("{}", report::format_json(&suggestions)?),
    }
    Ok(())
}

fn run_patterns(config: &Config, file: &Path, format: Format, parse: &ParseArgs) -> Result<()> {
    let source = read_source(file)?;
    let patterns = analyze(&source, &build_options(config, file, parse))?;
    match format {
        Format::Terminal => print!("{}", report::format_patterns(&patterns)),
        Format::Json => println!("{}", corpus::to_json(&patterns)?),
    }
    Ok(())
}

fn run_corpus(config: &Config, dir: &Path, output: Option<&Path>) -> Result<()> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }
    let patterns = corpus::collect(dir, &config.corpus);
    let json = corpus::to_json(&patterns)?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{} {} pattern(s) written to {}",
                "✓".green(),
                patterns.len(),
                path.display()
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Config values first, then the file extension for anything the config
/// leaves open, then command-line flags.
fn build_options(config: &Config, file: &Path, parse: &ParseArgs) -> BuildOptions {
    let by_extension = corpus::options_for(file);
    let mut options = config.build_options();
    if options.dialect.is_none() {
        if let Some(dialect) = by_extension.dialect {
            options = options.with_dialect(dialect);
        }
    }
    if by_extension.has_feature(GrammarFeature::Jsx) {
        options = options.with_feature(GrammarFeature::Jsx);
    }
    if let Some(dialect) = parse.dialect {
        options = options.with_dialect(dialect.into());
    }
    if parse.script {
        options = options.with_module_mode(ModuleMode::Script);
    }
    if parse.jsx {
        options = options.with_feature(GrammarFeature::Jsx);
    }
    if parse.decorators {
        options = options.with_feature(GrammarFeature::Decorators);
    }
    options
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

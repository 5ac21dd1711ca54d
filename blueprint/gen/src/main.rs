//! Blueprint Code Generator
//!
//! Generates axum server scaffolding from a JSON application schema.

use std::path::PathBuf;

use blueprint_define::Schema;
use blueprint_gen::errors::GeneratorError;
use blueprint_gen::output::generate_and_write;
use clap::Parser;
use colored::Colorize;
use tracing::{Level, debug};
use tracing_subscriber::EnvFilter;

/// Blueprint code generator - transforms an application schema into axum scaffolding
#[derive(Parser, Debug)]
#[command(name = "blueprint-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON schema holding exactly one application
    input: PathBuf,

    /// Directory that receives interface.rs, middleware.rs, rest.rs and mod.rs
    output_dir: PathBuf,

    /// Package module name used in generated `crate::<package>` paths
    /// (defaults to the last segment of OUTPUT_DIR)
    #[arg(short, long)]
    package: Option<String>,

    /// Print generated code without writing files
    #[arg(long)]
    dry_run: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), GeneratorError> {
    debug!(input = %cli.input.display(), output = %cli.output_dir.display(), "loading schema");
    let schema = Schema::from_path(&cli.input)?;

    let code = generate_and_write(
        &schema,
        &cli.output_dir,
        cli.package.as_deref(),
        cli.dry_run,
    )?;

    if !cli.dry_run {
        for (filename, _) in code.files() {
            eprintln!(
                "{} {}",
                "wrote".green(),
                cli.output_dir.join(filename).display()
            );
        }
    }

    Ok(())
}

fn main() -> Result<(), GeneratorError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.dry_run {
        eprintln!("{}", "Dry run mode - no files will be written".yellow());
    }

    run(&cli)
}

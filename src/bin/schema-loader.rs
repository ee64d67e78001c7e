//! Schema Loader CLI
//!
//! Loads a JSON or YAML schema from a file path or URL and prints it as JSON.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use schema_loader::{detect_format, Format, Resolver};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-loader")]
#[command(about = "Load a JSON or YAML schema and print it as normalized JSON")]
#[command(version)]
struct Cli {
    /// Schema source: file path or URL (http:// or https://)
    reference: String,

    /// Source format (auto: from the file extension, YAML otherwise)
    #[arg(long, value_enum, default_value_t = FormatArg::Auto)]
    format: FormatArg,

    /// Directory that relative paths are resolved against
    #[arg(long, short = 'C')]
    working_dir: Option<PathBuf>,

    /// Abort HTTP fetches after this many seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Output file (stdout if not specified)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Log resolution and decoding steps to stderr
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Auto,
    Json,
    Yaml,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

/// Install a stderr subscriber. `RUST_LOG` wins unless `--verbose` is given.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("schema_loader=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), u8> {
    let mut resolver = Resolver::new(cli.working_dir.unwrap_or_default());
    if let Some(secs) = cli.timeout {
        resolver = resolver.timeout(Duration::from_secs(secs));
    }

    let format = match cli.format {
        FormatArg::Auto => detect_format(&cli.reference),
        FormatArg::Json => Format::Json,
        FormatArg::Yaml => Format::Yaml,
    };

    let document = resolver.load(&cli.reference, format).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let json_output = if cli.pretty {
        serde_json::to_string_pretty(&document)
    } else {
        serde_json::to_string(&document)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    match cli.output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

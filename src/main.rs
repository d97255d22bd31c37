//! endpoint-smoke CLI

use std::io;
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use endpoint_smoke::{Config, SmokeRunner};
use tracing_subscriber::EnvFilter;

struct Options {
    config_path: Option<PathBuf>,
    strict: bool,
}

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(Some(options)) => options,
        Ok(None) => {
            print_usage();
            return;
        }
        Err(message) => {
            eprintln!("{message}");
            eprintln!("Run 'endpoint-smoke --help' for usage information.");
            process::exit(2);
        }
    };

    match run(&options) {
        Ok(success) => {
            if options.strict && !success {
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("endpoint-smoke: {e:#}");
            process::exit(2);
        }
    }
}

fn run(options: &Options) -> anyhow::Result<bool> {
    let config = Config::load(options.config_path.as_deref()).context("loading configuration")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting runtime")?;

    let runner = SmokeRunner::new(config);
    let summary = runtime
        .block_on(runner.run_all(&mut io::stdout().lock()))
        .context("writing report")?;

    Ok(summary.is_success())
}

fn parse_args(args: &[String]) -> Result<Option<Options>, String> {
    let mut options = Options {
        config_path: None,
        strict: false,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--strict" => options.strict = true,
            "-c" | "--config" => {
                let path = iter
                    .next()
                    .ok_or_else(|| format!("{arg} requires a path"))?;
                options.config_path = Some(PathBuf::from(path));
            }
            _ => return Err(format!("Unknown argument: {arg}")),
        }
    }

    Ok(Some(options))
}

fn print_usage() {
    eprintln!("endpoint-smoke v{}", env!("CARGO_PKG_VERSION"));
    eprintln!();
    eprintln!("Usage: endpoint-smoke [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --config <path>  Load checks and settings from a TOML file");
    eprintln!("      --strict         Exit with status 1 if any check fails");
    eprintln!("  -h, --help           Show this message");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  API_BASE_URL         Override the server base URL");
    eprintln!("  RUST_LOG             Log filter (default: warn)");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

use clap::Parser;

use crosshair_cfg::cli::{self, Args};

/// Load .env file. Does not override existing environment variables.
fn load_env() {
    // dotenv::dotenv() returns Err if .env doesn't exist, which is fine
    let _ = dotenv::dotenv();
}

/// Install the logger on stderr. `RUST_LOG` wins over `-v`.
fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .init();
}

fn main() {
    // Load .env file before anything else
    load_env();

    let args = Args::parse();
    init_logger(args.verbose);

    if let Err(e) = cli::run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

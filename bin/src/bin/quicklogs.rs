use clap::Parser;
use quicklogs::Registry;
use quicklogs_bin::cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Internal diagnostics go to stderr, only when asked for.
    if let Ok(filter) = std::env::var("QUICKLOGS_TRACE") {
        let _ = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(EnvFilter::new(filter))
            .try_init();
    }

    if let Err(e) = quicklogs_bin::run(cli, Registry::global()) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

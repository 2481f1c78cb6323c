use clap::CommandFactory;
use cprog::config::Cli;
use cprog::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug, cli.quiet, cli.verbose)?;

    if !cli.has_paths() {
        println!("{}", Cli::command().render_usage());
        println!("  Source and destination can be files or directories");
        return Ok(());
    }

    // Convert CLI args to Config - this validates immediately
    let config = Config::try_from(cli)?;
    tracing::debug!(?config, "configuration resolved");

    cprog::commands::copy::run(&config)?;
    Ok(())
}

/// Logs go to stderr so they never break the progress line on stdout
fn init_logging(debug: bool, quiet: bool, verbose: bool) -> anyhow::Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

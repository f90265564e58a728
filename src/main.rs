use clap::Parser;
use dimandocs::app::browser::SystemBrowser;
use dimandocs::app::{App, LaunchOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Browse the markdown documentation of local directories in a web browser.
#[derive(Debug, Parser)]
#[command(name = "dimandocs", disable_version_flag = true)]
struct Cli {
    /// Configuration file to load.
    #[arg(long, value_name = "FILE", default_value = "dimandocs.json")]
    config_file: PathBuf,

    /// Serve only; do not open a browser.
    #[arg(long)]
    serve: bool,

    /// Neither read nor write the document cache.
    #[arg(long)]
    no_cache: bool,

    /// Print version information and exit.
    #[arg(long)]
    version: bool,

    /// A markdown file or a directory to browse instead of the configured
    /// directories.
    path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        print!("{}", dimandocs::version_text());
        return ExitCode::SUCCESS;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let working_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Failed to determine working directory: {e}");
            return ExitCode::FAILURE;
        }
    };

    let options = LaunchOptions {
        config_file: Some(cli.config_file),
        target_path: cli.path,
        use_cache: !cli.no_cache,
    };

    let app = match App::initialize(&working_dir, &options) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Failed to initialize application: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = app.run(cli.serve, &SystemBrowser).await {
        eprintln!("Server failed: {e:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

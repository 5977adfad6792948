use clap::{Parser, Subcommand};
use repo_steward::commands::*;
use repo_steward::core::{error::Result, print_error, print_info, print_success, Config, GitRepo};
use std::env;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "repo-steward")]
#[command(about = "Build LaTeX docs, publish them, and drive routine git maintenance")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Repository path (overrides LOCAL_REPO_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    repo: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build every .tex file under the docs directory, then commit and push the PDFs
    Build {
        /// Build and report only; skip commit and push
        #[arg(long)]
        no_push: bool,
    },
    /// Show repository status and optionally export it
    Status {
        /// Number of recent commits to show
        #[arg(long, default_value_t = 5)]
        history: usize,
        /// Export the full report as JSON
        #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = DEFAULT_JSON_EXPORT)]
        json: Option<PathBuf>,
        /// Export a plain-text summary
        #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = DEFAULT_TEXT_EXPORT)]
        text: Option<PathBuf>,
    },
    /// Interactive menu for single git operations
    Console,
}

fn main() {
    let cli = Cli::parse();

    // Configure logging based on --debug flag
    if cli.debug {
        env::set_var("RUST_LOG", "debug");
    } else if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            print_error(&e.to_string());
            if e.is_setup_error() {
                print_info("Point LOCAL_REPO_PATH (or --repo) at a non-bare git working tree");
            }
            std::process::exit(1);
        }
    }
}

/// Returns whether the command fully succeeded; setup errors come back as `Err`
fn run(cli: Cli) -> Result<bool> {
    let config = Config::from_env(cli.repo)?;

    match cli.command {
        Commands::Build { no_push } => run_pipeline(&config, PipelineOptions { push: !no_push }),
        Commands::Status {
            history,
            json,
            text,
        } => {
            let repo = GitRepo::open(&config.repo_path)?;
            let options = ReportOptions {
                history,
                json,
                text,
            };
            execute_status(&repo, &config.repo_path, &options)?;
            Ok(true)
        }
        Commands::Console => {
            let repo = GitRepo::open(&config.repo_path)?;
            print_success(&format!("Connected to {}", config.repo_path.display()));
            let stdin = std::io::stdin();
            Console::new(&repo, &config, stdin.lock()).run()?;
            Ok(true)
        }
    }
}

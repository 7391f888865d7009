use anyhow::Result;
use clap::builder::FalseyValueParser;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

mod commands;
mod config;

/// specrun finds test packages and reports on executed spec suites.
///
/// Discovery maps every package below the test directory to the location
/// and import path of its generated counterpart, renaming packages whose
/// names collide. Reporting renders the result trees sent back by the
/// suites that ran.
///
/// EXAMPLES:
///     specrun discover                      List test packages of this project
///     specrun discover --json               Same, as JSON
///     specrun report results/*.json         Print results and totals
///     specrun report out.json -v            Print passing suites in full
///
/// ENVIRONMENT VARIABLES:
///     SPECRUN_JSON      Set to '1' for JSON output by default
///     SPECRUN_LOG       Log filter, e.g. 'debug'
///     SPECRUN_TEST_DIR  Test directory name (default: tests)
///     SPECRUN_VERBOSE   Set to '1' to print passing suites in full
///     NO_COLOR          Set to disable colored output
#[derive(Parser)]
#[command(name = "specrun")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover test packages and print the generation plan
    ///
    /// Walks the test directory, keeps every directory that is a source
    /// package, maps it to its output and import path and resolves package
    /// name collisions.
    ///
    /// EXAMPLES:
    ///     specrun discover                        Use ./specrun.toml
    ///     specrun discover --root ../app          Another project
    ///     specrun discover --test-dir specs       Different test directory
    #[command(visible_alias = "d")]
    Discover {
        /// Project root (defaults to current directory)
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Test directory name below the root
        #[arg(long)]
        test_dir: Option<String>,
        /// Output directory name below the root
        #[arg(long)]
        output_dir: Option<String>,
        /// Import path of the project root
        #[arg(long, env = "SPECRUN_IMPORT_PATH")]
        import_path: Option<String>,
        /// Output the plan as JSON
        #[arg(long)]
        json: bool,
        /// Log discovery details and show output paths
        #[arg(long, short = 'v')]
        verbose: bool,
    },

    /// Render spec result files
    ///
    /// Each file holds one result tree or an array of them. Suites without
    /// failures print as one line unless --verbose is given. Exits with
    /// status 1 when any expectation failed.
    ///
    /// EXAMPLES:
    ///     specrun report results.json
    ///     specrun report a.json b.json --json report.json
    #[command(visible_alias = "r")]
    Report {
        /// Result files to read
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Project root whose specrun.toml applies (defaults to current directory)
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Print passing suites in full
        #[arg(long, short = 'v', env = "SPECRUN_VERBOSE", value_parser = FalseyValueParser::new())]
        verbose: bool,
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
        /// Also write a JSON report to this file
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
        /// Run identifier recorded in the JSON report
        #[arg(long)]
        run_id: Option<String>,
    },

    /// Generate shell completions
    ///
    /// EXAMPLES:
    ///     specrun completions bash > /etc/bash_completion.d/specrun
    Completions {
        /// Target shell
        shell: Shell,
    },
}

fn init_logging(filter: &str) {
    env_logger::Builder::new()
        .parse_filters(filter)
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cli_config = config::Config::from_env();

    match cli.command {
        Commands::Discover {
            root,
            test_dir,
            output_dir,
            import_path,
            json,
            verbose,
        } => {
            init_logging(&cli_config.log_filter(verbose));
            if cli_config.no_color {
                colored::control::set_override(false);
            }
            // Command-line flag overrides environment variable
            let args = commands::discover::DiscoverArgs {
                root,
                test_dir,
                output_dir,
                import_path,
                json: json || cli_config.default_json,
                verbose,
            };
            commands::discover::run(args)?;
        }
        Commands::Report {
            files,
            root,
            verbose,
            no_color,
            json,
            run_id,
        } => {
            init_logging(&cli_config.log_filter(false));
            let args = commands::report::ReportArgs {
                files,
                root,
                verbose,
                no_color: no_color || cli_config.no_color,
                json,
                run_id,
            };
            if !commands::report::run(args)? {
                std::process::exit(1);
            }
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
        }
    }

    Ok(())
}

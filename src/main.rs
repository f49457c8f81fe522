use clap::Parser;
use paylens::args::{Args, Command, DirectorySubcommand, PaymentsSubcommand, QueriesSubcommand};
use paylens::{commands, Config, Mode, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().paylens_home().path();

    // This allows for running the program without a server. When PAYLENS_IN_TEST_MODE is set and
    // non-zero in length, then the mode will be Mode::Test, otherwise it will be Mode::Http.
    let mode = Mode::from_env();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init(init_args) => {
            commands::init(home, init_args.api_url(), init_args.token())
                .await?
                .print()
        }

        Command::Payments(payments_args) => {
            let config = Config::load(home).await?;
            match payments_args.action() {
                PaymentsSubcommand::List(view_args) => {
                    commands::payments_list(config, mode, view_args.clone())
                        .await?
                        .print_rows()
                }
                PaymentsSubcommand::Summary(view_args) => {
                    commands::payments_summary(config, mode, view_args.clone())
                        .await?
                        .print()
                }
                PaymentsSubcommand::Delete(id_args) => {
                    commands::payments_delete(config, mode, id_args.id())
                        .await?
                        .print()
                }
            }
        }

        Command::Queries(queries_args) => {
            let config = Config::load(home).await?;
            match queries_args.action() {
                QueriesSubcommand::List(list_args) => {
                    commands::queries_list(config, mode, list_args.clone())
                        .await?
                        .print_rows()
                }
                QueriesSubcommand::Mark(mark_args) => {
                    commands::queries_mark(config, mode, mark_args.clone())
                        .await?
                        .print()
                }
            }
        }

        Command::Users(users_args) => {
            let config = Config::load(home).await?;
            match users_args.action() {
                DirectorySubcommand::List(list_args) => {
                    commands::users_list(config, mode, list_args.clone())
                        .await?
                        .print_rows()
                }
            }
        }

        Command::Employees(employees_args) => {
            let config = Config::load(home).await?;
            match employees_args.action() {
                DirectorySubcommand::List(list_args) => {
                    commands::employees_list(config, mode, list_args.clone())
                        .await?
                        .print_rows()
                }
            }
        }

        Command::Stats => commands::stats(Config::load(home).await?, mode)
            .await?
            .print(),

        Command::Delete(delete_args) => {
            let config = Config::load(home).await?;
            commands::delete(config, mode, delete_args.resource(), delete_args.id())
                .await?
                .print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

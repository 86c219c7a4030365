//! CLI entry point - the composition root.
//!
//! This is the ONLY place where logging is initialised and errors become
//! process exit codes. Command dispatch routes to handlers, which get every
//! adapter through `CliContext`.

use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use gpuscan_cli::presentation::Palette;
use gpuscan_cli::utils::wait_for_enter;
use gpuscan_cli::{Cli, CliConfig, Commands, bootstrap, exit_code_for, handlers};

/// `RUST_LOG` wins; otherwise `--verbose` selects debug and the default is warn.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Reports own stdout; logs go to stderr.
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()
        .ok();
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::from_cli(&cli);

    // No command provided - show help
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let ctx = bootstrap(config)?;
    match command {
        Commands::Check { json } => handlers::check::execute(&ctx, json).await,
        Commands::Torch { json } => handlers::torch::execute(&ctx, json).await,
        Commands::Uninstall { yes, .. } => handlers::uninstall::execute(&ctx, yes).await,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load environment variables before clap reads GPUSCAN_* defaults
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);
    let palette = Palette::from_flags(cli.no_color, std::env::var("NO_COLOR").ok().as_deref());
    let pause = cli.command.as_ref().is_some_and(Commands::pauses_on_exit);

    let code = match dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("{}", palette.fail(&format!("{err:#}")));
            ExitCode::from(exit_code_for(&err))
        }
    };

    // The elevated window closes with the process.
    if pause {
        wait_for_enter(&mut io::stdin().lock(), &mut io::stdout()).ok();
    }
    code
}

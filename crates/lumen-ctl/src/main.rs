use std::process::ExitCode;

use clap::Parser;
use lumen_ctl::{cli, commands, tracing_init};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::Args::parse();
    tracing_init::init_tracing(args.log_path.as_deref());

    match commands::run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "command failed");
            eprintln!("lumenctl: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

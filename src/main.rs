use color_eyre::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use writeflow::cli::{parse_args, run_cli_command};
use writeflow::config::ClientConfig;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("writeflow=info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let command = parse_args(std::env::args());
    run_cli_command(command, ClientConfig::from_env()).await
}

//! The `simplepay` command-line front-end.

#[macro_use]
extern crate tracing;

use clap::Parser;
use eyre::Result;

mod app;
mod args;
mod handler;
mod ui;

use app::App;
use args::Cli;

fn main() -> Result<()> {
    handler::install();
    subscriber();
    let cli = Cli::parse();
    run(cli)
}

#[tokio::main]
async fn run(cli: Cli) -> Result<()> {
    let app = App::new(&cli.opts).await?;
    app.run(cli.cmd).await
}

/// Initializes a tracing subscriber writing to stderr, filtered by `RUST_LOG`.
fn subscriber() {
    let _ = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

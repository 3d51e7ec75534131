mod app;
mod cli;
mod effects;
mod input;
mod render;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    minirag_logging::initialize(cli.log_destination(), cli.log_level(), &cli.log_file);
    app::run(&cli)
}

use clap::Parser;
use tradestat::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}

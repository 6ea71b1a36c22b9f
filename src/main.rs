use bigmove::cli::{run, Cli};
use clap::Parser;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    bigmove::logging::init(cli.verbose);
    run(cli)
}

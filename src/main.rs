use clap::Parser;
use regexviz::Cli;
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = regexviz::run(Cli::parse()) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

use std::process;

use clap::Parser;
use huffpack::cli::{self, Cli, Command};
use huffpack::if_tracing;

if_tracing! {
    use tracing_subscriber::{EnvFilter, fmt};
}

fn main() {
    if_tracing! {
        let subscriber = fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_target(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Encode(args) => cli::encode::encode(args).map(|report| println!("{}", report)),
        Command::Decode(args) => cli::decode::decode(args),
        Command::Test(args) => cli::test::test(args).map(|passed| {
            if !passed {
                process::exit(1);
            }
        }),
        Command::Codes(args) => cli::codes::codes(args).map(drop),
    };

    if let Err(err) = result {
        eprintln!("error: {:#}", err);
        process::exit(1);
    }
}

use clap::Parser;
use log::{debug, warn};
use snafu::ErrorCompat;

use std::io;
use std::process;

mod args;
mod survey;

fn main() {
    let args = args::Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
    debug!("args: {:?}", args);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let res = survey::run_with_io(&args, &mut stdin.lock(), &mut stdout.lock());

    if let Err(e) = res {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured: {}", e);
        for cause in ErrorCompat::iter_chain(&e).skip(1) {
            eprintln!("  caused by: {}", cause);
        }
        process::exit(1);
    }
}

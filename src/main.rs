// src/main.rs

use execshim::{cli, logging, run};

fn main() {
    let args = cli::parse();

    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("execshim: failed to initialise logging: {err:?}");
    }

    // `run` only ever returns a failure; success replaces or terminates
    // this process before the match is reached.
    let err = match run(args) {
        Err(err) => err,
        Ok(never) => match never {},
    };

    eprintln!("execshim: {err}");
    std::process::exit(err.exit_code());
}

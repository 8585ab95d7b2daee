//! Lancet CLI binary.

use std::io::{self, Write};
use std::process;

use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use lancet::cli::{LancetArgs, execute_command};

fn main() {
    let args = LancetArgs::parse();

    let log_level = match args.verbosity() {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        3 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = execute_command(&args, &mut out) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

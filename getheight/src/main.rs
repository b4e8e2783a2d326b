mod error;
mod join;
mod options;
mod srs;

use clap::Parser;
use options::Cli;
use std::error::Error;

fn main() {
    let cli = Cli::parse();
    env_logger::init();

    println!("input:  {}", cli.inputfile.display());
    println!("dem:    {}", cli.dem.display());
    println!("output: {}", cli.outputfile.display());
    println!("srs:    {}", cli.srs);

    if let Err(err) = cli.run() {
        eprint!("error: {err}");
        let mut source = err.source();
        while let Some(cause) = source {
            eprint!(": {cause}");
            source = cause.source();
        }
        eprintln!();
        std::process::exit(err.exit_code());
    }
}

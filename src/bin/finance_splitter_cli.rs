use std::{env, process};

use finance_splitter::{
    cli::{self, output},
    errors::CliError,
    init,
};

fn main() {
    init();

    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(err) = cli::run_cli(&args) {
        output::error(&err);
        if matches!(err, CliError::Command(_)) {
            cli::print_usage();
        }
        process::exit(1);
    }
}

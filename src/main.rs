use std::fs;

use clap::Parser;
use sof::{preprocess, run_code};
use tracing_subscriber::EnvFilter;

/// sof is an interpreter for Stack with Objects and Functions (SOF), a
/// small concatenative, stack-based programming language.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None, disable_version_flag = true)]
struct Args {
    /// Display version information and exit.
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    version: Option<bool>,

    /// Execute in debug mode: verbose interpreter logging on stderr.
    #[arg(short = 'd', long)]
    debug: bool,

    /// Run the preprocessor on the input and print the result, then exit.
    #[arg(short = 'p', long = "preprocess")]
    preprocess_only: bool,

    /// Do not run the preprocessor before executing the input.
    #[arg(short = 'P', long = "skip-preprocess")]
    skip_preprocess: bool,

    /// Execute the given command and exit.
    #[arg(short = 'c', long = "command")]
    command: Option<String>,

    /// Paths of files to read and execute, in order.
    files: Vec<String>,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.debug);

    let mut inputs: Vec<(String, String)> = Vec::new();
    if let Some(command) = &args.command {
        // -c executes the command and exits; file arguments are ignored
        inputs.push(("<literal>".to_string(), command.clone()));
    } else {
        for path in &args.files {
            let contents = fs::read_to_string(path).unwrap_or_else(|_| {
                               eprintln!("Failed to read the input file '{path}'. Perhaps this \
                                          file does not exist?");
                               std::process::exit(1);
                           });
            inputs.push((path.clone(), contents));
        }
    }

    if inputs.is_empty() {
        eprintln!("No input given. Pass one or more files, or a command with '-c'.");
        std::process::exit(2);
    }

    for (name, raw) in &inputs {
        let result = if args.preprocess_only {
            preprocess(name, raw).map(|cleaned| print!("{cleaned}"))
        } else {
            run_code(name, raw, !args.skip_preprocess)
        };

        if let Err(e) = result {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Sets up stderr logging: `-d` forces debug level, otherwise `RUST_LOG`
/// is honored with a `warn` default.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

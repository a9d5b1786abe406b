use std::{fs, process::ExitCode};

use clap::Parser;
use dsviz::{
    execute_source, interpreter::evaluator::core::Interpreter, structures::factory::DefaultFactory,
};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// dsviz runs data-structure animation scripts and prints the resulting
/// animation envelope as JSON.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells dsviz to look at a file instead of a script.
    #[arg(short, long)]
    file: bool,

    /// Pretty-prints the JSON output.
    #[arg(short, long)]
    pretty: bool,

    /// Seeds `random(...)` for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Initial capacity of array backed structures.
    #[arg(long, default_value_t = 100)]
    capacity: usize,

    /// Logs every operation to stderr.
    #[arg(short, long)]
    verbose: bool,

    contents: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter)
                             .with_writer(std::io::stderr)
                             .init();

    let script = if args.file {
        match fs::read_to_string(&args.contents) {
            Ok(script) => script,
            Err(err) => {
                error!("failed to read '{}': {err}", args.contents);
                eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                          &args.contents);
                return ExitCode::FAILURE;
            },
        }
    } else {
        args.contents
    };

    let interpreter = Interpreter::new().with_factory(DefaultFactory { capacity: args.capacity });
    let mut interpreter = match args.seed {
        Some(seed) => interpreter.with_seed(seed),
        None => interpreter,
    };

    let result = match execute_source(&mut interpreter, &script) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        },
    };

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&result)
    } else {
        serde_json::to_string(&result)
    };
    match rendered {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("failed to render result: {e}");
            return ExitCode::FAILURE;
        },
    }

    if result.success { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

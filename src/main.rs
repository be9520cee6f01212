//! melc
//!
//! Front end driver: reads a source file, parses it, runs the semantic
//! check and prints the annotated tree.

use std::{fs::read_to_string, path::PathBuf, process, time::Instant};

use clap::Parser;
use log::{error, info, LevelFilter};

use melc::{
    display_error,
    errors::errors::Error,
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::type_checker::type_check,
};

/// Checks a source file and prints its annotated syntax tree
#[derive(Parser, Debug)]
#[command(name = "melc")]
#[command(version)]
#[command(about = "Semantic checker for a small C-like language")]
struct Cli {
    /// Input source file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Print the parsed tree before checking
    #[arg(long)]
    ast: bool,

    /// Only report success or the first error
    #[arg(short, long)]
    quiet: bool,

    /// Log checker progress
    #[arg(short, long)]
    verbose: bool,
}

/// Syntax errors exit with 1, semantic errors with 2.
fn exit_code(error: &Error) -> i32 {
    if error.is_semantic() {
        2
    } else {
        1
    }
}

fn fail(error: Error, file_name: &str, content: &str) -> ! {
    display_error(&error, file_name, content);
    process::exit(exit_code(&error));
}

fn main() {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    );
    if cli.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    let file_name = cli.input.to_string_lossy().to_string();
    let content = match read_to_string(&cli.input) {
        Ok(content) => content,
        Err(e) => {
            error!("failed to read {}: {}", file_name, e);
            process::exit(1);
        }
    };

    let start = Instant::now();

    let tokens = match tokenize(content.clone()) {
        Ok(tokens) => tokens,
        Err(e) => fail(e, &file_name, &content),
    };
    info!("Tokenized in {:?}", start.elapsed());

    let parse_start = Instant::now();
    let mut program = match parse(tokens) {
        Ok(program) => program,
        Err(e) => fail(e, &file_name, &content),
    };
    info!("Parsed in {:?}", parse_start.elapsed());

    if cli.ast {
        println!("ast:");
        println!("{}", program.tree().join("\n"));
        println!();
    }

    let check_start = Instant::now();
    if let Err(e) = type_check(&mut program) {
        fail(e, &file_name, &content);
    }
    info!("Type checked in {:?}", check_start.elapsed());
    info!("Total time: {:?}", start.elapsed());

    if cli.quiet {
        println!("{}: ok", file_name);
    } else {
        println!("semantic-check:");
        println!("{}", program.tree().join("\n"));
    }
}

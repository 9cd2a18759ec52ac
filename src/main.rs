use std::{fs, path::PathBuf, process::ExitCode, time::Instant};

use clap::Parser;
use minic::{
    display_error,
    errors::errors::Error,
    lexer::preprocessor::Preprocessor,
    render_tokens, tokenize, tokenize_with,
};

/// `NAME[=VALUE]`, VALUE defaulting to `1`.
#[derive(Debug, Clone)]
struct Define {
    name: String,
    value: String,
}

fn parse_define(argument: &str) -> Result<Define, String> {
    let (name, value) = match argument.split_once('=') {
        Some((name, value)) => (name.trim(), value.trim()),
        None => (argument.trim(), "1"),
    };

    if name.is_empty() {
        return Err(String::from("macro name must not be empty"));
    }

    Ok(Define {
        name: name.to_string(),
        value: value.to_string(),
    })
}

/// Tokenize a MiniC source file.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Input source file.
    #[arg(short, long)]
    input: PathBuf,
    /// Write tokens to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Include ERROR tokens in the output.
    #[arg(long)]
    show_errors: bool,
    /// Scan the raw source, keeping comments and directives.
    #[arg(long)]
    no_preprocessor: bool,
    /// `NAME[=VALUE]`
    ///
    /// Predefine a macro before preprocessing.
    #[arg(short = 'D', long, value_parser = parse_define)]
    define: Vec<Define>,
}

fn run(args: Args) -> Result<bool, Error> {
    let start = Instant::now();
    let source = fs::read_to_string(&args.input)?;

    let tokenized = if args.no_preprocessor {
        tokenize(&source, false)
    } else {
        let mut preprocessor = Preprocessor::new();
        for define in &args.define {
            preprocessor.define(&define.name, &define.value);
        }
        tokenize_with(&source, preprocessor)
    };

    log::info!(
        "Tokenized {} in {:?}",
        args.input.display(),
        start.elapsed()
    );

    let output = render_tokens(&tokenized.tokens, args.show_errors);
    match &args.output {
        Some(path) => {
            fs::write(path, output)?;
            println!("Tokens written to {}", path.display());
        }
        None => print!("{}", output),
    }

    if !tokenized.preprocessor_errors.is_empty() || tokenized.has_lexical_errors() {
        eprintln!("\nErrors:");
        for error in tokenized
            .preprocessor_errors
            .iter()
            .chain(tokenized.errors.iter())
        {
            eprint!("{}", display_error(error, &source));
        }
    }

    Ok(!tokenized.has_lexical_errors())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    if !args.input.exists() {
        eprintln!("Error: file {} does not exist", args.input.display());
        return ExitCode::FAILURE;
    }

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("Error: {}", error);
            ExitCode::FAILURE
        }
    }
}

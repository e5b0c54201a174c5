//! Annotator command line.
//!
//! ## Subcommands
//!
//! - `annotator-cli annotate <config> [--batch-size N]` - Annotate stdin,
//!   one whitespace-tokenized sentence per line, and print CoNLL-U rows
//! - `annotator-cli version` - Print the library version
//! - `annotator-cli help` - Show usage

use std::io::{self, BufRead, BufWriter, Write};
use std::process::ExitCode;

use annotator_core::engine::{annotate, load_model};
use annotator_core::scheduler::thread_widths;
use annotator_core::sentences::{Sentence, Token};
use annotator_core::telemetry::init_from_env;

const DEFAULT_BATCH_SIZE: usize = 32;

fn main() -> ExitCode {
    init_from_env();

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match command {
        "annotate" => match run_annotate(&args[2..]) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("annotator-cli: {}", e);
                ExitCode::FAILURE
            }
        },
        "version" | "--version" | "-V" => {
            println!("annotator-cli {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        "help" | "--help" | "-h" => {
            print_usage();
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    println!("annotator-cli {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("USAGE:");
    println!("    annotator-cli annotate <config> [--batch-size N]");
    println!("    annotator-cli version");
    println!("    annotator-cli help");
    println!();
    println!("Sentences are read from stdin, one per line, tokens separated by whitespace.");
    println!("Logging is controlled by ANNOTATOR_LOG; thread counts by");
    println!("ANNOTATOR_INTRAOP_THREADS and ANNOTATOR_INTEROP_THREADS.");
}

fn parse_batch_size(args: &[String]) -> Result<usize, String> {
    let mut batch_size = DEFAULT_BATCH_SIZE;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--batch-size" | "-b" => {
                let value = iter.next().ok_or("--batch-size requires a value")?;
                batch_size = value
                    .parse()
                    .map_err(|_| format!("invalid batch size: {}", value))?;
            }
            other => return Err(format!("unexpected argument: {}", other)),
        }
    }
    Ok(batch_size)
}

fn run_annotate(args: &[String]) -> Result<(), String> {
    let config = args.first().ok_or("annotate requires a config path")?;
    let batch_size = parse_batch_size(&args[1..])?;

    let model = load_model(config).map_err(|e| e.to_string())?;

    let mut sentences = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line.map_err(|e| format!("cannot read stdin: {}", e))?;
        let sentence: Sentence = line.split_whitespace().map(Token::new).collect();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
    }

    let parallelism = thread_widths().begin_annotation();
    let annotated =
        annotate(model.as_ref(), sentences, batch_size, parallelism).map_err(|e| e.to_string())?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_conllu(&mut out, &annotated).map_err(|e| format!("cannot write output: {}", e))?;
    out.flush().map_err(|e| format!("cannot write output: {}", e))
}

fn write_conllu(out: &mut impl Write, sentences: &[Sentence]) -> io::Result<()> {
    for sentence in sentences {
        for (idx, token) in sentence.tokens.iter().enumerate() {
            writeln!(
                out,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t_\t{}",
                idx + 1,
                token.form,
                token.lemma.as_deref().unwrap_or("_"),
                token.upos.as_deref().unwrap_or("_"),
                token.xpos.as_deref().unwrap_or("_"),
                join_pairs(token.features.iter(), "|"),
                token
                    .head
                    .map(|head| head.to_string())
                    .unwrap_or_else(|| "_".to_string()),
                token.relation.as_deref().unwrap_or("_"),
                join_pairs(token.misc.iter(), "|"),
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn join_pairs<'a>(pairs: impl Iterator<Item = (&'a String, &'a String)>, sep: &str) -> String {
    let joined: Vec<String> = pairs.map(|(k, v)| format!("{}={}", k, v)).collect();
    if joined.is_empty() {
        "_".to_string()
    } else {
        joined.join(sep)
    }
}

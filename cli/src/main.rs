//! fixmatch CLI — driving adapter for the fixmatch engine.
//!
//! Subcommands:
//! - `match <json|xml> <actual-file> <expected-file>` — match a response
//!   against a fixture; prints a unified diff and exits 1 on mismatch
//! - `check <json|xml> <expected-file>` — validate a fixture's
//!   placeholders without matching anything
//! - `info` — print recognized placeholder types in dispatch order

use std::fs;
use std::process;

use fixmatch::{Engine, Format, MatchOutcome, SCALAR_PRECEDENCE};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(2);
    }

    let result = match args[1].as_str() {
        "match" => cmd_match(&args[2..]),
        "check" => cmd_check(&args[2..]),
        "info" => cmd_info(),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("error: unknown command \"{other}\"");
            print_usage();
            process::exit(2);
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(2);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

fn cmd_match(args: &[String]) -> Result<(), String> {
    let [format, actual_path, expected_path] = args else {
        return Err("match requires <json|xml> <actual-file> <expected-file>".into());
    };

    let format: Format = format.parse().map_err(display)?;
    let actual = read(actual_path)?;
    let expected = read(expected_path)?;

    let engine = Engine::new();
    let outcome = engine
        .match_text(format, actual.trim(), expected.trim())
        .map_err(display)?;

    match outcome {
        MatchOutcome::Success => {
            println!("OK");
            Ok(())
        }
        MatchOutcome::Failure(mismatch) => {
            eprintln!(
                "{}",
                fixmatch_assert::render_failure(&mismatch, format, actual.trim(), expected.trim())
            );
            process::exit(1);
        }
    }
}

fn cmd_check(args: &[String]) -> Result<(), String> {
    let [format, expected_path] = args else {
        return Err("check requires <json|xml> <expected-file>".into());
    };

    let format: Format = format.parse().map_err(display)?;
    let expected = read(expected_path)?;

    let tree = format.parse(expected.trim()).map_err(display)?;
    Engine::new().validate_pattern(&tree).map_err(display)?;

    println!("Fixture valid");
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // Uniform return type for all commands
fn cmd_info() -> Result<(), String> {
    println!("Placeholder types, in dispatch order:");
    for tag in SCALAR_PRECEDENCE {
        println!("  @{}@", tag.name());
    }
    println!("\nSequence rest wildcard: @...@");
    println!("Alternation separator: \" or \"");
    println!("Escaped sentinel: @@");
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════════════

fn read(path: &str) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("cannot read {path}: {e}"))
}

fn display(e: impl std::fmt::Display) -> String {
    e.to_string()
}

fn print_usage() {
    eprintln!(
        "Usage:
  fixmatch match <json|xml> <actual-file> <expected-file>
  fixmatch check <json|xml> <expected-file>
  fixmatch info

Exit codes: 0 match/valid, 1 mismatch, 2 usage or configuration error"
    );
}

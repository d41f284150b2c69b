//! The `logic` binary: reads an infix propositional formula and writes an
//! equisatisfiable DIMACS CNF produced by the Tseitin transformation.

use clap::Parser;
use satori::logic::Formula;
use satori::sat::cnf::Cnf;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

/// Propositional formula to DIMACS CNF.
#[derive(Parser, Debug)]
#[command(name = "logic", version, about)]
struct Cli {
    /// Input file with the formula; stdin when omitted.
    input: Option<PathBuf>,
}

fn run(cli: &Cli) -> Result<(), String> {
    let text = match &cli.input {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("could not read {}: {e}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("could not read stdin: {e}"))?;
            buffer
        }
    };

    let formula = Formula::parse(&text)?;
    let cnf: Cnf = formula.to_cnf();
    print!("{cnf}");
    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::from(1)
        }
    }
}

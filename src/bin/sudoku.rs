//! The `sudoku` binary: reads nine lines of nine digits (0 for a blank
//! cell), decides the board with the in-crate solver, and prints the
//! completed grid.

use clap::Parser;
use satori::sat::cnf::Cnf;
use satori::sat::solver::Solver;
use satori::sudoku::solver::Board;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

/// Sudoku solver backed by SAT.
#[derive(Parser, Debug)]
#[command(name = "sudoku", version, about)]
struct Cli {
    /// Input file with the board; stdin when omitted.
    input: Option<PathBuf>,
}

fn run(cli: &Cli) -> Result<u8, String> {
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

    let board = Board::parse(&text)?;
    let cnf: Cnf = board.to_cnf();

    match Solver::new(cnf).solve() {
        Some(solution) => {
            print!("{}", board.decode(&solution));
            Ok(0)
        }
        None => {
            eprintln!("board has no solution");
            Ok(20)
        }
    }
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
        Ok(code) => ExitCode::from(code),
        Err(message) => {
            eprintln!("{message}");
            ExitCode::from(1)
        }
    }
}

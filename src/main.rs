//! The `sat` binary: DIMACS CNF in, SAT-competition result out.
//!
//! Exit codes: 10 satisfiable, 20 unsatisfiable, 1 usage or I/O error,
//! 2 internal consistency failure.

use clap::Parser;
use satori::sat::cnf::Cnf;
use satori::sat::dimacs::{parse_dimacs, parse_file, write_result};
use satori::sat::solver::{Solver, SolverStats};
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

const EXIT_SAT: u8 = 10;
const EXIT_UNSAT: u8 = 20;
const EXIT_ERROR: u8 = 1;
const EXIT_BROKEN: u8 = 2;

/// A CDCL SAT solver for DIMACS CNF.
#[derive(Parser, Debug)]
#[command(name = "sat", version, about)]
struct Cli {
    /// Do not print results to stdout.
    #[arg(short = 'q')]
    quiet: bool,

    /// Write a certificate for unsatisfiable formulas to this file.
    #[arg(short = 'C', value_name = "DRUP_FILE")]
    certificate: Option<PathBuf>,

    /// Print search statistics to stderr after solving.
    #[arg(long)]
    stats: bool,

    /// Input file; stdin when omitted.
    input: Option<PathBuf>,

    /// Output file; stdout when omitted. Pointless together with -q.
    output: Option<PathBuf>,
}

fn print_stats(cnf: &Cnf, stats: &SolverStats, elapsed: f64) {
    let line = |label: &str, value: String| eprintln!("c {label:<16} {value:>14}");
    eprintln!("c ---------------------------------");
    line("variables", cnf.num_vars.to_string());
    line("clauses", cnf.len().to_string());
    line("decisions", stats.decisions.to_string());
    line("conflicts", stats.conflicts.to_string());
    line("propagations", stats.propagations.to_string());
    line("learnt clauses", stats.learnt_clauses.to_string());
    line("reductions", stats.reductions.to_string());
    line("solve time (s)", format!("{elapsed:.3}"));
    eprintln!("c ---------------------------------");
}

fn run(cli: &Cli) -> Result<u8, String> {
    if cli.quiet && cli.output.is_some() {
        return Err("an output file makes no sense with -q".to_string());
    }

    let mut certificate = match &cli.certificate {
        Some(path) => Some(
            File::create(path)
                .map_err(|e| format!("could not open certificate file {}: {e}", path.display()))?,
        ),
        None => None,
    };

    let cnf: Cnf = match &cli.input {
        Some(path) => parse_file(path)?,
        None => parse_dimacs(BufReader::new(io::stdin().lock()))?,
    };

    let start = Instant::now();
    let mut solver = Solver::new(cnf.clone());
    let solution = solver.solve();
    let elapsed = start.elapsed().as_secs_f64();

    if cli.stats {
        print_stats(&cnf, &solver.stats(), elapsed);
    }

    if let Some(model) = &solution {
        if !cnf.verify(model) {
            eprintln!("model broken!");
            return Ok(EXIT_BROKEN);
        }
    } else if let Some(cert) = &mut certificate {
        // placeholder certificate: just the terminating empty clause
        cert.write_all(b"0\n")
            .map_err(|e| format!("could not write certificate: {e}"))?;
    }

    if !cli.quiet {
        let result = match &cli.output {
            Some(path) => {
                let mut out = File::create(path)
                    .map_err(|e| format!("could not open output file {}: {e}", path.display()))?;
                write_result(&mut out, solution.as_ref(), cnf.num_vars)
            }
            None => write_result(&mut io::stdout().lock(), solution.as_ref(), cnf.num_vars),
        };
        result.map_err(|e| format!("could not write result: {e}"))?;
    }

    Ok(if solution.is_some() {
        EXIT_SAT
    } else {
        EXIT_UNSAT
    })
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { EXIT_ERROR } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(message) => {
            eprintln!("{message}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

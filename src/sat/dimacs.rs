#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! DIMACS CNF input and SAT-competition output.
//!
//! Input: leading `c` comment lines, a `p cnf <vars> <clauses>` header, then
//! clauses as whitespace-separated signed integers terminated by `0`.
//! Clauses may span lines and several may share a line. A `%` token ends the
//! data (some benchmark archives append one).
//!
//! Output: `s SATISFIABLE` followed by a `v ` line listing one literal per
//! variable and a closing `0`, or `s UNSATISFIABLE`.

use crate::sat::cnf::Cnf;
use crate::sat::literal::Literal;
use crate::sat::solver::Solutions;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Parses DIMACS CNF from a reader.
///
/// The declared variable count widens the universe if it exceeds the largest
/// variable actually mentioned, so the model line can cover every declared
/// variable.
///
/// # Errors
///
/// Returns a message for I/O failures, a missing header, non-integer
/// literals, or an unterminated final clause.
pub fn parse_dimacs<R: BufRead, L: Literal>(reader: R) -> Result<Cnf<L>, String> {
    let mut header_vars: Option<usize> = None;
    let mut clauses: Vec<Vec<i32>> = Vec::new();
    let mut current: Vec<i32> = Vec::new();
    let mut done = false;

    for line in reader.lines() {
        let line = line.map_err(|e| format!("could not read input: {e}"))?;
        let tokens: Vec<&str> = line.split_whitespace().collect();

        match tokens.first() {
            None | Some(&"c") => continue,
            Some(&"p") => {
                if tokens.len() != 4 || tokens[1] != "cnf" {
                    return Err(format!("malformed problem line: '{}'", line.trim()));
                }
                let vars = tokens[2]
                    .parse::<usize>()
                    .map_err(|_| format!("invalid variable count '{}'", tokens[2]))?;
                header_vars = Some(vars);
                continue;
            }
            Some(_) => {}
        }

        if header_vars.is_none() {
            return Err("missing 'p cnf' header".to_string());
        }

        for token in tokens {
            if token == "%" {
                done = true;
                break;
            }
            let lit = token
                .parse::<i32>()
                .map_err(|_| format!("invalid literal '{token}'"))?;
            if lit == 0 {
                clauses.push(std::mem::take(&mut current));
            } else {
                current.push(lit);
            }
        }
        if done {
            break;
        }
    }

    if !current.is_empty() {
        return Err("unterminated clause at end of input".to_string());
    }

    let mut cnf = Cnf::new(clauses);
    if let Some(vars) = header_vars {
        cnf.num_vars = cnf.num_vars.max(vars);
    }
    Ok(cnf)
}

/// Parses DIMACS CNF from a string. Convenience for tests and in-process
/// pipelines.
///
/// # Errors
///
/// See [`parse_dimacs`].
pub fn parse_dimacs_text<L: Literal>(text: &str) -> Result<Cnf<L>, String> {
    parse_dimacs(io::Cursor::new(text))
}

/// Parses a DIMACS CNF file.
///
/// # Errors
///
/// Returns a message if the file cannot be opened or its content is
/// malformed.
pub fn parse_file<L: Literal>(path: &Path) -> Result<Cnf<L>, String> {
    let file = std::fs::File::open(path)
        .map_err(|e| format!("could not open input file {}: {e}", path.display()))?;
    parse_dimacs(io::BufReader::new(file))
}

/// Writes the result in SAT-competition format.
///
/// On satisfiability, the `v` line carries a literal for every variable
/// `1..=num_vars`; variables the model leaves unassigned default to
/// positive.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_result<W: Write>(
    out: &mut W,
    solution: Option<&Solutions>,
    num_vars: usize,
) -> io::Result<()> {
    match solution {
        Some(model) => {
            writeln!(out, "s SATISFIABLE")?;
            write!(out, "v")?;
            #[allow(clippy::cast_possible_truncation)]
            for var in 1..=num_vars as u32 {
                #[allow(clippy::cast_possible_wrap)]
                let lit = model.get(var).unwrap_or(var as i32);
                write!(out, " {lit}")?;
            }
            writeln!(out, " 0")
        }
        None => writeln!(out, "s UNSATISFIABLE"),
    }
}

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! Sudoku as SAT.
//!
//! A 9x9 board is read as nine lines of nine digits, `0` marking a blank
//! cell. The encoding uses one variable per (row, column, digit) triple:
//! `p(i, j, n) = 81*i + 9*j + n + 1` with `i`, `j`, `n` in `0..9`. Clauses
//! assert the givens, that every cell holds at least one digit and at most
//! one digit, and that every row, column, and box contains every digit. A
//! model is decoded by reading off the positive cell variables.

use crate::sat::cnf::Cnf;
use crate::sat::literal::Literal;
use crate::sat::solver::Solutions;
use itertools::Itertools;
use std::fmt::Display;

/// A 9x9 Sudoku board. `0` represents a blank cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board([[u8; 9]; 9]);

/// The DIMACS variable asserting that cell `(i, j)` holds digit `n + 1`,
/// for `i`, `j`, `n` in `0..9`.
#[must_use]
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
pub const fn cell_var(i: usize, j: usize, n: usize) -> i32 {
    (i * 81 + j * 9 + n + 1) as i32
}

impl Board {
    /// Parses nine lines of nine digits.
    ///
    /// # Errors
    ///
    /// Returns a message if there are not exactly nine non-empty lines or a
    /// line is not nine digits.
    pub fn parse(text: &str) -> Result<Self, String> {
        let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        if lines.len() != 9 {
            return Err(format!("expected 9 rows, found {}", lines.len()));
        }

        let mut cells = [[0u8; 9]; 9];
        for (i, line) in lines.iter().enumerate() {
            let digits: Vec<u8> = line
                .chars()
                .filter_map(|c| c.to_digit(10))
                .map(|d| u8::try_from(d).unwrap_or(0))
                .collect();
            if digits.len() != 9 || line.chars().any(|c| !c.is_ascii_digit()) {
                return Err(format!("row {} is not nine digits: '{line}'", i + 1));
            }
            for (j, &d) in digits.iter().enumerate() {
                cells[i][j] = d;
            }
        }
        Ok(Self(cells))
    }

    /// The digit at `(i, j)`, 0 when blank.
    #[must_use]
    pub const fn get(&self, i: usize, j: usize) -> u8 {
        self.0[i][j]
    }

    /// Encodes the board into CNF.
    #[must_use]
    pub fn to_cnf<L: Literal>(&self) -> Cnf<L> {
        let mut clauses: Vec<Vec<i32>> = Vec::new();

        // givens
        for i in 0..9 {
            for j in 0..9 {
                let digit = self.0[i][j];
                if digit != 0 {
                    clauses.push(vec![cell_var(i, j, digit as usize - 1)]);
                }
            }
        }

        // every cell holds at least one digit
        for i in 0..9 {
            for j in 0..9 {
                clauses.push((0..9).map(|n| cell_var(i, j, n)).collect());
            }
        }

        // and at most one
        for i in 0..9 {
            for j in 0..9 {
                for (x, y) in (0..9).tuple_combinations() {
                    clauses.push(vec![-cell_var(i, j, x), -cell_var(i, j, y)]);
                }
            }
        }

        // every row contains every digit
        for i in 0..9 {
            for n in 0..9 {
                clauses.push((0..9).map(|j| cell_var(i, j, n)).collect());
            }
        }

        // every column contains every digit
        for j in 0..9 {
            for n in 0..9 {
                clauses.push((0..9).map(|i| cell_var(i, j, n)).collect());
            }
        }

        // every 3x3 box contains every digit
        for r in 0..3 {
            for s in 0..3 {
                for n in 0..9 {
                    clauses.push(
                        (0..3)
                            .cartesian_product(0..3)
                            .map(|(i, j)| cell_var(3 * r + i, 3 * s + j, n))
                            .collect(),
                    );
                }
            }
        }

        let mut cnf = Cnf::new(clauses);
        cnf.num_vars = cnf.num_vars.max(729);
        cnf
    }

    /// Decodes a model back into a board: each positive cell variable fills
    /// its cell. Negative and missing literals are ignored.
    #[must_use]
    pub fn decode(&self, solution: &Solutions) -> Self {
        let mut board = *self;
        for lit in solution.iter().filter(|&l| l > 0 && l <= 729) {
            let p = (lit - 1) as usize;
            let i = p / 81;
            let j = (p % 81) / 9;
            let n = p % 9;
            #[allow(clippy::cast_possible_truncation)]
            {
                board.0[i][j] = n as u8 + 1;
            }
        }
        board
    }
}

impl Display for Board {
    /// Nine lines of nine digits, blanks as `0`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.0 {
            for &d in row {
                write!(f, "{d}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

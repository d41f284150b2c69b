#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! This module provides functionality for solving Sudoku puzzles as SAT.

/// The `solver` module contains the board representation, CNF encoding, and
/// model decoding.
pub mod solver;

//! A CDCL (Conflict-Driven Clause Learning) SAT solver, a propositional
//! formula front-end that emits DIMACS via the Tseitin transformation, and a
//! Sudoku tool that compiles a board to CNF and decodes the solver's model.

/// The `logic` module parses infix propositional formulas and encodes them
/// into equisatisfiable CNF.
pub mod logic;

/// The `sat` module implements the SAT solver core and its DIMACS I/O.
pub mod sat;

/// The `sudoku` module encodes 9x9 Sudoku boards as CNF and decodes models.
pub mod sudoku;

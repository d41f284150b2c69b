#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! The CDCL driver.
//!
//! The solver owns every piece of search state: the clause database, the
//! trail, the assignment store, the watch index, the conflict analyser, the
//! variable ordering, and the reduction schedule. `solve` runs the classic
//! loop: propagate to saturation; on conflict, learn a clause and backjump;
//! otherwise decide the next variable and occasionally shrink the learnt
//! partition. It terminates with a model or with unsatisfiability.

use crate::sat::assignment::Assignment;
use crate::sat::backoff::Backoff;
use crate::sat::clause::Clause;
use crate::sat::cnf::Cnf;
use crate::sat::conflict_analysis::{Analyser, Learnt};
use crate::sat::db::ClauseDb;
use crate::sat::literal::{Literal, PackedLiteral, Variable};
use crate::sat::propagation::Propagator;
use crate::sat::trail::{Reason, Trail};
use crate::sat::variable_selection::Vsids;
use std::fmt::Display;

/// A satisfying assignment: one signed DIMACS literal per assigned variable,
/// ordered by variable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Solutions {
    literals: Vec<i32>,
}

impl Solutions {
    /// Builds a model from signed literals, sorting by variable.
    #[must_use]
    pub fn new(literals: &[i32]) -> Self {
        let mut literals = literals.to_vec();
        literals.sort_unstable_by_key(|l| l.abs());
        Self { literals }
    }

    /// Whether the model assigns this exact literal true.
    #[must_use]
    pub fn contains(&self, lit: i32) -> bool {
        self.get(lit.unsigned_abs()) == Some(lit)
    }

    /// The literal the model assigns for a variable, if any.
    #[must_use]
    pub fn get(&self, var: u32) -> Option<i32> {
        #[allow(clippy::cast_possible_wrap)]
        let var = var as i32;
        self.literals
            .binary_search_by_key(&var, |l| l.abs())
            .ok()
            .map(|idx| self.literals[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.literals.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }
}

impl Display for Solutions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for lit in &self.literals {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{lit}")?;
            first = false;
        }
        Ok(())
    }
}

/// Counters accumulated over one `solve` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolverStats {
    pub decisions: usize,
    pub conflicts: usize,
    pub propagations: usize,
    pub learnt_clauses: usize,
    pub reductions: usize,
}

/// A CDCL SAT solver over a loaded formula.
#[derive(Debug, Clone)]
pub struct Solver<L: Literal = PackedLiteral> {
    /// The original formula, kept verbatim for model verification.
    pub cnf: Cnf<L>,
    num_vars: usize,
    assignment: Assignment,
    trail: Trail<L>,
    db: ClauseDb<L>,
    propagator: Propagator<L>,
    analyser: Analyser<L>,
    selector: Vsids,
    backoff: Backoff,
    decision_level: usize,
    units: Vec<L>,
    unsat_at_load: bool,
    stats: SolverStats,
}

impl<L: Literal> Solver<L> {
    /// Loads a formula: duplicate literals were collapsed and tautologies
    /// dropped by `Cnf`; here unit clauses are routed to the level-0 queue,
    /// an empty clause marks the formula unsatisfiable, and everything else
    /// enters the database with watches on its first two literals.
    #[must_use]
    pub fn new(cnf: Cnf<L>) -> Self {
        let num_vars = cnf.num_vars;
        let mut db = ClauseDb::new();
        let mut propagator = Propagator::new(num_vars);
        let mut units = Vec::new();
        let mut unsat_at_load = false;

        for clause in cnf.iter() {
            if clause.is_empty() {
                unsat_at_load = true;
            } else if clause.is_unit() {
                units.push(clause[0]);
            } else {
                let cref = db.add_persistent(clause.clone());
                propagator.attach(&db[cref], cref);
            }
        }

        let backoff = Backoff::new(cnf.len());

        Self {
            num_vars,
            assignment: Assignment::new(num_vars),
            trail: Trail::new(num_vars),
            db,
            propagator,
            analyser: Analyser::new(num_vars),
            selector: Vsids::new(num_vars),
            backoff,
            decision_level: 0,
            units,
            unsat_at_load,
            cnf,
            stats: SolverStats::default(),
        }
    }

    /// Runs the search to completion. Returns a model on satisfiability and
    /// `None` on unsatisfiability.
    pub fn solve(&mut self) -> Option<Solutions> {
        if self.unsat_at_load {
            return None;
        }

        // toplevel facts from the input
        let units = std::mem::take(&mut self.units);
        for lit in units {
            match self.assignment.literal_value(lit) {
                Some(true) => {}
                Some(false) => return None,
                None => self.assign(lit, Reason::Decision),
            }
        }

        loop {
            while let Some(conflict) =
                self.propagator
                    .propagate(&mut self.trail, &mut self.assignment, &mut self.db)
            {
                self.stats.conflicts += 1;
                if self.decision_level == 0 {
                    return None;
                }
                self.learn(conflict);
                self.backoff.on_conflict(self.db.num_persistent());
            }

            let Some(var) = self.selector.pick(&self.assignment) else {
                return Some(self.solutions());
            };
            self.stats.decisions += 1;
            self.decision_level += 1;
            let lit = L::new(var, self.assignment.phase(var));
            self.assign(lit, Reason::Decision);

            if self.backoff.should_reduce(self.db.len()) {
                self.stats.reductions += 1;
                self.db.reduce(&mut self.propagator);
            }
        }
    }

    /// Analyses a conflict, backjumps, and installs the learnt clause with
    /// its asserting literal queued for propagation.
    fn learn(&mut self, conflict: usize) {
        let (learnt, to_bump) = self.analyser.analyse(&self.db, &self.trail, conflict);
        self.selector.bumps(to_bump);
        self.selector.decay();

        match learnt {
            Learnt::Unit(lit) => {
                self.backjump(0);
                self.assign(lit, Reason::Decision);
            }
            Learnt::Clause(literals, target) => {
                self.backjump(target);
                self.stats.learnt_clauses += 1;
                let asserting = literals[0];
                let cref = self.db.add_learnt(Clause::learnt(literals));
                self.propagator.attach(&self.db[cref], cref);
                self.assign(asserting, Reason::Clause(cref));
            }
        }
    }

    /// Records an assignment at the current decision level and locks its
    /// reason clause.
    fn assign(&mut self, lit: L, reason: Reason) {
        self.assignment.assign(lit);
        if let Reason::Clause(cref) = reason {
            self.db[cref].locked = true;
        }
        self.trail.push(lit, self.decision_level, reason);
    }

    /// Undoes every assignment above `target`, unlocking reasons and
    /// returning variables to the ordering heap. Never crosses level 0.
    fn backjump(&mut self, target: usize) {
        while self.trail.last().is_some_and(|step| step.level > target) {
            if let Some(step) = self.trail.pop() {
                let var = step.lit.variable();
                self.assignment.unassign(var);
                if let Reason::Clause(cref) = step.reason {
                    self.db[cref].locked = false;
                }
                self.selector.push(var);
            }
        }
        self.decision_level = target;
        self.trail.rewind_head();
    }

    /// The model for every currently assigned variable.
    #[must_use]
    pub fn solutions(&self) -> Solutions {
        let mut literals = Vec::with_capacity(self.num_vars);
        #[allow(clippy::cast_possible_truncation)]
        for var in 1..=self.num_vars as Variable {
            if let Some(value) = self.assignment.value(var) {
                #[allow(clippy::cast_possible_wrap)]
                let lit = var as i32;
                literals.push(if value { lit } else { -lit });
            }
        }
        Solutions::new(&literals)
    }

    /// Search counters, including the propagation count.
    #[must_use]
    pub fn stats(&self) -> SolverStats {
        SolverStats {
            propagations: self.propagator.num_propagations(),
            ..self.stats
        }
    }
}

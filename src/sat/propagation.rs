#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! Unit propagation via the two-watched-literals scheme.
//!
//! Every clause of length two or more watches its first two literals. A
//! clause only needs attention when one of its watched literals becomes
//! false: either another watch can be found among the remaining literals, or
//! the clause is satisfied, unit, or falsified. Watch lists are keyed by
//! literal, so each new assignment visits exactly the clauses watching its
//! negation.

use crate::sat::assignment::Assignment;
use crate::sat::clause::Clause;
use crate::sat::db::{ClauseDb, ClauseRef};
use crate::sat::literal::{Literal, PackedLiteral};
use crate::sat::trail::{Reason, Trail};
use smallvec::SmallVec;

/// Outcome of inspecting one clause whose watched literal was falsified.
enum ClauseStatus<L: Literal> {
    /// The clause is satisfied through its other watch; leave it in place.
    Satisfied,
    /// A replacement watch was found; the clause has moved to another list.
    Relocated,
    /// All but the other watch are false; that literal must be assigned.
    Unit(L),
    /// Every literal is false.
    Conflict,
}

/// Watched-literal index and propagation engine.
#[derive(Debug, Clone, Default)]
pub struct Propagator<L: Literal = PackedLiteral> {
    watches: Vec<SmallVec<[ClauseRef; 6]>>,
    num_propagations: usize,
    marker: std::marker::PhantomData<L>,
}

impl<L: Literal> Propagator<L> {
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            watches: vec![SmallVec::new(); (num_vars + 1) * 2],
            num_propagations: 0,
            marker: std::marker::PhantomData,
        }
    }

    /// Registers a clause under its first two literals.
    pub fn attach(&mut self, clause: &Clause<L>, cref: ClauseRef) {
        debug_assert!(clause.len() >= 2);
        self.watches[clause[0].index()].push(cref);
        self.watches[clause[1].index()].push(cref);
    }

    /// Removes a clause from both of its watch lists. Must be called before
    /// the clause is freed.
    pub fn detach(&mut self, clause: &Clause<L>, cref: ClauseRef) {
        for watched in [clause[0], clause[1]] {
            let list = &mut self.watches[watched.index()];
            if let Some(pos) = list.iter().position(|&c| c == cref) {
                list.swap_remove(pos);
            }
        }
    }

    /// Total number of trail entries processed.
    #[must_use]
    pub const fn num_propagations(&self) -> usize {
        self.num_propagations
    }

    /// Propagates every unprocessed trail entry in chronological order.
    ///
    /// Deduced units are assigned immediately and appended to the trail, so
    /// they are processed in turn. Returns the first falsified clause, or
    /// `None` once the trail is saturated.
    pub fn propagate(
        &mut self,
        trail: &mut Trail<L>,
        assignment: &mut Assignment,
        db: &mut ClauseDb<L>,
    ) -> Option<ClauseRef> {
        while trail.head < trail.len() {
            let lit = trail[trail.head].lit;
            trail.head += 1;
            self.num_propagations += 1;

            let false_lit = lit.negated();
            let watch_idx = false_lit.index();

            let mut i = 0;
            while i < self.watches[watch_idx].len() {
                let cref = self.watches[watch_idx][i];
                match self.inspect(cref, false_lit, assignment, db) {
                    ClauseStatus::Relocated => {
                        self.watches[watch_idx].swap_remove(i);
                    }
                    ClauseStatus::Satisfied => i += 1,
                    ClauseStatus::Unit(unit) => {
                        assignment.assign(unit);
                        db[cref].locked = true;
                        trail.push(unit, trail.decision_level(), Reason::Clause(cref));
                        i += 1;
                    }
                    ClauseStatus::Conflict => return Some(cref),
                }
            }
        }
        None
    }

    /// Handles one clause watching `false_lit`, which was just falsified.
    ///
    /// Normalises the watches so the falsified one sits at position 1, then
    /// either confirms satisfaction through position 0, relocates the watch
    /// to a non-false literal, or reports the clause unit or falsified.
    fn inspect(
        &mut self,
        cref: ClauseRef,
        false_lit: L,
        assignment: &Assignment,
        db: &mut ClauseDb<L>,
    ) -> ClauseStatus<L> {
        let clause = &mut db[cref];

        if clause[0] == false_lit {
            clause.swap(0, 1);
        }
        debug_assert_eq!(clause[1], false_lit);

        let other = clause[0];
        if assignment.literal_value(other) == Some(true) {
            return ClauseStatus::Satisfied;
        }

        for k in 2..clause.len() {
            if assignment.literal_value(clause[k]) != Some(false) {
                let replacement = clause[k];
                clause.swap(1, k);
                self.watches[replacement.index()].push(cref);
                return ClauseStatus::Relocated;
            }
        }

        match assignment.literal_value(other) {
            None => ClauseStatus::Unit(other),
            _ => ClauseStatus::Conflict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestLiteral = PackedLiteral;

    fn lit(value: i32) -> TestLiteral {
        Literal::from_dimacs(value)
    }

    fn setup(clauses: Vec<Vec<i32>>, num_vars: usize) -> (ClauseDb, Propagator, Trail<TestLiteral>, Assignment) {
        let mut db = ClauseDb::new();
        let mut propagator = Propagator::new(num_vars);
        for c in clauses {
            let clause = Clause::from(c);
            let cref = db.add_persistent(clause);
            propagator.attach(&db[cref], cref);
        }
        (db, propagator, Trail::new(num_vars), Assignment::new(num_vars))
    }

    fn decide(
        trail: &mut Trail<TestLiteral>,
        assignment: &mut Assignment,
        l: TestLiteral,
        level: usize,
    ) {
        assignment.assign(l);
        trail.push(l, level, Reason::Decision);
    }

    #[test]
    fn test_chain_propagation() {
        let (mut db, mut propagator, mut trail, mut assignment) =
            setup(vec![vec![-1, 2], vec![-2, 3]], 4);

        decide(&mut trail, &mut assignment, lit(1), 1);
        let conflict = propagator.propagate(&mut trail, &mut assignment, &mut db);

        assert!(conflict.is_none());
        assert_eq!(trail.len(), 3);
        assert_eq!(trail[1].lit, lit(2));
        assert_eq!(trail[1].reason, Reason::Clause(0));
        assert_eq!(trail[2].lit, lit(3));
        assert_eq!(trail[2].reason, Reason::Clause(1));
        assert_eq!(assignment.value(3), Some(true));
        assert_eq!(propagator.num_propagations(), 3);
    }

    #[test]
    fn test_conflict_detected() {
        let (mut db, mut propagator, mut trail, mut assignment) =
            setup(vec![vec![-1, 2], vec![-1, -2]], 3);

        decide(&mut trail, &mut assignment, lit(1), 1);
        let conflict = propagator.propagate(&mut trail, &mut assignment, &mut db);

        assert_eq!(conflict, Some(1));
    }

    #[test]
    fn test_unit_reason_locks_clause() {
        let (mut db, mut propagator, mut trail, mut assignment) = setup(vec![vec![-1, 2]], 3);

        decide(&mut trail, &mut assignment, lit(1), 1);
        propagator.propagate(&mut trail, &mut assignment, &mut db);

        assert!(db[0].locked);
    }

    #[test]
    fn test_watch_relocation() {
        let (mut db, mut propagator, mut trail, mut assignment) =
            setup(vec![vec![-1, 2, 3, -4]], 5);

        decide(&mut trail, &mut assignment, lit(1), 1);
        let conflict = propagator.propagate(&mut trail, &mut assignment, &mut db);
        assert!(conflict.is_none());

        // the falsified watch moved on; no assignment was forced
        assert_eq!(trail.len(), 1);
        assert!(propagator.watches[lit(-1).index()].is_empty());
        assert!(propagator.watches[lit(3).index()].contains(&0));
    }

    #[test]
    fn test_satisfied_clause_left_alone() {
        let (mut db, mut propagator, mut trail, mut assignment) = setup(vec![vec![1, 2]], 3);

        decide(&mut trail, &mut assignment, lit(1), 1);
        decide(&mut trail, &mut assignment, lit(-2), 2);
        let conflict = propagator.propagate(&mut trail, &mut assignment, &mut db);

        assert!(conflict.is_none());
        assert!(propagator.watches[lit(1).index()].contains(&0));
        assert!(propagator.watches[lit(2).index()].contains(&0));
    }

    #[test]
    fn test_detach_removes_both_watches() {
        let (db, mut propagator, _trail, _assignment) = setup(vec![vec![1, 2, 3]], 4);

        propagator.detach(&db[0], 0);
        assert!(propagator.watches[lit(1).index()].is_empty());
        assert!(propagator.watches[lit(2).index()].is_empty());
    }
}

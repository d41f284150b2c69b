#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! Conflict analysis to the first Unique Implication Point.
//!
//! When propagation falsifies a clause, the chain of implications that led
//! there is resolved backwards along the trail until exactly one literal of
//! the current decision level remains: the first UIP. The negation of that
//! literal, together with the lower-level literals gathered along the way,
//! forms the learnt clause. The clause is false under the current assignment
//! and becomes unit after backjumping to the highest level among its other
//! literals.
//!
//! The analyser only reads the solver state; the driver applies the result
//! (backjump, clause installation, asserting assignment, activity bumps).

use crate::sat::db::{ClauseDb, ClauseRef};
use crate::sat::literal::{Literal, PackedLiteral, Variable};
use crate::sat::trail::{Reason, Trail};
use bit_vec::BitVec;
use smallvec::SmallVec;

/// A clause learnt from a conflict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Learnt<L: Literal> {
    /// The resolvent collapsed to a single literal; it holds at level 0.
    Unit(L),
    /// A learnt clause and the level to backjump to. The asserting literal is
    /// at position 0 and the highest-level remaining literal at position 1,
    /// so the literals are already in watch order.
    Clause(SmallVec<[L; 8]>, usize),
}

/// Encapsulates the state for conflict analysis. The `seen` marks are kept
/// across analyses to reuse the allocation; they are cleared on the way out.
#[derive(Debug, Clone, Default)]
pub struct Analyser<L: Literal = PackedLiteral> {
    seen: BitVec,
    marker: std::marker::PhantomData<L>,
    /// Number of conflicts analysed.
    pub count: usize,
}

impl<L: Literal> Analyser<L> {
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            seen: BitVec::from_elem(num_vars + 1, false),
            marker: std::marker::PhantomData,
            count: 0,
        }
    }

    fn is_seen(&self, var: Variable) -> bool {
        self.seen.get(var as usize).unwrap_or(false)
    }

    fn set_seen(&mut self, var: Variable) {
        self.seen.set(var as usize, true);
    }

    fn clear_seen(&mut self, var: Variable) {
        self.seen.set(var as usize, false);
    }

    /// Derives the first-UIP learnt clause from a falsified clause.
    ///
    /// Must only be called at decision level 1 or higher. Returns the learnt
    /// result and the variables whose activities should be bumped (every
    /// variable that took part in the resolution).
    pub fn analyse(
        &mut self,
        db: &ClauseDb<L>,
        trail: &Trail<L>,
        conflict: ClauseRef,
    ) -> (Learnt<L>, SmallVec<[Variable; 16]>) {
        self.count += 1;

        let current_level = trail.decision_level();
        debug_assert!(current_level > 0);

        // position 0 is reserved for the asserting literal
        let mut learnt: SmallVec<[L; 8]> = SmallVec::new();
        learnt.push(L::default());
        let mut to_bump: SmallVec<[Variable; 16]> = SmallVec::new();
        let mut unresolved = 0usize;

        for &lit in db[conflict].iter() {
            let var = lit.variable();
            self.set_seen(var);
            to_bump.push(var);
            if trail.level(var) < current_level {
                learnt.push(lit);
            } else {
                unresolved += 1;
            }
        }

        // walk the trail backwards, resolving away current-level literals
        // until only the UIP remains marked
        let mut i = trail.len();
        let uip = loop {
            i -= 1;
            let step = &trail[i];
            let var = step.lit.variable();
            if !self.is_seen(var) {
                continue;
            }

            self.clear_seen(var);
            unresolved -= 1;
            if unresolved == 0 {
                break step.lit;
            }

            let Reason::Clause(antecedent) = step.reason else {
                // a decision with marked literals still pending cannot occur:
                // every current-level implication sits above its decision
                break step.lit;
            };
            for &lit in db[antecedent].iter().skip(1) {
                let var = lit.variable();
                if self.is_seen(var) {
                    continue;
                }
                self.set_seen(var);
                to_bump.push(var);
                if trail.level(var) < current_level {
                    learnt.push(lit);
                } else {
                    unresolved += 1;
                }
            }
        };

        learnt[0] = uip.negated();
        for &lit in &learnt {
            self.clear_seen(lit.variable());
        }

        if learnt.len() == 1 {
            return (Learnt::Unit(learnt[0]), to_bump);
        }

        // the highest-level non-asserting literal becomes the second watch,
        // and its level the backjump target
        let mut max_level = 0;
        let mut max_idx = 1;
        for k in 1..learnt.len() {
            let level = trail.level(learnt[k].variable());
            if level > max_level {
                max_level = level;
                max_idx = k;
            }
        }
        learnt.swap(1, max_idx);

        (Learnt::Clause(learnt, max_level), to_bump)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::clause::Clause;

    type TestLiteral = PackedLiteral;

    fn lit(value: i32) -> TestLiteral {
        Literal::from_dimacs(value)
    }

    fn db_of(clauses: Vec<Vec<i32>>) -> ClauseDb<TestLiteral> {
        let mut db = ClauseDb::new();
        for c in clauses {
            db.add_persistent(Clause::from(c));
        }
        db
    }

    // reason clauses below keep the forced literal at position 0, as
    // propagation leaves them

    #[test]
    fn test_single_implication_yields_unit() {
        // decide 1; clause 0 forces 2; clause 1 is falsified
        let db = db_of(vec![vec![2, -1], vec![-1, -2]]);
        let mut trail: Trail<TestLiteral> = Trail::new(3);
        trail.push(lit(1), 1, Reason::Decision);
        trail.push(lit(2), 1, Reason::Clause(0));

        let mut analyser: Analyser<TestLiteral> = Analyser::new(3);
        let (learnt, to_bump) = analyser.analyse(&db, &trail, 1);

        assert_eq!(learnt, Learnt::Unit(lit(-1)));
        assert!(to_bump.contains(&1));
        assert!(to_bump.contains(&2));
        assert_eq!(analyser.count, 1);
    }

    #[test]
    fn test_first_uip_cuts_below_decision() {
        // level 1: decide 1. level 2: decide 2, forcing 3 (clause 1) and
        // then 4 and -4 clash (clauses 2 and 3). the UIP is 3, not the
        // decision 2.
        let db = db_of(vec![
            vec![-1, -4, 5], // irrelevant to the conflict cut
            vec![3, -2],
            vec![4, -3],
            vec![-3, -4],
        ]);
        let mut trail: Trail<TestLiteral> = Trail::new(5);
        trail.push(lit(1), 1, Reason::Decision);
        trail.push(lit(2), 2, Reason::Decision);
        trail.push(lit(3), 2, Reason::Clause(1));
        trail.push(lit(4), 2, Reason::Clause(2));

        let mut analyser: Analyser<TestLiteral> = Analyser::new(5);
        let (learnt, _) = analyser.analyse(&db, &trail, 3);

        assert_eq!(learnt, Learnt::Unit(lit(-3)));
    }

    #[test]
    fn test_learnt_clause_carries_lower_levels() {
        // level 1: decide 1. level 2: decide 2; clause 1 (-1 -2 3) forces 3;
        // clause 2 (-3 -2 -1) is falsified. resolving the conflict with the
        // reason of 3 leaves {-1, -2}: UIP -2, backjump to level 1.
        let db = db_of(vec![
            vec![1, 2, 3], // padding so reasons use later indices
            vec![3, -1, -2],
            vec![-3, -2, -1],
        ]);
        let mut trail: Trail<TestLiteral> = Trail::new(4);
        trail.push(lit(1), 1, Reason::Decision);
        trail.push(lit(2), 2, Reason::Decision);
        trail.push(lit(3), 2, Reason::Clause(1));

        let mut analyser: Analyser<TestLiteral> = Analyser::new(4);
        let (learnt, to_bump) = analyser.analyse(&db, &trail, 2);

        match learnt {
            Learnt::Clause(lits, backjump) => {
                assert_eq!(backjump, 1);
                assert_eq!(lits.len(), 2);
                assert_eq!(lits[0], lit(-2));
                assert_eq!(lits[1], lit(-1));
            }
            Learnt::Unit(l) => panic!("expected a binary learnt clause, got unit {l:?}"),
        }
        assert_eq!(to_bump.len(), 3);
    }
}

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! Tracks the truth state of every variable during the search.
//!
//! Each variable is unassigned or assigned a truth value. The store also
//! remembers the last polarity each variable held (its saved phase), which
//! outlives unassignment and steers later decisions on the same variable.

use crate::sat::literal::{Literal, Variable};
use crate::sat::phase_saving::SavedPhases;

/// Represents the assignment state of a propositional variable.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Default, Hash)]
pub enum VarState {
    /// The variable has not been assigned a truth value.
    #[default]
    Unassigned,
    /// The variable has been assigned a specific truth value.
    Assigned(bool),
}

impl VarState {
    /// Checks if the variable state is `Assigned`.
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        matches!(self, Self::Assigned(_))
    }

    /// Checks if the variable state is `Unassigned`.
    #[must_use]
    pub const fn is_unassigned(self) -> bool {
        !self.is_assigned()
    }
}

impl From<VarState> for Option<bool> {
    fn from(s: VarState) -> Self {
        match s {
            VarState::Assigned(b) => Some(b),
            VarState::Unassigned => None,
        }
    }
}

/// Dense per-variable assignment store. Variables are `1..=num_vars`; slot 0
/// is unused.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment {
    states: Vec<VarState>,
    phases: SavedPhases,
}

impl Assignment {
    /// Creates a store for `num_vars` variables, all unassigned with negative
    /// saved phases.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            states: vec![VarState::Unassigned; num_vars + 1],
            phases: SavedPhases::new(num_vars),
        }
    }

    /// Assigns a literal: its variable takes the literal's polarity, and the
    /// polarity is remembered as the variable's phase.
    pub fn assign(&mut self, lit: impl Literal) {
        let var = lit.variable();
        self.states[var as usize] = VarState::Assigned(lit.polarity());
        self.phases.save(var, lit.polarity());
    }

    /// Clears a variable's truth value. Its saved phase is kept.
    pub fn unassign(&mut self, var: Variable) {
        self.states[var as usize] = VarState::Unassigned;
    }

    /// The truth value of a variable, if assigned.
    #[must_use]
    pub fn value(&self, var: Variable) -> Option<bool> {
        self.states[var as usize].into()
    }

    /// Checks if a variable is assigned.
    #[must_use]
    pub fn is_assigned(&self, var: Variable) -> bool {
        self.states[var as usize].is_assigned()
    }

    /// The truth value of a literal under the current assignment, or `None`
    /// if its variable is unassigned.
    #[must_use]
    pub fn literal_value(&self, lit: impl Literal) -> Option<bool> {
        self.value(lit.variable()).map(|b| b == lit.polarity())
    }

    /// The saved phase of a variable: the polarity it last held, negative if
    /// it was never assigned.
    #[must_use]
    pub fn phase(&self, var: Variable) -> bool {
        self.phases.get(var)
    }
}

//! Mathematical constraint types for optimization.
//!
//! These types represent linear constraints over decision variables, used
//! both when modeling roster rules and at the solver interface.

use serde::{Deserialize, Serialize};

/// A single sparse linear constraint: `sum(coef * x[var]) {>=, <=, =} rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// `(variable index, coefficient)` pairs. Variables not listed have a
    /// zero coefficient.
    pub terms: Vec<(usize, f64)>,
    /// Constraint sense (>=, <=, =).
    pub sense: ConstraintSense,
    /// Right-hand side value.
    pub rhs: f64,
}

impl Constraint {
    /// Create a >= constraint.
    #[must_use]
    pub const fn geq(terms: Vec<(usize, f64)>, rhs: f64) -> Self {
        Self {
            terms,
            sense: ConstraintSense::GreaterEqual,
            rhs,
        }
    }

    /// Create a <= constraint.
    #[must_use]
    pub const fn leq(terms: Vec<(usize, f64)>, rhs: f64) -> Self {
        Self {
            terms,
            sense: ConstraintSense::LessEqual,
            rhs,
        }
    }

    /// Create an = constraint.
    #[must_use]
    pub const fn eq(terms: Vec<(usize, f64)>, rhs: f64) -> Self {
        Self {
            terms,
            sense: ConstraintSense::Equal,
            rhs,
        }
    }

    /// Unit-coefficient sum over `vars`.
    pub fn count(vars: impl IntoIterator<Item = usize>) -> Vec<(usize, f64)> {
        vars.into_iter().map(|v| (v, 1.0)).collect()
    }

    /// Pin one variable to a value.
    #[must_use]
    pub fn fix(var: usize, value: f64) -> Self {
        Self::eq(vec![(var, 1.0)], value)
    }

    /// Evaluate the left-hand side at `values`.
    #[must_use]
    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(var, coef)| coef * values.get(*var).copied().unwrap_or(0.0))
            .sum()
    }

    /// True when `values` satisfies the constraint within `tolerance`.
    #[must_use]
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.lhs(values);
        match self.sense {
            ConstraintSense::GreaterEqual => lhs >= self.rhs - tolerance,
            ConstraintSense::LessEqual => lhs <= self.rhs + tolerance,
            ConstraintSense::Equal => (lhs - self.rhs).abs() <= tolerance,
        }
    }
}

/// Constraint sense (comparison operator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintSense {
    /// Greater than or equal (>=).
    GreaterEqual,
    /// Less than or equal (<=).
    LessEqual,
    /// Equal (=).
    Equal,
}

/// Bounds on a variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariableBounds {
    /// Lower bound (None = -infinity).
    pub lower: Option<f64>,
    /// Upper bound (None = +infinity).
    pub upper: Option<f64>,
}

impl Default for VariableBounds {
    fn default() -> Self {
        Self {
            lower: Some(0.0),
            upper: None,
        }
    }
}

impl VariableBounds {
    /// Binary variable bounds [0, 1].
    #[must_use]
    pub const fn binary() -> Self {
        Self {
            lower: Some(0.0),
            upper: Some(1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn satisfaction_respects_sense() {
        let values = [1.0, 0.0, 1.0];
        let c = Constraint::leq(Constraint::count([0, 1, 2]), 2.0);
        assert!(c.is_satisfied(&values, 1e-6));

        let c = Constraint::geq(vec![(0, 3.0), (2, 1.0)], 5.0);
        assert!(!c.is_satisfied(&values, 1e-6));

        assert!(Constraint::fix(1, 0.0).is_satisfied(&values, 1e-6));
    }
}

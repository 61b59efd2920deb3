//! Sampled numeric domains.

use std::fmt;

use crate::error::ValidationError;

/// `[min, max]` sampled every `step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Domain {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Check the bounds a caller must guarantee before scanning.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.min.is_finite() {
            return Err(ValidationError::NonFiniteBound { name: "min" });
        }
        if !self.max.is_finite() {
            return Err(ValidationError::NonFiniteBound { name: "max" });
        }
        if self.step.is_nan() || self.step <= 0.0 {
            return Err(ValidationError::NonPositiveStep { step: self.step });
        }
        if !self.step.is_finite() {
            return Err(ValidationError::NonFiniteBound { name: "step" });
        }
        if self.min >= self.max {
            return Err(ValidationError::InvertedDomain {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Approximate number of [`tolerant_grid`](Self::tolerant_grid) points,
    /// for budget checks.
    pub fn estimated_samples(&self) -> f64 {
        ((self.max + self.step / 2.0 - self.min) / self.step).floor() + 1.0
    }

    /// `min, min + step, ...` while `x <= max`.
    pub fn strict_grid(&self) -> Grid {
        Grid::new(self.min, self.max, self.step)
    }

    /// Like [`strict_grid`](Self::strict_grid) but continues while
    /// `x <= max + step / 2`, so `max` is reached despite rounding drift.
    pub fn tolerant_grid(&self) -> Grid {
        Grid::new(self.min, self.max + self.step / 2.0, self.step)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}] step {}", self.min, self.max, self.step)
    }
}

/// Grid points produced by accumulation (`x += step`).
///
/// A step that is not a positive finite number yields no points. Bounds are
/// not otherwise checked: an infinite `max` gives an unbounded iterator.
#[derive(Debug, Clone)]
pub struct Grid {
    next: f64,
    limit: f64,
    step: f64,
}

impl Grid {
    fn new(start: f64, limit: f64, step: f64) -> Self {
        let step = if step.is_finite() && step > 0.0 { step } else { f64::NAN };
        Self {
            next: start,
            limit,
            step,
        }
    }
}

impl Iterator for Grid {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        // NaN in any field fails the comparison and ends the grid
        if !(self.step > 0.0 && self.next <= self.limit) {
            return None;
        }
        let x = self.next;
        let advanced = x + self.step;
        // A step below the float resolution at x would never advance
        self.next = if advanced > x { advanced } else { f64::NAN };
        Some(x)
    }
}

/// Outcome of classifying a quantifier-free predicate over a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateType {
    AlwaysTrue,
    AlwaysFalse,
    Satisfiable,
}

impl PredicateType {
    pub fn name(self) -> &'static str {
        match self {
            PredicateType::AlwaysTrue => "always_true",
            PredicateType::AlwaysFalse => "always_false",
            PredicateType::Satisfiable => "satisfiable",
        }
    }
}

impl fmt::Display for PredicateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maximal run of sampled points where the predicate held.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TruthSegment {
    pub start: f64,
    pub end: f64,
}

impl fmt::Display for TruthSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

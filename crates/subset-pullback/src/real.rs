//! Intervals of the real line, the usual codomain subsets of scalar fields.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use subset_lattice::{Named, Point, SubsetError, TopologicalSubset};

/// One end of an interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    Open(f64),
    Closed(f64),
    Unbounded,
}

impl Bound {
    fn value(self) -> Option<f64> {
        match self {
            Bound::Open(x) | Bound::Closed(x) => Some(x),
            Bound::Unbounded => None,
        }
    }

    fn is_open_end(self) -> bool {
        !matches!(self, Bound::Closed(_))
    }

    fn is_closed_end(self) -> bool {
        !matches!(self, Bound::Open(_))
    }

    fn closed(self) -> Self {
        match self {
            Bound::Open(x) => Bound::Closed(x),
            other => other,
        }
    }
}

/// A connected subset of ℝ.
///
/// Unnamed intervals are named after their bounds, e.g. `(1, 2)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealInterval {
    lower: Bound,
    upper: Bound,
    name: String,
    latex_name: String,
    explicitly_named: bool,
}

impl RealInterval {
    pub fn new(lower: Bound, upper: Bound) -> Result<Self, SubsetError> {
        for bound in [lower, upper] {
            if let Some(x) = bound.value() {
                if !x.is_finite() {
                    return Err(SubsetError::InvalidInterval(format!(
                        "finite bound expected, got {x}"
                    )));
                }
            }
        }
        if let (Some(a), Some(b)) = (lower.value(), upper.value()) {
            if a > b {
                return Err(SubsetError::InvalidInterval(format!(
                    "lower bound {a} exceeds upper bound {b}"
                )));
            }
        }
        Ok(Self::unnamed(lower, upper))
    }

    fn unnamed(lower: Bound, upper: Bound) -> Self {
        Self {
            lower,
            upper,
            name: bounds_display(lower, upper, "-oo", "+oo"),
            latex_name: bounds_display(lower, upper, r"-\infty", r"+\infty"),
            explicitly_named: false,
        }
    }

    /// `(a, b)`
    pub fn open(a: f64, b: f64) -> Result<Self, SubsetError> {
        Self::new(Bound::Open(a), Bound::Open(b))
    }

    /// `[a, b]`
    pub fn closed(a: f64, b: f64) -> Result<Self, SubsetError> {
        Self::new(Bound::Closed(a), Bound::Closed(b))
    }

    /// `(-oo, +oo)`
    pub fn real_line() -> Self {
        Self::unnamed(Bound::Unbounded, Bound::Unbounded)
    }

    /// Rename the interval. The LaTeX name follows unless set afterwards.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self.latex_name = self.name.clone();
        self.explicitly_named = true;
        self
    }

    pub fn with_latex_name(mut self, latex_name: impl Into<String>) -> Self {
        self.latex_name = latex_name.into();
        self.explicitly_named = true;
        self
    }

    pub fn lower(&self) -> Bound {
        self.lower
    }

    pub fn upper(&self) -> Bound {
        self.upper
    }

    pub fn is_empty(&self) -> bool {
        match (self.lower.value(), self.upper.value()) {
            (Some(a), Some(b)) if a == b => {
                matches!(self.lower, Bound::Open(_)) || matches!(self.upper, Bound::Open(_))
            }
            (Some(a), Some(b)) => a > b,
            _ => false,
        }
    }

    /// The interval with every finite end made closed.
    pub fn closure(&self) -> RealInterval {
        if self.is_empty() {
            return self.clone();
        }
        let closure = Self::unnamed(self.lower.closed(), self.upper.closed());
        if self.explicitly_named {
            Self {
                name: format!("cl_{}", self.name),
                latex_name: format!(r"\overline{{{}}}", self.latex_name),
                explicitly_named: true,
                ..closure
            }
        } else {
            closure
        }
    }

    fn contains_value(&self, x: f64) -> bool {
        let above = match self.lower {
            Bound::Open(a) => x > a,
            Bound::Closed(a) => x >= a,
            Bound::Unbounded => true,
        };
        let below = match self.upper {
            Bound::Open(b) => x < b,
            Bound::Closed(b) => x <= b,
            Bound::Unbounded => true,
        };
        above && below
    }
}

fn bounds_display(lower: Bound, upper: Bound, neg_inf: &str, pos_inf: &str) -> String {
    let left = match lower {
        Bound::Open(a) => format!("({a}"),
        Bound::Closed(a) => format!("[{a}"),
        Bound::Unbounded => format!("({neg_inf}"),
    };
    let right = match upper {
        Bound::Open(b) => format!("{b})"),
        Bound::Closed(b) => format!("{b}]"),
        Bound::Unbounded => format!("{pos_inf})"),
    };
    format!("{left}, {right}")
}

impl fmt::Display for RealInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bounds_display(self.lower, self.upper, "-oo", "+oo"))
    }
}

impl Named for RealInterval {
    fn name(&self) -> &str {
        &self.name
    }

    fn latex_name(&self) -> &str {
        &self.latex_name
    }
}

/// Topology relative to ℝ. The empty interval and ℝ itself are both open
/// and closed.
impl TopologicalSubset for RealInterval {
    fn is_open(&self) -> Result<bool, SubsetError> {
        Ok(self.is_empty() || (self.lower.is_open_end() && self.upper.is_open_end()))
    }

    fn is_closed(&self) -> Result<bool, SubsetError> {
        Ok(self.is_empty() || (self.lower.is_closed_end() && self.upper.is_closed_end()))
    }

    fn supports_closure(&self) -> bool {
        true
    }

    fn topological_closure(&self) -> Result<Arc<dyn TopologicalSubset>, SubsetError> {
        Ok(Arc::new(self.closure()))
    }

    fn contains(&self, point: &Point) -> Result<bool, SubsetError> {
        point.check_dim(1)?;
        Ok(self.contains_value(point.coords()[0]))
    }
}

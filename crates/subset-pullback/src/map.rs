//! Continuous maps between a manifold and a topological space.
//!
//! A map is immutable once built and shared between the pullbacks built
//! from it. Continuity is a precondition the caller guarantees; nothing
//! here checks it.

use std::fmt;
use std::sync::Arc;
use subset_lattice::{Manifold, Named, Point, SubsetError, TopologicalSubset};

type Evaluation = dyn Fn(&Point) -> Option<Point> + Send + Sync;

/// A continuous map `f: M → N`.
#[derive(Clone)]
pub struct ContinuousMap {
    domain: Manifold,
    codomain: Arc<dyn TopologicalSubset>,
    name: Option<String>,
    latex_name: Option<String>,
    evaluation: Option<Arc<Evaluation>>,
}

impl ContinuousMap {
    /// An unnamed map with no evaluation attached.
    pub fn new(domain: Manifold, codomain: Arc<dyn TopologicalSubset>) -> Self {
        Self {
            domain,
            codomain,
            name: None,
            latex_name: None,
            evaluation: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_latex_name(mut self, latex_name: impl Into<String>) -> Self {
        self.latex_name = Some(latex_name.into());
        self
    }

    /// Attach the map's formula.
    ///
    /// The closure returns `None` for points where the map is not defined.
    pub fn with_evaluation(
        mut self,
        evaluation: impl Fn(&Point) -> Option<Point> + Send + Sync + 'static,
    ) -> Self {
        self.evaluation = Some(Arc::new(evaluation));
        self
    }

    pub fn domain(&self) -> &Manifold {
        &self.domain
    }

    pub fn codomain(&self) -> &Arc<dyn TopologicalSubset> {
        &self.codomain
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn latex_name(&self) -> Option<&str> {
        self.latex_name.as_deref()
    }

    /// Image of `point`, or `None` outside the map's domain of definition.
    pub fn evaluate(&self, point: &Point) -> Result<Option<Point>, SubsetError> {
        point.check_dim(self.domain.dim())?;
        let evaluation = self.evaluation.as_deref().ok_or_else(|| {
            SubsetError::unsupported("evaluation", self.name().unwrap_or("<unnamed map>"))
        })?;
        Ok(evaluation(point))
    }
}

impl fmt::Debug for ContinuousMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContinuousMap")
            .field("name", &self.name)
            .field("domain", &self.domain)
            .field("codomain", &self.codomain.name())
            .field("evaluable", &self.evaluation.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> Manifold {
        Manifold::new(1, "R")
    }

    #[test]
    fn names_are_optional() {
        let m = Manifold::new(2, "M");
        let f = ContinuousMap::new(m.clone(), Arc::new(line()));
        assert_eq!(f.name(), None);
        assert_eq!(f.latex_name(), None);
        assert_eq!(f.domain(), &m);
        assert_eq!(f.codomain().name(), "R");

        let g = f.with_name("g").with_latex_name(r"\gamma");
        assert_eq!(g.name(), Some("g"));
        assert_eq!(g.latex_name(), Some(r"\gamma"));
    }

    #[test]
    fn evaluation_checks_domain_dimension() {
        let m = Manifold::new(2, "M");
        let r_squared = ContinuousMap::new(m, Arc::new(line()))
            .with_name("r2")
            .with_evaluation(|p| Some(Point::scalar(p.coords().iter().map(|x| x * x).sum())));

        let image = r_squared.evaluate(&Point::new(vec![1.0, 2.0])).unwrap();
        assert_eq!(image, Some(Point::scalar(5.0)));
        assert!(matches!(
            r_squared.evaluate(&Point::scalar(1.0)),
            Err(SubsetError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn missing_evaluation_is_unsupported() {
        let f = ContinuousMap::new(Manifold::new(1, "M"), Arc::new(line()));
        let err = f.evaluate(&Point::scalar(0.0)).unwrap_err();
        assert!(err.is_unsupported());
    }

    #[test]
    fn partial_maps_return_none() {
        let log = ContinuousMap::new(line(), Arc::new(line()))
            .with_name("log")
            .with_evaluation(|p| {
                let x = p.coords()[0];
                (x > 0.0).then(|| Point::scalar(x.ln()))
            });
        assert_eq!(log.evaluate(&Point::scalar(-1.0)).unwrap(), None);
        assert_eq!(
            log.evaluate(&Point::scalar(1.0)).unwrap(),
            Some(Point::scalar(0.0))
        );
    }
}

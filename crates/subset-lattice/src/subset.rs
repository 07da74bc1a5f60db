//! Subsets and the capabilities they advertise.
//!
//! Every subset, whatever its representation, is [`Named`] and answers
//! [`TopologicalSubset::is_open`] / [`TopologicalSubset::is_closed`].
//! Closure and point membership are optional capabilities: a subset that
//! cannot compute them reports [`SubsetError::Unsupported`], and callers
//! with a more general algorithm fall back to it.
//!
//! [`ManifoldSubset`] is the base handle for subsets registered in a
//! manifold's lattice. Its predicates and closure are the generic ones,
//! unless the node was refined with a [`SubsetTopology`] by a specialised
//! kind (pullbacks). Handles obtained from the registry then answer the
//! same way as the specialised value.

use crate::error::SubsetError;
use crate::lattice::{SubsetId, SubsetKind};
use crate::manifold::Manifold;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A point given by its coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point(pub Vec<f64>);

impl Point {
    pub fn new(coords: Vec<f64>) -> Self {
        Self(coords)
    }

    /// A point of a one-dimensional space.
    pub fn scalar(x: f64) -> Self {
        Self(vec![x])
    }

    pub fn dim(&self) -> usize {
        self.0.len()
    }

    pub fn coords(&self) -> &[f64] {
        &self.0
    }

    /// Fails unless the point has exactly `expected` coordinates.
    pub fn check_dim(&self, expected: usize) -> Result<(), SubsetError> {
        if self.dim() == expected {
            Ok(())
        } else {
            Err(SubsetError::DimensionMismatch {
                expected,
                actual: self.dim(),
            })
        }
    }
}

impl From<f64> for Point {
    fn from(x: f64) -> Self {
        Self::scalar(x)
    }
}

/// Identity for display: a plain name and a LaTeX name.
pub trait Named {
    fn name(&self) -> &str;

    fn latex_name(&self) -> &str;
}

/// A subset of some topological space.
pub trait TopologicalSubset: Named + Send + Sync + fmt::Debug {
    /// Whether the subset is open in its ambient space.
    fn is_open(&self) -> Result<bool, SubsetError>;

    /// Whether the subset is closed in its ambient space.
    fn is_closed(&self) -> Result<bool, SubsetError>;

    /// Whether [`topological_closure`](Self::topological_closure) is
    /// implemented.
    fn supports_closure(&self) -> bool {
        false
    }

    /// The smallest closed superset.
    ///
    /// The default reports [`SubsetError::Unsupported`].
    fn topological_closure(&self) -> Result<Arc<dyn TopologicalSubset>, SubsetError> {
        Err(SubsetError::unsupported("closure", self.name()))
    }

    /// Point membership.
    ///
    /// The default reports [`SubsetError::Unsupported`].
    fn contains(&self, point: &Point) -> Result<bool, SubsetError> {
        let _ = point;
        Err(SubsetError::unsupported("membership", self.name()))
    }
}

/// Topology of a registered node, supplied by the specialised value that
/// owns it.
///
/// A manifold keeps these weakly (see [`Manifold::refine`]); the answers
/// are available for as long as the specialised value is alive.
pub trait SubsetTopology: Send + Sync {
    fn is_open(&self) -> Result<bool, SubsetError>;

    fn is_closed(&self) -> Result<bool, SubsetError>;

    /// Closure as a registered subset of the same manifold.
    fn closure(
        &self,
        name: Option<&str>,
        latex_name: Option<&str>,
    ) -> Result<ManifoldSubset, SubsetError>;

    fn contains(&self, point: &Point) -> Result<bool, SubsetError>;
}

/// A subset registered in a manifold's lattice.
///
/// Handles are cheap to clone. Two handles are equal when they name the
/// same node of the same manifold.
#[derive(Clone)]
pub struct ManifoldSubset {
    manifold: Manifold,
    id: SubsetId,
    name: String,
    latex_name: String,
}

impl ManifoldSubset {
    pub(crate) fn from_parts(
        manifold: Manifold,
        id: SubsetId,
        name: String,
        latex_name: String,
    ) -> Self {
        Self {
            manifold,
            id,
            name,
            latex_name,
        }
    }

    pub fn id(&self) -> SubsetId {
        self.id
    }

    /// The manifold this subset belongs to.
    pub fn manifold(&self) -> &Manifold {
        &self.manifold
    }

    pub fn kind(&self) -> Result<SubsetKind, SubsetError> {
        self.manifold.with_lattice(|lattice| lattice.kind(self.id))
    }

    fn check_same_manifold(&self, other: &ManifoldSubset) -> Result<(), SubsetError> {
        if self.manifold.same_as(&other.manifold) {
            Ok(())
        } else {
            Err(SubsetError::ForeignSubset {
                subset: other.name.clone(),
                manifold: self.manifold.name().to_string(),
            })
        }
    }

    /// Declare that `self ⊆ superset`.
    pub fn declare_superset(&self, superset: &ManifoldSubset) -> Result<(), SubsetError> {
        self.check_same_manifold(superset)?;
        let added = self
            .manifold
            .with_lattice_mut(|lattice| lattice.declare_superset(superset.id, self.id))?;
        if added {
            debug!(subset = %self.name, superset = %superset.name, "declared inclusion");
        }
        Ok(())
    }

    /// Declare that `subset ⊆ self`.
    pub fn declare_subset(&self, subset: &ManifoldSubset) -> Result<(), SubsetError> {
        subset.declare_superset(self)
    }

    /// Whether `self ⊆ other` follows from declared inclusions.
    pub fn is_subset_of(&self, other: &ManifoldSubset) -> Result<bool, SubsetError> {
        if !self.manifold.same_as(&other.manifold) {
            return Ok(false);
        }
        self.manifold
            .with_lattice(|lattice| lattice.is_subset(self.id, other.id))
    }

    /// Whether `other ⊆ self` follows from declared inclusions.
    pub fn is_superset_of(&self, other: &ManifoldSubset) -> Result<bool, SubsetError> {
        other.is_subset_of(self)
    }

    /// All known strict supersets.
    pub fn supersets(&self) -> Result<Vec<ManifoldSubset>, SubsetError> {
        let ids = self
            .manifold
            .with_lattice(|lattice| lattice.supersets(self.id))?;
        ids.into_iter().map(|id| self.manifold.get(id)).collect()
    }

    /// All known strict subsets.
    pub fn subsets(&self) -> Result<Vec<ManifoldSubset>, SubsetError> {
        let ids = self
            .manifold
            .with_lattice(|lattice| lattice.subsets(self.id))?;
        ids.into_iter().map(|id| self.manifold.get(id)).collect()
    }

    /// The refinement attached to this node, if its owner is still alive.
    ///
    /// A pullback node without one cannot be answered generically.
    fn refinement(&self, operation: &'static str) -> Result<Refinement, SubsetError> {
        if let Some(topology) = self.manifold.refinement(self.id)? {
            return Ok(Refinement::Refined(topology));
        }
        match self.kind()? {
            SubsetKind::Pullback => Err(SubsetError::unsupported(operation, &self.name)),
            kind => Ok(Refinement::Generic(kind)),
        }
    }

    /// Openness. Generically only the whole manifold is known to be open.
    pub fn is_open(&self) -> Result<bool, SubsetError> {
        match self.refinement("openness")? {
            Refinement::Refined(topology) => topology.is_open(),
            Refinement::Generic(kind) => Ok(matches!(kind, SubsetKind::Whole)),
        }
    }

    /// Closedness. Generically the whole manifold and constructed closures.
    pub fn is_closed(&self) -> Result<bool, SubsetError> {
        match self.refinement("closedness")? {
            Refinement::Refined(topology) => topology.is_closed(),
            Refinement::Generic(kind) => Ok(matches!(
                kind,
                SubsetKind::Whole | SubsetKind::Closure { .. }
            )),
        }
    }

    /// Topological closure in the manifold.
    ///
    /// A refined node closes the way its owner does. Otherwise a closed
    /// subset is its own closure, and any other subset gets a new closure
    /// subset, see [`generic_closure`](Self::generic_closure).
    pub fn closure(
        &self,
        name: Option<&str>,
        latex_name: Option<&str>,
    ) -> Result<ManifoldSubset, SubsetError> {
        if let Refinement::Refined(topology) = self.refinement("closure")? {
            return topology.closure(name, latex_name);
        }
        if self.is_closed()? {
            return Ok(self.clone());
        }
        self.generic_closure(name, latex_name)
    }

    /// Register a new closed subset containing `self`.
    ///
    /// Names default to `cl_<name>` and `\mathop{\mathrm{cl}}(<latex>)`
    /// under the manifold's naming config; a given name alone is also the
    /// LaTeX name. Callers are expected to have established that `self` is
    /// not closed.
    pub fn generic_closure(
        &self,
        name: Option<&str>,
        latex_name: Option<&str>,
    ) -> Result<ManifoldSubset, SubsetError> {
        let config = self.manifold.config();
        let latex_name = match (latex_name, name) {
            (Some(latex_name), _) | (None, Some(latex_name)) => latex_name.to_string(),
            (None, None) => config.closure_latex_name(&self.latex_name),
        };
        let name = name.map_or_else(|| config.closure_name(&self.name), str::to_string);
        let closure = self.manifold.register_subset(
            name,
            latex_name,
            SubsetKind::Closure { of: self.id },
        )?;
        self.declare_superset(&closure)?;
        debug!(subset = %self.name, closure = %closure.name, "constructed generic closure");
        Ok(closure)
    }
}

enum Refinement {
    Refined(Arc<dyn SubsetTopology>),
    Generic(SubsetKind),
}

impl PartialEq for ManifoldSubset {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.manifold.same_as(&other.manifold)
    }
}

impl Eq for ManifoldSubset {}

impl fmt::Debug for ManifoldSubset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManifoldSubset")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("manifold", &self.manifold.name())
            .finish()
    }
}

impl fmt::Display for ManifoldSubset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subset {} of {}", self.name, self.manifold)
    }
}

impl Named for ManifoldSubset {
    fn name(&self) -> &str {
        &self.name
    }

    fn latex_name(&self) -> &str {
        &self.latex_name
    }
}

impl TopologicalSubset for ManifoldSubset {
    fn is_open(&self) -> Result<bool, SubsetError> {
        ManifoldSubset::is_open(self)
    }

    fn is_closed(&self) -> Result<bool, SubsetError> {
        ManifoldSubset::is_closed(self)
    }

    fn supports_closure(&self) -> bool {
        true
    }

    fn topological_closure(&self) -> Result<Arc<dyn TopologicalSubset>, SubsetError> {
        Ok(Arc::new(self.closure(None, None)?))
    }

    fn contains(&self, point: &Point) -> Result<bool, SubsetError> {
        match self.refinement("membership")? {
            Refinement::Refined(topology) => topology.contains(point),
            Refinement::Generic(_) => Err(SubsetError::unsupported("membership", &self.name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_dimension_check() {
        let p = Point::new(vec![1.0, 2.0]);
        assert_eq!(p.dim(), 2);
        assert!(p.check_dim(2).is_ok());
        assert!(matches!(
            p.check_dim(3),
            Err(SubsetError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
        assert_eq!(Point::from(0.5), Point::scalar(0.5));
    }

    #[test]
    fn declare_superset_orders_subsets() {
        let m = Manifold::new(2, "M");
        let a = m.subset("A", None).unwrap();
        let b = m.subset("B", None).unwrap();
        b.declare_superset(&a).unwrap();

        assert!(b.is_subset_of(&a).unwrap());
        assert!(a.is_superset_of(&b).unwrap());
        assert!(!a.is_subset_of(&b).unwrap());
        assert_eq!(b.supersets().unwrap(), vec![m.whole(), a.clone()]);
        assert_eq!(a.subsets().unwrap(), vec![b]);
    }

    #[test]
    fn declare_subset_is_the_converse() {
        let m = Manifold::new(2, "M");
        let a = m.subset("A", None).unwrap();
        let b = m.subset("B", None).unwrap();
        a.declare_subset(&b).unwrap();
        assert!(b.is_subset_of(&a).unwrap());
    }

    #[test]
    fn foreign_inclusions_are_rejected() {
        let m = Manifold::new(2, "M");
        let n = Manifold::new(2, "N");
        let a = m.subset("A", None).unwrap();
        let b = n.subset("B", None).unwrap();
        assert!(matches!(
            a.declare_superset(&b),
            Err(SubsetError::ForeignSubset { .. })
        ));
        assert!(!a.is_subset_of(&b).unwrap());
    }

    #[test]
    fn generic_predicates() {
        let m = Manifold::new(2, "M");
        let a = m.subset("A", None).unwrap();
        assert!(!a.is_open().unwrap());
        assert!(!a.is_closed().unwrap());
        assert!(m.whole().is_open().unwrap());
        assert!(m.whole().is_closed().unwrap());
    }

    #[test]
    fn generic_closure_registers_superset() {
        let m = Manifold::new(2, "M");
        let a = m.subset("A", Some(r"\mathcal{A}")).unwrap();
        let closure = a.closure(None, None).unwrap();

        assert_ne!(closure, a);
        assert_eq!(closure.name(), "cl_A");
        assert_eq!(closure.latex_name(), r"\mathop{\mathrm{cl}}(\mathcal{A})");
        assert_eq!(closure.kind().unwrap(), SubsetKind::Closure { of: a.id() });
        assert!(closure.is_closed().unwrap());
        assert!(a.is_subset_of(&closure).unwrap());
    }

    #[test]
    fn closure_of_closed_subset_is_itself() {
        let m = Manifold::new(2, "M");
        let a = m.subset("A", None).unwrap();
        let closure = a.closure(Some("K"), None).unwrap();
        assert_eq!(closure.name(), "K");
        assert_eq!(closure.latex_name(), "K");

        let count = m.subset_count().unwrap();
        assert_eq!(closure.closure(None, None).unwrap(), closure);
        assert_eq!(m.whole().closure(None, None).unwrap(), m.whole());
        assert_eq!(m.subset_count().unwrap(), count);
    }

    #[test]
    fn membership_is_unsupported_for_plain_subsets() {
        let m = Manifold::new(1, "M");
        let a = m.subset("A", None).unwrap();
        let err = a.contains(&Point::scalar(0.0)).unwrap_err();
        assert!(err.is_unsupported());
        assert!(a.supports_closure());
        assert_eq!(a.topological_closure().unwrap().name(), "cl_A");
    }

    struct ClosedBall {
        node: ManifoldSubset,
    }

    impl SubsetTopology for ClosedBall {
        fn is_open(&self) -> Result<bool, SubsetError> {
            Ok(false)
        }

        fn is_closed(&self) -> Result<bool, SubsetError> {
            Ok(true)
        }

        fn closure(
            &self,
            _name: Option<&str>,
            _latex_name: Option<&str>,
        ) -> Result<ManifoldSubset, SubsetError> {
            Ok(self.node.clone())
        }

        fn contains(&self, point: &Point) -> Result<bool, SubsetError> {
            point.check_dim(2)?;
            Ok(point.coords().iter().map(|x| x * x).sum::<f64>() <= 1.0)
        }
    }

    #[test]
    fn registry_handles_answer_through_refinement() {
        let m = Manifold::new(2, "M");
        let node = m.register_subset("B", "B", SubsetKind::Pullback).unwrap();
        assert!(node.is_closed().unwrap_err().is_unsupported());
        assert!(node.closure(None, None).unwrap_err().is_unsupported());

        let ball: Arc<dyn SubsetTopology> = Arc::new(ClosedBall { node: node.clone() });
        m.refine(node.id(), Arc::downgrade(&ball)).unwrap();

        let found = m.find("B").unwrap().unwrap();
        let count = m.subset_count().unwrap();
        assert!(found.is_closed().unwrap());
        assert!(!TopologicalSubset::is_open(&found).unwrap());
        assert_eq!(found.closure(Some("K"), None).unwrap(), node);
        assert_eq!(m.subset_count().unwrap(), count);
        assert!(found.contains(&Point::new(vec![0.5, 0.5])).unwrap());
        assert!(!found.contains(&Point::new(vec![1.0, 1.0])).unwrap());

        drop(ball);
        assert!(found.is_closed().unwrap_err().is_unsupported());
    }

    #[test]
    fn refining_an_unknown_node_fails() {
        let m = Manifold::new(2, "M");
        let node = m.subset("A", None).unwrap();
        let ball: Arc<dyn SubsetTopology> = Arc::new(ClosedBall { node });
        assert!(matches!(
            m.refine(SubsetId(7), Arc::downgrade(&ball)),
            Err(SubsetError::UnknownSubset(SubsetId(7)))
        ));
    }
}

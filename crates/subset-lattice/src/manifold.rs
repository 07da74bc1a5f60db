//! Manifolds as owners of a subset lattice.
//!
//! A [`Manifold`] is a shared handle. Every subset registered through it
//! lands in the same arena, so inclusions declared through one handle are
//! visible through all of its clones.

use crate::config::NamingConfig;
use crate::error::SubsetError;
use crate::lattice::{SubsetId, SubsetKind, SubsetLattice, SubsetRecord};
use crate::subset::{ManifoldSubset, Named, Point, SubsetTopology, TopologicalSubset};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tracing::debug;

struct ManifoldInner {
    dim: usize,
    name: String,
    latex_name: String,
    config: NamingConfig,
    lattice: Mutex<SubsetLattice>,
    refinements: Mutex<BTreeMap<SubsetId, Weak<dyn SubsetTopology>>>,
}

/// A topological manifold, reduced to what subsets need: a dimension,
/// names, naming conventions and the registry of its subsets.
#[derive(Clone)]
pub struct Manifold {
    inner: Arc<ManifoldInner>,
}

/// Builder for [`Manifold`].
#[derive(Debug, Clone)]
pub struct ManifoldBuilder {
    dim: usize,
    name: String,
    latex_name: Option<String>,
    config: NamingConfig,
}

impl ManifoldBuilder {
    pub fn latex_name(mut self, latex_name: impl Into<String>) -> Self {
        self.latex_name = Some(latex_name.into());
        self
    }

    pub fn config(mut self, config: NamingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Manifold {
        let latex_name = self.latex_name.unwrap_or_else(|| self.name.clone());
        let lattice = SubsetLattice::new(self.name.clone(), latex_name.clone());
        debug!(manifold = %self.name, dim = self.dim, "created manifold");
        Manifold {
            inner: Arc::new(ManifoldInner {
                dim: self.dim,
                name: self.name,
                latex_name,
                config: self.config,
                lattice: Mutex::new(lattice),
                refinements: Mutex::new(BTreeMap::new()),
            }),
        }
    }
}

impl Manifold {
    /// A manifold named `name` with default naming conventions.
    pub fn new(dim: usize, name: impl Into<String>) -> Self {
        Self::builder(dim, name).build()
    }

    pub fn builder(dim: usize, name: impl Into<String>) -> ManifoldBuilder {
        ManifoldBuilder {
            dim,
            name: name.into(),
            latex_name: None,
            config: NamingConfig::default(),
        }
    }

    pub fn dim(&self) -> usize {
        self.inner.dim
    }

    pub fn config(&self) -> &NamingConfig {
        &self.inner.config
    }

    /// Whether both handles refer to the same manifold.
    pub fn same_as(&self, other: &Manifold) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn lattice(&self) -> Result<MutexGuard<'_, SubsetLattice>, SubsetError> {
        self.inner
            .lattice
            .lock()
            .map_err(|_| SubsetError::RegistryPoisoned)
    }

    pub(crate) fn with_lattice<R>(
        &self,
        f: impl FnOnce(&SubsetLattice) -> Result<R, SubsetError>,
    ) -> Result<R, SubsetError> {
        let guard = self.lattice()?;
        f(&*guard)
    }

    pub(crate) fn with_lattice_mut<R>(
        &self,
        f: impl FnOnce(&mut SubsetLattice) -> Result<R, SubsetError>,
    ) -> Result<R, SubsetError> {
        let mut guard = self.lattice()?;
        f(&mut *guard)
    }

    /// Attach the topology of a specialised subset to its registered node.
    ///
    /// Only a weak reference is kept. Once the owner is dropped, handles to
    /// the node answer as its kind does unrefined, which for a pullback is
    /// [`SubsetError::Unsupported`].
    pub fn refine(
        &self,
        id: SubsetId,
        topology: Weak<dyn SubsetTopology>,
    ) -> Result<(), SubsetError> {
        self.with_lattice(|lattice| lattice.kind(id).map(|_| ()))?;
        self.inner
            .refinements
            .lock()
            .map_err(|_| SubsetError::RegistryPoisoned)?
            .insert(id, topology);
        debug!(manifold = %self.inner.name, %id, "refined subset topology");
        Ok(())
    }

    pub(crate) fn refinement(
        &self,
        id: SubsetId,
    ) -> Result<Option<Arc<dyn SubsetTopology>>, SubsetError> {
        let refinements = self
            .inner
            .refinements
            .lock()
            .map_err(|_| SubsetError::RegistryPoisoned)?;
        Ok(refinements.get(&id).and_then(Weak::upgrade))
    }

    /// The manifold viewed as a subset of itself.
    pub fn whole(&self) -> ManifoldSubset {
        ManifoldSubset::from_parts(
            self.clone(),
            SubsetLattice::ROOT,
            self.inner.name.clone(),
            self.inner.latex_name.clone(),
        )
    }

    /// Declare a plain named subset. The LaTeX name defaults to `name`.
    pub fn subset(
        &self,
        name: impl Into<String>,
        latex_name: Option<&str>,
    ) -> Result<ManifoldSubset, SubsetError> {
        let name = name.into();
        let latex_name = latex_name.map_or_else(|| name.clone(), str::to_string);
        self.register_subset(name, latex_name, SubsetKind::Plain)
    }

    /// Register a subset of the given kind.
    ///
    /// This is the constructor specialised subset kinds build on; the new
    /// subset is immediately part of the lattice, below the whole manifold.
    pub fn register_subset(
        &self,
        name: impl Into<String>,
        latex_name: impl Into<String>,
        kind: SubsetKind,
    ) -> Result<ManifoldSubset, SubsetError> {
        let name = name.into();
        let latex_name = latex_name.into();
        let id = self.with_lattice_mut(|lattice| {
            Ok(lattice.register(name.clone(), latex_name.clone(), kind))
        })?;
        debug!(manifold = %self.inner.name, subset = %name, %id, ?kind, "registered subset");
        Ok(ManifoldSubset::from_parts(self.clone(), id, name, latex_name))
    }

    /// Look up a subset by id.
    pub fn get(&self, id: SubsetId) -> Result<ManifoldSubset, SubsetError> {
        let (name, latex_name) = self.with_lattice(|lattice| {
            Ok((
                lattice.name(id)?.to_string(),
                lattice.latex_name(id)?.to_string(),
            ))
        })?;
        Ok(ManifoldSubset::from_parts(self.clone(), id, name, latex_name))
    }

    /// The first subset registered under `name`, if any.
    pub fn find(&self, name: &str) -> Result<Option<ManifoldSubset>, SubsetError> {
        match self.with_lattice(|lattice| Ok(lattice.find(name)))? {
            Some(id) => self.get(id).map(Some),
            None => Ok(None),
        }
    }

    /// Number of registered subsets, the manifold itself included.
    pub fn subset_count(&self) -> Result<usize, SubsetError> {
        self.with_lattice(|lattice| Ok(lattice.len()))
    }

    pub fn snapshot(&self) -> Result<Vec<SubsetRecord>, SubsetError> {
        self.with_lattice(|lattice| Ok(lattice.snapshot()))
    }

    pub fn fingerprint(&self) -> Result<String, SubsetError> {
        self.with_lattice(|lattice| Ok(lattice.fingerprint()))
    }
}

impl PartialEq for Manifold {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for Manifold {}

impl fmt::Debug for Manifold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manifold")
            .field("name", &self.inner.name)
            .field("dim", &self.inner.dim)
            .finish()
    }
}

impl fmt::Display for Manifold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-dimensional manifold '{}'", self.inner.dim, self.inner.name)
    }
}

impl Named for Manifold {
    fn name(&self) -> &str {
        &self.inner.name
    }

    fn latex_name(&self) -> &str {
        &self.inner.latex_name
    }
}

/// A manifold is open and closed in itself and is its own closure.
impl TopologicalSubset for Manifold {
    fn is_open(&self) -> Result<bool, SubsetError> {
        Ok(true)
    }

    fn is_closed(&self) -> Result<bool, SubsetError> {
        Ok(true)
    }

    fn supports_closure(&self) -> bool {
        true
    }

    fn topological_closure(&self) -> Result<Arc<dyn TopologicalSubset>, SubsetError> {
        Ok(Arc::new(self.clone()))
    }

    fn contains(&self, point: &Point) -> Result<bool, SubsetError> {
        point.check_dim(self.inner.dim)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latex_name_defaults_to_name() {
        let m = Manifold::new(2, "M");
        assert_eq!(m.latex_name(), "M");
        let n = Manifold::builder(2, "R2").latex_name(r"\mathbb{R}^2").build();
        assert_eq!(n.latex_name(), r"\mathbb{R}^2");
    }

    #[test]
    fn clones_share_the_registry() {
        let m = Manifold::new(2, "M");
        let alias = m.clone();
        alias.subset("A", None).unwrap();
        assert_eq!(m.subset_count().unwrap(), 2);
        assert!(m.same_as(&alias));
        assert_ne!(m, Manifold::new(2, "M"));
    }

    #[test]
    fn find_and_get_agree() {
        let m = Manifold::new(1, "M");
        let a = m.subset("A", Some(r"\mathcal{A}")).unwrap();
        let found = m.find("A").unwrap().unwrap();
        assert_eq!(found, a);
        assert_eq!(m.get(a.id()).unwrap().latex_name(), r"\mathcal{A}");
        assert!(m.find("B").unwrap().is_none());
    }

    #[test]
    fn whole_manifold_topology() {
        let m = Manifold::new(2, "M");
        assert!(m.is_open().unwrap());
        assert!(m.is_closed().unwrap());
        assert!(m.contains(&Point::new(vec![0.0, 1.0])).unwrap());
        assert!(matches!(
            m.contains(&Point::scalar(0.0)),
            Err(SubsetError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));
        assert_eq!(m.topological_closure().unwrap().name(), "M");
    }

    #[test]
    fn configured_names_are_used() {
        let config = NamingConfig::from_toml_str(r#"closurePrefix = "closure_of_""#).unwrap();
        let m = Manifold::builder(1, "M").config(config).build();
        let a = m.subset("A", None).unwrap();
        let closure = a.closure(None, None).unwrap();
        assert_eq!(closure.name(), "closure_of_A");
    }
}

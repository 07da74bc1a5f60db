//! Subsets defined as preimages under continuous maps.
//!
//! Given `f: M → N` and `S ⊆ N`, the pullback `f⁻¹(S) = {x ∈ M : f(x) ∈ S}`
//! is registered as a subset of `M`. Its topology is read off `S`: the
//! preimage of an open (closed) set under a continuous map is open
//! (closed). Its closure is the pullback of `S`'s closure when `S` can
//! compute one, and the manifold's generic closure otherwise.
//!
//! The registered node is refined with the pullback's topology, so handles
//! obtained from the manifold (`find`, `get`, `supersets`) agree with the
//! pullback while it is alive.

use crate::map::ContinuousMap;
use std::sync::{Arc, Mutex};
use subset_lattice::{
    Manifold, ManifoldSubset, Named, Point, SubsetError, SubsetId, SubsetKind, SubsetTopology,
    TopologicalSubset,
};
use tracing::debug;

/// `f⁻¹(S)` for a continuous map `f` and a codomain subset `S`.
///
/// Cloning yields another handle to the same registered subset.
#[derive(Debug, Clone)]
pub struct PullbackSubset {
    state: Arc<PullbackState>,
}

#[derive(Debug)]
struct PullbackState {
    map: Arc<ContinuousMap>,
    inverse: Option<Arc<ContinuousMap>>,
    codomain_subset: Arc<dyn TopologicalSubset>,
    base: ManifoldSubset,
    /// Closures built from this pullback, kept alive with it.
    closures: Mutex<Vec<PullbackSubset>>,
}

enum Closed {
    Itself,
    Pullback(PullbackSubset),
    Generic(ManifoldSubset),
}

/// Optional arguments of the pullback constructor.
#[derive(Debug, Clone)]
pub struct PullbackBuilder {
    map: Arc<ContinuousMap>,
    inverse: Option<Arc<ContinuousMap>>,
    codomain_subset: Option<Arc<dyn TopologicalSubset>>,
    name: Option<String>,
    latex_name: Option<String>,
}

impl PullbackBuilder {
    /// Carry an inverse of the map along with the subset.
    pub fn inverse(mut self, inverse: impl Into<Arc<ContinuousMap>>) -> Self {
        self.inverse = Some(inverse.into());
        self
    }

    /// The subset of the codomain to pull back. Defaults to the whole
    /// codomain.
    pub fn codomain_subset(mut self, subset: Arc<dyn TopologicalSubset>) -> Self {
        self.codomain_subset = Some(subset);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn latex_name(mut self, latex_name: impl Into<String>) -> Self {
        self.latex_name = Some(latex_name.into());
        self
    }

    /// Register the pullback as a subset of the map's domain.
    pub fn build(self) -> Result<PullbackSubset, SubsetError> {
        PullbackSubset::construct(
            self.map,
            self.inverse,
            self.codomain_subset,
            self.name,
            self.latex_name,
        )
    }
}

/// Result of [`PullbackSubset::closure`].
#[derive(Debug, Clone)]
pub enum SubsetClosure {
    /// The subset was already closed; this is the same subset.
    Unchanged(PullbackSubset),

    /// Pullback of the codomain subset's closure.
    Pullback(PullbackSubset),

    /// The manifold's generic closure, used when the codomain subset has
    /// no closure of its own.
    Generic(ManifoldSubset),
}

impl SubsetClosure {
    /// The closure as a subset of the domain manifold.
    pub fn as_subset(&self) -> &ManifoldSubset {
        match self {
            SubsetClosure::Unchanged(pullback) | SubsetClosure::Pullback(pullback) => {
                pullback.as_subset()
            }
            SubsetClosure::Generic(subset) => subset,
        }
    }

    pub fn id(&self) -> SubsetId {
        self.as_subset().id()
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, SubsetClosure::Unchanged(_))
    }

    /// The closure as a pullback, unless the generic fallback was taken.
    pub fn into_pullback(self) -> Option<PullbackSubset> {
        match self {
            SubsetClosure::Unchanged(pullback) | SubsetClosure::Pullback(pullback) => {
                Some(pullback)
            }
            SubsetClosure::Generic(_) => None,
        }
    }

    fn into_topological(self) -> Arc<dyn TopologicalSubset> {
        match self {
            SubsetClosure::Unchanged(pullback) | SubsetClosure::Pullback(pullback) => {
                Arc::new(pullback)
            }
            SubsetClosure::Generic(subset) => Arc::new(subset),
        }
    }
}

impl Named for SubsetClosure {
    fn name(&self) -> &str {
        self.as_subset().name()
    }

    fn latex_name(&self) -> &str {
        self.as_subset().latex_name()
    }
}

impl PullbackSubset {
    /// The full preimage `f⁻¹(N)` of the map's codomain.
    pub fn new(map: impl Into<Arc<ContinuousMap>>) -> Result<Self, SubsetError> {
        Self::builder(map).build()
    }

    pub fn builder(map: impl Into<Arc<ContinuousMap>>) -> PullbackBuilder {
        PullbackBuilder {
            map: map.into(),
            inverse: None,
            codomain_subset: None,
            name: None,
            latex_name: None,
        }
    }

    fn construct(
        map: Arc<ContinuousMap>,
        inverse: Option<Arc<ContinuousMap>>,
        codomain_subset: Option<Arc<dyn TopologicalSubset>>,
        name: Option<String>,
        latex_name: Option<String>,
    ) -> Result<Self, SubsetError> {
        let codomain_subset = codomain_subset.unwrap_or_else(|| Arc::clone(map.codomain()));
        let domain = map.domain().clone();
        let config = domain.config();

        let map_name = map.name().unwrap_or(&config.fallback_map_symbol);
        let map_latex_name = map.latex_name().unwrap_or(map_name);
        let latex_name = match (latex_name, &name) {
            (Some(latex_name), _) => latex_name,
            (None, Some(name)) => name.clone(),
            (None, None) => {
                config.pullback_latex_name(map_latex_name, codomain_subset.latex_name())
            }
        };
        let name =
            name.unwrap_or_else(|| config.pullback_name(map_name, codomain_subset.name()));

        let base = domain.register_subset(name, latex_name, SubsetKind::Pullback)?;
        if Arc::ptr_eq(&codomain_subset, map.codomain()) {
            // f⁻¹(N) = M
            domain.whole().declare_superset(&base)?;
        }
        let state = Arc::new(PullbackState {
            map,
            inverse,
            codomain_subset,
            base,
            closures: Mutex::new(Vec::new()),
        });
        let topology: Arc<dyn SubsetTopology> = state.clone();
        domain.refine(state.base.id(), Arc::downgrade(&topology))?;
        debug!(
            subset = %state.base.name(),
            codomain_subset = %state.codomain_subset.name(),
            manifold = %domain.name(),
            "constructed pullback subset"
        );
        Ok(Self { state })
    }

    pub fn map(&self) -> &Arc<ContinuousMap> {
        &self.state.map
    }

    pub fn inverse(&self) -> Option<&Arc<ContinuousMap>> {
        self.state.inverse.as_ref()
    }

    pub fn codomain_subset(&self) -> &Arc<dyn TopologicalSubset> {
        &self.state.codomain_subset
    }

    /// The registered subset of the domain manifold.
    pub fn as_subset(&self) -> &ManifoldSubset {
        &self.state.base
    }

    pub fn id(&self) -> SubsetId {
        self.state.base.id()
    }

    pub fn manifold(&self) -> &Manifold {
        self.state.base.manifold()
    }

    /// Topological closure in the domain manifold.
    ///
    /// A closed pullback is returned as is. Otherwise, if the codomain
    /// subset advertises and computes a closure, the result is the pullback
    /// of that closure (named by `name`/`latex_name`, or by the default
    /// rule), declared a superset of `self`. A codomain subset without
    /// closure leads to the manifold's generic closure; any other failure
    /// propagates.
    pub fn closure(
        &self,
        name: Option<&str>,
        latex_name: Option<&str>,
    ) -> Result<SubsetClosure, SubsetError> {
        Ok(match self.state.close(name, latex_name)? {
            Closed::Itself => SubsetClosure::Unchanged(self.clone()),
            Closed::Pullback(closure) => SubsetClosure::Pullback(closure),
            Closed::Generic(closure) => SubsetClosure::Generic(closure),
        })
    }
}

impl PullbackState {
    fn close(&self, name: Option<&str>, latex_name: Option<&str>) -> Result<Closed, SubsetError> {
        if self.codomain_subset.is_closed()? {
            return Ok(Closed::Itself);
        }
        let codomain_subset_closure = if self.codomain_subset.supports_closure() {
            match self.codomain_subset.topological_closure() {
                Ok(closure) => Some(closure),
                Err(err) if err.is_unsupported() => {
                    debug!(subset = %self.base.name(), reason = %err, "codomain subset has no closure");
                    None
                }
                Err(err) => return Err(err),
            }
        } else {
            None
        };
        let Some(codomain_subset_closure) = codomain_subset_closure else {
            debug!(subset = %self.base.name(), "falling back to generic closure");
            return self
                .base
                .generic_closure(name, latex_name)
                .map(Closed::Generic);
        };
        let closure = PullbackSubset::construct(
            Arc::clone(&self.map),
            self.inverse.clone(),
            Some(codomain_subset_closure),
            name.map(str::to_string),
            latex_name.map(str::to_string),
        )?;
        self.base.declare_superset(closure.as_subset())?;
        self.closures
            .lock()
            .map_err(|_| SubsetError::RegistryPoisoned)?
            .push(closure.clone());
        debug!(subset = %self.base.name(), closure = %closure.name(), "constructed pullback closure");
        Ok(Closed::Pullback(closure))
    }
}

/// Topology of the registered node, for handles taken from the manifold.
impl SubsetTopology for PullbackState {
    fn is_open(&self) -> Result<bool, SubsetError> {
        self.codomain_subset.is_open()
    }

    fn is_closed(&self) -> Result<bool, SubsetError> {
        self.codomain_subset.is_closed()
    }

    fn closure(
        &self,
        name: Option<&str>,
        latex_name: Option<&str>,
    ) -> Result<ManifoldSubset, SubsetError> {
        Ok(match self.close(name, latex_name)? {
            Closed::Itself => self.base.clone(),
            Closed::Pullback(closure) => closure.as_subset().clone(),
            Closed::Generic(closure) => closure,
        })
    }

    /// `x ∈ f⁻¹(S)` iff `f` is defined at `x` and `f(x) ∈ S`.
    fn contains(&self, point: &Point) -> Result<bool, SubsetError> {
        match self.map.evaluate(point)? {
            Some(image) => self.codomain_subset.contains(&image),
            None => Ok(false),
        }
    }
}

impl PartialEq for PullbackSubset {
    fn eq(&self, other: &Self) -> bool {
        self.state.base == other.state.base
    }
}

impl Named for PullbackSubset {
    fn name(&self) -> &str {
        self.state.base.name()
    }

    fn latex_name(&self) -> &str {
        self.state.base.latex_name()
    }
}

impl TopologicalSubset for PullbackSubset {
    /// Open exactly when the codomain subset is.
    fn is_open(&self) -> Result<bool, SubsetError> {
        SubsetTopology::is_open(&*self.state)
    }

    /// Closed exactly when the codomain subset is.
    fn is_closed(&self) -> Result<bool, SubsetError> {
        SubsetTopology::is_closed(&*self.state)
    }

    fn supports_closure(&self) -> bool {
        true
    }

    fn topological_closure(&self) -> Result<Arc<dyn TopologicalSubset>, SubsetError> {
        Ok(self.closure(None, None)?.into_topological())
    }

    fn contains(&self, point: &Point) -> Result<bool, SubsetError> {
        SubsetTopology::contains(&*self.state, point)
    }
}

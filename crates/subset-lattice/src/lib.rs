//! # Subset Lattice
//!
//! Subsets of a manifold and the inclusions between them.
//!
//! A manifold owns an arena of named subsets. Inclusions form a DAG that
//! only grows: once `A ⊆ B` is declared it holds for the manifold's
//! lifetime. The base subset handle provides the generic topological
//! predicates and closure; specialised subset kinds register through the
//! same manifold and refine them.
//!
//! ## Architecture
//!
//! ```text
//! NamingConfig          ← How derived subsets are named
//!     │
//! Manifold              ← Shared handle: dimension, names, registry
//!     │
//! SubsetLattice         ← Arena of SubsetId + superset/subset edges
//!     │
//! ManifoldSubset        ← Base handle: inclusions, generic topology
//!     │
//! TopologicalSubset     ← Capabilities: is_open, is_closed, closure?, contains?
//! ```

pub mod config;
pub mod error;
pub mod lattice;
pub mod manifold;
pub mod subset;

pub use config::NamingConfig;
pub use error::SubsetError;
pub use lattice::{SubsetId, SubsetKind, SubsetLattice, SubsetRecord};
pub use manifold::{Manifold, ManifoldBuilder};
pub use subset::{ManifoldSubset, Named, Point, SubsetTopology, TopologicalSubset};

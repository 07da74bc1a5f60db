//! # Subset Pullback
//!
//! Manifold subsets defined implicitly: given a continuous map
//! `f: M → N` and a subset `S ⊆ N`, the pullback `f⁻¹(S)` is the subset of
//! `M` of all points mapped into `S`.
//!
//! ```text
//! ContinuousMap f: M → N      ← domain manifold, codomain, names
//!     │
//! S: TopologicalSubset of N   ← is_open, is_closed, closure?, contains?
//!     │
//! PullbackSubset f⁻¹(S)       ← registered in M's lattice
//!     │
//! closure()                   ← f⁻¹(cl S) ⊇ f⁻¹(S), or the generic closure
//! ```
//!
//! ```
//! use std::sync::Arc;
//! use subset_lattice::{Manifold, Named, TopologicalSubset};
//! use subset_pullback::{ContinuousMap, PullbackSubset, RealInterval};
//!
//! let m = Manifold::new(2, "R^2");
//! let r_squared = ContinuousMap::new(m, Arc::new(RealInterval::real_line()))
//!     .with_name("r_squared");
//! let annulus = PullbackSubset::builder(r_squared)
//!     .codomain_subset(Arc::new(RealInterval::open(1.0, 2.0)?))
//!     .build()?;
//! assert_eq!(annulus.name(), "r_squared_inv_(1, 2)");
//! assert!(annulus.is_open()?);
//!
//! let closed = annulus.closure(None, None)?;
//! assert_eq!(closed.name(), "r_squared_inv_[1, 2]");
//! assert!(annulus.as_subset().is_subset_of(closed.as_subset())?);
//! # Ok::<(), subset_lattice::SubsetError>(())
//! ```

pub mod map;
pub mod pullback;
pub mod real;

pub use map::ContinuousMap;
pub use pullback::{PullbackBuilder, PullbackSubset, SubsetClosure};
pub use real::{Bound, RealInterval};

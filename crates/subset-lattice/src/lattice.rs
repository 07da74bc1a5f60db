//! The inclusion lattice of a manifold's subsets.
//!
//! Subsets live in an arena indexed by [`SubsetId`]. Inclusions are stored
//! as direct superset/subset edges; queries take the reflexive-transitive
//! closure of those edges.
//!
//! Edges are only ever added. Once `A ⊆ B` has been declared, every later
//! query observes it.
//!
//! ```text
//! #0 M (whole)
//!  ├── #1 A
//!  │    └── #2 B          B ⊆ A ⊆ M
//!  └── #3 cl_B  ⊇ #2      closure recorded as a superset
//! ```

use crate::error::SubsetError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, VecDeque};
use std::fmt;

/// Index of a subset in its manifold's arena.
///
/// Ids are dense and never reused; they are only meaningful relative to the
/// manifold that issued them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SubsetId(pub usize);

impl fmt::Display for SubsetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What kind of subset a node is. Each kind has its own notion of
/// openness, closedness and closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubsetKind {
    /// The manifold itself. Always the root node.
    Whole,

    /// A named subset with no further structure.
    Plain,

    /// Preimage of a codomain subset under a continuous map.
    Pullback,

    /// Generic closure of another subset.
    Closure { of: SubsetId },
}

#[derive(Debug, Clone)]
struct SubsetNode {
    name: String,
    latex_name: String,
    kind: SubsetKind,
    supersets: BTreeSet<SubsetId>,
    subsets: BTreeSet<SubsetId>,
}

/// Serializable view of one node and its direct supersets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsetRecord {
    pub id: SubsetId,
    pub name: String,
    pub latex_name: String,
    pub kind: SubsetKind,
    pub supersets: Vec<SubsetId>,
}

/// Arena of subsets plus their inclusion DAG.
#[derive(Debug, Clone)]
pub struct SubsetLattice {
    nodes: Vec<SubsetNode>,
}

impl SubsetLattice {
    /// The id of the whole manifold.
    pub const ROOT: SubsetId = SubsetId(0);

    /// Create a lattice whose root is the whole manifold.
    pub fn new(name: impl Into<String>, latex_name: impl Into<String>) -> Self {
        Self {
            nodes: vec![SubsetNode {
                name: name.into(),
                latex_name: latex_name.into(),
                kind: SubsetKind::Whole,
                supersets: BTreeSet::new(),
                subsets: BTreeSet::new(),
            }],
        }
    }

    /// Number of subsets, the whole manifold included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root is registered at construction.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = SubsetId> + '_ {
        (0..self.nodes.len()).map(SubsetId)
    }

    pub fn contains_id(&self, id: SubsetId) -> bool {
        id.0 < self.nodes.len()
    }

    /// Append a subset and record it as a subset of the whole manifold.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        latex_name: impl Into<String>,
        kind: SubsetKind,
    ) -> SubsetId {
        let id = SubsetId(self.nodes.len());
        let mut supersets = BTreeSet::new();
        supersets.insert(Self::ROOT);
        self.nodes.push(SubsetNode {
            name: name.into(),
            latex_name: latex_name.into(),
            kind,
            supersets,
            subsets: BTreeSet::new(),
        });
        self.nodes[Self::ROOT.0].subsets.insert(id);
        id
    }

    fn node(&self, id: SubsetId) -> Result<&SubsetNode, SubsetError> {
        self.nodes.get(id.0).ok_or(SubsetError::UnknownSubset(id))
    }

    pub fn name(&self, id: SubsetId) -> Result<&str, SubsetError> {
        Ok(&self.node(id)?.name)
    }

    pub fn latex_name(&self, id: SubsetId) -> Result<&str, SubsetError> {
        Ok(&self.node(id)?.latex_name)
    }

    pub fn kind(&self, id: SubsetId) -> Result<SubsetKind, SubsetError> {
        Ok(self.node(id)?.kind)
    }

    /// First subset registered under `name`.
    pub fn find(&self, name: &str) -> Option<SubsetId> {
        self.nodes
            .iter()
            .position(|node| node.name == name)
            .map(SubsetId)
    }

    /// Record `subset ⊆ superset`.
    ///
    /// Returns whether a new edge was added. Declaring a subset to contain
    /// itself, or repeating a declaration, changes nothing.
    pub fn declare_superset(
        &mut self,
        superset: SubsetId,
        subset: SubsetId,
    ) -> Result<bool, SubsetError> {
        self.node(superset)?;
        self.node(subset)?;
        if superset == subset {
            return Ok(false);
        }
        let added = self.nodes[subset.0].supersets.insert(superset);
        self.nodes[superset.0].subsets.insert(subset);
        Ok(added)
    }

    /// Whether `subset ⊆ superset`, following declared inclusions.
    pub fn is_subset(&self, subset: SubsetId, superset: SubsetId) -> Result<bool, SubsetError> {
        self.node(superset)?;
        Ok(self.reachable(subset, |node| &node.supersets)?.contains(&superset))
    }

    /// All strict supersets of `id`, sorted by id.
    pub fn supersets(&self, id: SubsetId) -> Result<Vec<SubsetId>, SubsetError> {
        let mut out = self.reachable(id, |node| &node.supersets)?;
        out.remove(&id);
        Ok(out.into_iter().collect())
    }

    /// All strict subsets of `id`, sorted by id.
    pub fn subsets(&self, id: SubsetId) -> Result<Vec<SubsetId>, SubsetError> {
        let mut out = self.reachable(id, |node| &node.subsets)?;
        out.remove(&id);
        Ok(out.into_iter().collect())
    }

    /// Reflexive-transitive reachability along one edge direction.
    fn reachable(
        &self,
        start: SubsetId,
        edges: impl Fn(&SubsetNode) -> &BTreeSet<SubsetId>,
    ) -> Result<BTreeSet<SubsetId>, SubsetError> {
        self.node(start)?;
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::new();
        seen.insert(start);
        queue.push_back(start);
        while let Some(id) = queue.pop_front() {
            for next in edges(&self.nodes[id.0]) {
                if seen.insert(*next) {
                    queue.push_back(*next);
                }
            }
        }
        Ok(seen)
    }

    pub fn snapshot(&self) -> Vec<SubsetRecord> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| SubsetRecord {
                id: SubsetId(index),
                name: node.name.clone(),
                latex_name: node.latex_name.clone(),
                kind: node.kind,
                supersets: node.supersets.iter().copied().collect(),
            })
            .collect()
    }

    /// Content hash of names, kinds and direct inclusions.
    ///
    /// Equal fingerprints mean the lattice has not changed; read-only
    /// queries must leave it untouched.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for record in self.snapshot() {
            hasher.update(format!("id:{}\n", record.id.0).as_bytes());
            hasher.update(format!("name:{}\n", record.name).as_bytes());
            hasher.update(format!("latex:{}\n", record.latex_name).as_bytes());
            hasher.update(format!("kind:{:?}\n", record.kind).as_bytes());
            for superset in record.supersets {
                hasher.update(format!("superset:{}\n", superset.0).as_bytes());
            }
        }
        format!("{:x}", hasher.finalize())
    }
}

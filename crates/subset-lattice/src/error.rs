//! Error types for subset lattice operations.

use crate::lattice::SubsetId;

/// Errors arising from subset construction, topology queries and naming
/// configuration.
#[derive(Debug, thiserror::Error)]
pub enum SubsetError {
    /// A subset does not provide the requested capability.
    ///
    /// Pullback closure treats this variant as "no closure available" and
    /// falls back to the generic algorithm. Everywhere else it propagates.
    #[error("{operation} is not supported by subset {subset}")]
    Unsupported {
        operation: &'static str,
        subset: String,
    },

    /// The id does not name a subset of this manifold.
    #[error("unknown subset: {0}")]
    UnknownSubset(SubsetId),

    /// An inclusion was declared between subsets of different manifolds.
    #[error("subset {subset} does not belong to manifold {manifold}")]
    ForeignSubset { subset: String, manifold: String },

    /// A point has the wrong number of coordinates.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Interval bounds are malformed.
    #[error("invalid interval: {0}")]
    InvalidInterval(String),

    /// A previous holder of the subset registry panicked.
    #[error("subset registry lock poisoned")]
    RegistryPoisoned,

    #[error("failed to read config: {path}: {source}")]
    ReadConfig {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid toml at {path}: {source}")]
    ParseConfig {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl SubsetError {
    /// Shorthand for a missing capability on a named subset.
    pub fn unsupported(operation: &'static str, subset: impl Into<String>) -> Self {
        Self::Unsupported {
            operation,
            subset: subset.into(),
        }
    }

    /// Whether this error only signals a missing capability.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_message_names_subset() {
        let err = SubsetError::unsupported("closure", "I");
        assert!(err.is_unsupported());
        assert_eq!(err.to_string(), "closure is not supported by subset I");
    }

    #[test]
    fn other_variants_are_not_unsupported() {
        let err = SubsetError::DimensionMismatch {
            expected: 2,
            actual: 1,
        };
        assert!(!err.is_unsupported());
        assert!(!SubsetError::RegistryPoisoned.is_unsupported());
    }
}

//! Naming conventions for derived subsets.
//!
//! Pullbacks and generic closures derive their names from the objects they
//! are built from when the caller supplies none. The pieces those names are
//! assembled from live here, loadable from TOML:
//!
//! ```toml
//! fallbackMapSymbol = "f"
//! inverseInfix = "_inv_"
//! closurePrefix = "cl_"
//! closureLatexOperator = '\mathop{\mathrm{cl}}'
//! ```

use crate::error::SubsetError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NamingConfig {
    /// Symbol standing in for a map that has no name.
    pub fallback_map_symbol: String,

    /// Joins the map name and the codomain subset name: `g_inv_I`.
    pub inverse_infix: String,

    /// Prefix of generically constructed closures: `cl_A`.
    pub closure_prefix: String,

    /// LaTeX operator applied to the subset's LaTeX name for closures.
    pub closure_latex_operator: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            fallback_map_symbol: "f".to_string(),
            inverse_infix: "_inv_".to_string(),
            closure_prefix: "cl_".to_string(),
            closure_latex_operator: r"\mathop{\mathrm{cl}}".to_string(),
        }
    }
}

impl NamingConfig {
    /// Parse a config from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, SubsetError> {
        toml::from_str(text).map_err(|source| SubsetError::ParseConfig {
            path: "<inline>".to_string(),
            source,
        })
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, SubsetError> {
        let text = std::fs::read_to_string(path).map_err(|source| SubsetError::ReadConfig {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| SubsetError::ParseConfig {
            path: path.display().to_string(),
            source,
        })
    }

    /// `<map>_inv_<subset>`.
    pub fn pullback_name(&self, map_name: &str, subset_name: &str) -> String {
        format!("{map_name}{}{subset_name}", self.inverse_infix)
    }

    /// `<map>^{-1}(<subset>)`.
    pub fn pullback_latex_name(&self, map_latex_name: &str, subset_latex_name: &str) -> String {
        format!("{map_latex_name}^{{-1}}({subset_latex_name})")
    }

    /// `cl_<subset>`.
    pub fn closure_name(&self, subset_name: &str) -> String {
        format!("{}{subset_name}", self.closure_prefix)
    }

    /// `\mathop{\mathrm{cl}}(<subset>)`.
    pub fn closure_latex_name(&self, subset_latex_name: &str) -> String {
        format!("{}({subset_latex_name})", self.closure_latex_operator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_conventional_names() {
        let config = NamingConfig::default();
        assert_eq!(config.pullback_name("g", "I"), "g_inv_I");
        assert_eq!(config.pullback_latex_name("g", "I"), "g^{-1}(I)");
        assert_eq!(config.closure_name("A"), "cl_A");
        assert_eq!(
            config.closure_latex_name("A"),
            r"\mathop{\mathrm{cl}}(A)"
        );
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = NamingConfig::from_toml_str(r#"inverseInfix = "_pre_""#).unwrap();
        assert_eq!(config.inverse_infix, "_pre_");
        assert_eq!(config.fallback_map_symbol, "f");
        assert_eq!(config.pullback_name("g", "I"), "g_pre_I");
    }

    #[test]
    fn invalid_toml_is_rejected() {
        let err = NamingConfig::from_toml_str("inverseInfix = ").unwrap_err();
        assert!(matches!(err, SubsetError::ParseConfig { .. }));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = NamingConfig::load(Path::new("/nonexistent/naming.toml")).unwrap_err();
        assert!(matches!(err, SubsetError::ReadConfig { .. }));
    }
}

//! Parser for route module manifests.
//!
//! Each route module is one file in the routes directory, either YAML
//! (`products.yml`) or TOML (`products.toml`):
//!
//! ```yaml
//! name: products
//! weight: 20
//! routes:
//!   - path: products
//!     view: AdminProductsPage
//!     meta: { label: Products, title: Products, key: /products, order: 1 }
//! ```
//!
//! Modules are concatenated in `(weight, name)` order.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use super::RouteNode;
use crate::error::{RouteError, RouteResult};

/// An independently authored group of top-level routes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RouteModule {
    /// Module name (e.g., "products").
    pub name: String,

    /// Ordering among modules (lower = earlier, default 0).
    #[serde(default)]
    pub weight: i32,

    /// Top-level routes contributed by this module.
    #[serde(default)]
    pub routes: Vec<RouteNode>,
}

/// Manifest encodings, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ManifestFormat {
    Yaml,
    Toml,
}

impl ManifestFormat {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yml" | "yaml") => Some(Self::Yaml),
            Some("toml") => Some(Self::Toml),
            _ => None,
        }
    }
}

impl RouteModule {
    /// Parse a route module file from the given path.
    pub fn parse(path: &Path) -> RouteResult<Self> {
        let format = ManifestFormat::from_path(path).ok_or_else(|| {
            RouteError::invalid(
                path.display().to_string(),
                "unsupported extension (expected .yml, .yaml or .toml)",
            )
        })?;

        let content = std::fs::read_to_string(path)
            .map_err(|e| RouteError::unreadable(path.display().to_string(), e))?;

        match format {
            ManifestFormat::Yaml => Self::parse_yaml(&content, path),
            ManifestFormat::Toml => Self::parse_toml(&content, path),
        }
    }

    /// Parse a route module from a YAML string.
    pub fn parse_yaml(content: &str, path: &Path) -> RouteResult<Self> {
        let module: RouteModule = serde_yml::from_str(content)
            .map_err(|e| RouteError::invalid(path.display().to_string(), e))?;
        module.validate(path)?;
        Ok(module)
    }

    /// Parse a route module from a TOML string.
    pub fn parse_toml(content: &str, path: &Path) -> RouteResult<Self> {
        let module: RouteModule = toml::from_str(content)
            .map_err(|e| RouteError::invalid(path.display().to_string(), e))?;
        module.validate(path)?;
        Ok(module)
    }

    fn validate(&self, path: &Path) -> RouteResult<()> {
        if self.name.trim().is_empty() {
            return Err(RouteError::UnnamedModule {
                path: path.display().to_string(),
            });
        }
        Ok(())
    }
}

/// Load every route module in `dir`, sorted by `(weight, name)`.
///
/// Files with other extensions are ignored. Any unreadable or invalid
/// manifest fails the whole load.
pub fn load_modules(dir: &Path) -> RouteResult<Vec<RouteModule>> {
    let entries =
        std::fs::read_dir(dir).map_err(|e| RouteError::unreadable(dir.display().to_string(), e))?;

    let mut modules = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| RouteError::unreadable(dir.display().to_string(), e))?;
        let path = entry.path();
        if !path.is_file() || ManifestFormat::from_path(&path).is_none() {
            continue;
        }

        let module = RouteModule::parse(&path)?;
        debug!(
            module = %module.name,
            routes = module.routes.len(),
            path = %path.display(),
            "loaded route module"
        );
        modules.push(module);
    }

    modules.sort_by(|a, b| a.weight.cmp(&b.weight).then_with(|| a.name.cmp(&b.name)));

    info!(modules = modules.len(), dir = %dir.display(), "route modules loaded");
    Ok(modules)
}

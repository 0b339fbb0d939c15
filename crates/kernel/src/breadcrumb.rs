//! Breadcrumb resolution.
//!
//! Each matched pathname is looked up against the flattened route index
//! (first exact pattern match wins). Unmatched pathnames get a label
//! derived from their last segment.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::route::path::segments;
use crate::route::{FlattenedRoute, match_path};

/// Label used for the root path.
pub const HOME_LABEL: &str = "Home";

/// Start of every word, for title-casing derived labels.
///
/// # Panics
///
/// Panics if the hard-coded regex literal is invalid (impossible in practice).
#[allow(clippy::expect_used)]
static WORD_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w").expect("valid regex literal"));

/// One entry of the breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    /// Concrete pathname this entry stands for.
    pub pathname: String,
    /// Human-readable label.
    pub title: String,
}

/// Resolve one breadcrumb per matched pathname, most general first.
pub fn resolve_breadcrumbs<S: AsRef<str>>(
    matched: &[S],
    index: &[FlattenedRoute],
) -> Vec<Breadcrumb> {
    matched
        .iter()
        .map(|pathname| {
            let pathname = pathname.as_ref();
            Breadcrumb {
                pathname: pathname.to_string(),
                title: breadcrumb_title(pathname, index),
            }
        })
        .collect()
}

/// Title for a single pathname.
pub fn breadcrumb_title(pathname: &str, index: &[FlattenedRoute]) -> String {
    index
        .iter()
        .find(|route| match_path(&route.pattern, pathname).is_some())
        .map(|route| route.title.clone())
        .unwrap_or_else(|| fallback_title(pathname))
}

/// Label derived from the last path segment: `monthly-sales` becomes
/// `Monthly Sales`; the root becomes [`HOME_LABEL`].
pub fn fallback_title(pathname: &str) -> String {
    let Some(segment) = segments(pathname).pop() else {
        return HOME_LABEL.to_string();
    };

    let spaced = segment.replace(['-', '_'], " ");
    WORD_START
        .replace_all(&spaced, |caps: &regex::Captures<'_>| caps[0].to_uppercase())
        .into_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn entry(pattern: &str, title: &str) -> FlattenedRoute {
        FlattenedRoute {
            pattern: pattern.to_string(),
            title: title.to_string(),
        }
    }

    #[test]
    fn fallback_title_cases_words() {
        assert_eq!(fallback_title("/reports/monthly-sales"), "Monthly Sales");
        assert_eq!(fallback_title("/user_groups"), "User Groups");
        assert_eq!(fallback_title("/reports/"), "Reports");
    }

    #[test]
    fn fallback_for_root_is_home() {
        assert_eq!(fallback_title("/"), HOME_LABEL);
        assert_eq!(fallback_title(""), HOME_LABEL);
    }

    #[test]
    fn indexed_title_wins_over_fallback() {
        let index = vec![entry("/products", "Products"), entry("/products/:id", "Edit Product")];
        let crumbs = resolve_breadcrumbs(&["/products", "/products/7"], &index);
        let titles: Vec<_> = crumbs.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["Products", "Edit Product"]);
        assert_eq!(crumbs[1].pathname, "/products/7");
    }

    #[test]
    fn first_matching_entry_wins() {
        let index = vec![entry("/products/new", "Add Product"), entry("/products/:id", "Edit Product")];
        assert_eq!(breadcrumb_title("/products/new", &index), "Add Product");
        assert_eq!(breadcrumb_title("/products/12", &index), "Edit Product");
    }

    #[test]
    fn unmatched_path_uses_fallback() {
        let index = vec![entry("/products", "Products")];
        assert_eq!(breadcrumb_title("/reports/monthly-sales", &index), "Monthly Sales");
    }

    #[test]
    fn malformed_index_entry_never_matches() {
        let index = vec![entry("/products/:", "Broken")];
        assert_eq!(breadcrumb_title("/products/x", &index), "X");
    }
}

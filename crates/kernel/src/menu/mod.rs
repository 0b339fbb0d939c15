//! Sidebar menu derived from the route tree.
//!
//! The menu is a pure projection of the authored routes:
//! - Ordering follows `meta.order` among siblings
//! - `hide_in_menu` routes are skipped, their children promoted
//! - Branches with visible children become submenus

mod builder;

pub use builder::{Menu, MenuItem, MenuTarget};

//! Navigation shell: responsive sidebar collapse state.
//!
//! The controller owns one authoritative `collapsed` flag, unless the
//! caller binds an external one, in which case every read and write goes
//! through the binding and the controller is a pass-through.
//!
//! Resizing into the mobile range while expanded collapses the sidebar.
//! Nothing but an explicit toggle ever expands it again.

pub mod runtime;

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;

pub use runtime::{ShellEvent, ShellRuntime, ShellView, spawn_shell};

/// Widest viewport treated as mobile, in pixels.
pub const MOBILE_MAX_WIDTH: u32 = 768;

/// Widest viewport treated as tablet, in pixels.
pub const TABLET_MAX_WIDTH: u32 = 1024;

/// Viewport size classes derived from a width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
}

impl Viewport {
    pub fn new(width: u32) -> Self {
        Self { width }
    }

    pub fn is_mobile(&self) -> bool {
        self.width <= MOBILE_MAX_WIDTH
    }

    pub fn is_tablet(&self) -> bool {
        self.width > MOBILE_MAX_WIDTH && self.width <= TABLET_MAX_WIDTH
    }
}

/// Caller-owned collapsed flag.
pub trait CollapseBinding: Send + Sync {
    fn collapsed(&self) -> bool;
    fn set_collapsed(&self, collapsed: bool);
}

/// A shareable collapsed flag, e.g. owned by the page layout and handed
/// to both the header toggle and the sidebar.
#[derive(Clone, Default)]
pub struct SharedCollapse {
    inner: Arc<Mutex<bool>>,
}

impl SharedCollapse {
    pub fn new(collapsed: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(collapsed)),
        }
    }
}

impl CollapseBinding for SharedCollapse {
    fn collapsed(&self) -> bool {
        *self.inner.lock()
    }

    fn set_collapsed(&self, collapsed: bool) {
        *self.inner.lock() = collapsed;
    }
}

enum CollapseSource {
    Internal(bool),
    External(Arc<dyn CollapseBinding>),
}

impl fmt::Debug for CollapseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal(collapsed) => f.debug_tuple("Internal").field(collapsed).finish(),
            Self::External(binding) => f.debug_tuple("External").field(&binding.collapsed()).finish(),
        }
    }
}

/// Exported shell state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationShellState {
    pub collapsed: bool,
    pub is_mobile: bool,
    pub is_tablet: bool,
    pub last_opened_menu_path: Vec<String>,
}

/// Sidebar collapse/expand state machine.
#[derive(Debug)]
pub struct ShellController {
    source: CollapseSource,
    is_mobile: bool,
    is_tablet: bool,
    last_opened: Vec<String>,
    /// Record the opened submenus when an item is selected.
    auto_collapse: bool,
}

impl ShellController {
    /// Mount with internal state: collapsed iff the viewport is mobile.
    pub fn mount(width: u32, auto_collapse: bool) -> Self {
        let viewport = Viewport::new(width);
        Self {
            source: CollapseSource::Internal(viewport.is_mobile()),
            is_mobile: viewport.is_mobile(),
            is_tablet: viewport.is_tablet(),
            last_opened: Vec::new(),
            auto_collapse,
        }
    }

    /// Mount as a pass-through for a caller-owned collapsed flag.
    pub fn mount_external(
        width: u32,
        auto_collapse: bool,
        binding: Arc<dyn CollapseBinding>,
    ) -> Self {
        Self {
            source: CollapseSource::External(binding),
            ..Self::mount(width, auto_collapse)
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self.source, CollapseSource::External(_))
    }

    pub fn collapsed(&self) -> bool {
        match &self.source {
            CollapseSource::Internal(collapsed) => *collapsed,
            CollapseSource::External(binding) => binding.collapsed(),
        }
    }

    pub fn is_mobile(&self) -> bool {
        self.is_mobile
    }

    pub fn is_tablet(&self) -> bool {
        self.is_tablet
    }

    /// Set the collapsed flag through whichever source is active.
    pub fn set_collapsed(&mut self, collapsed: bool) {
        match &mut self.source {
            CollapseSource::Internal(current) => *current = collapsed,
            CollapseSource::External(binding) => binding.set_collapsed(collapsed),
        }
    }

    /// Explicit user toggle.
    pub fn toggle(&mut self) {
        let collapsed = !self.collapsed();
        self.set_collapsed(collapsed);
        debug!(collapsed, "sidebar toggled");
    }

    /// Apply a viewport resize.
    ///
    /// Entering the mobile range while expanded collapses; no resize ever
    /// expands.
    pub fn observe_resize(&mut self, width: u32) {
        let viewport = Viewport::new(width);
        let was_mobile = self.is_mobile;

        self.is_mobile = viewport.is_mobile();
        self.is_tablet = viewport.is_tablet();

        if !was_mobile && self.is_mobile && !self.collapsed() {
            self.set_collapsed(true);
            debug!(width, "sidebar collapsed on entering mobile width");
        }
    }

    /// A menu item was selected (after navigating to it).
    ///
    /// `key_path` is leaf first; everything but the leaf is remembered as
    /// the open submenus.
    pub fn select_menu_item(&mut self, key_path: &[String]) {
        if self.auto_collapse {
            self.last_opened = key_path.iter().skip(1).cloned().collect();
        }
        if self.is_mobile && !self.collapsed() {
            self.set_collapsed(true);
        }
    }

    /// Submenus opened or closed by the user. Ignored while collapsed.
    pub fn open_change(&mut self, open_keys: Vec<String>) {
        if self.collapsed() {
            return;
        }
        self.last_opened = open_keys;
    }

    /// Submenus to render open; `None` while collapsed so the menu
    /// controls them itself.
    pub fn open_keys(&self) -> Option<&[String]> {
        if self.collapsed() {
            None
        } else {
            Some(&self.last_opened)
        }
    }

    /// On mobile a collapsed sidebar is not rendered at all.
    pub fn sidebar_hidden(&self) -> bool {
        self.is_mobile && self.collapsed()
    }

    pub fn state(&self) -> NavigationShellState {
        NavigationShellState {
            collapsed: self.collapsed(),
            is_mobile: self.is_mobile,
            is_tablet: self.is_tablet,
            last_opened_menu_path: self.last_opened.clone(),
        }
    }
}

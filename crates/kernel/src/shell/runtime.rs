//! Shell event loop.
//!
//! Viewport resizes, navigations and user actions arrive on one channel
//! and are handled one at a time, in arrival order. Every handled event
//! yields a fresh [`ShellView`]; nothing is computed ahead of the event
//! that needs it.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{NavigationShellState, ShellController};
use crate::auth::{AuthSignal, User};
use crate::breadcrumb::Breadcrumb;
use crate::menu::MenuItem;
use crate::navigation::{Chrome, Location, RenderedView};
use crate::state::AppState;

/// Capacity of the inbound event channel and of the outbound view channel.
const EVENT_BUFFER: usize = 64;

/// Input to the shell.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ShellEvent {
    /// The viewport changed width.
    Resize { width: u32 },
    /// Navigate to a path.
    Navigate { path: String },
    /// Header collapse button.
    Toggle,
    /// A menu entry was clicked.
    SelectMenu { key: String },
    /// Submenus were opened or closed.
    OpenChange { keys: Vec<String> },
    /// The host's login flow succeeded.
    Login { user: User, token: String },
    /// The user signed out.
    Logout,
}

/// Everything the host needs to draw the shell after an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShellView {
    pub shell: NavigationShellState,
    pub location: Option<Location>,
    pub chrome: Chrome,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub selected_keys: Vec<String>,
    /// `None` while collapsed.
    pub open_keys: Option<Vec<String>>,
    pub sidebar_hidden: bool,
    pub authenticated: bool,
}

/// Shell state plus the navigation it is showing.
pub struct ShellRuntime {
    state: AppState,
    controller: ShellController,
    current: Option<RenderedView>,
}

impl ShellRuntime {
    /// Mount the shell at the given viewport width.
    pub fn mount(state: AppState, width: u32) -> Self {
        let controller = ShellController::mount(width, state.config().sidebar_auto_collapse);
        Self::with_controller(state, controller)
    }

    /// Mount around an already configured controller (e.g. an external
    /// collapse binding).
    pub fn with_controller(state: AppState, controller: ShellController) -> Self {
        Self {
            state,
            controller,
            current: None,
        }
    }

    pub fn controller(&self) -> &ShellController {
        &self.controller
    }

    pub fn current(&self) -> Option<&RenderedView> {
        self.current.as_ref()
    }

    /// Handle one event and return the resulting view.
    pub fn handle(&mut self, event: ShellEvent) -> ShellView {
        debug!(?event, "shell event");

        match event {
            ShellEvent::Resize { width } => self.controller.observe_resize(width),
            ShellEvent::Navigate { path } => self.go(&path, None),
            ShellEvent::Toggle => self.controller.toggle(),
            ShellEvent::SelectMenu { key } => self.select(key),
            ShellEvent::OpenChange { keys } => self.controller.open_change(keys),
            ShellEvent::Login { user, token } => {
                self.state.session().login(user, token);
                let target = self
                    .current
                    .as_ref()
                    .and_then(|view| view.location.from.clone())
                    .unwrap_or_else(|| self.state.config().home_path.clone());
                self.go(&target, None);
            }
            ShellEvent::Logout => {
                self.state.session().logout();
                let entry = self.state.routes().gate().entry_point().to_string();
                self.go(&entry, None);
            }
        }

        self.view()
    }

    fn go(&mut self, path: &str, from: Option<String>) {
        let navigation = self.state.navigator().navigate_from(path, from);
        match navigation.view {
            Some(view) => self.current = Some(view),
            None => warn!(path = %path, "navigation rendered nothing, keeping current view"),
        }
    }

    fn select(&mut self, key: String) {
        let state = self.state.clone();
        let menu = state.routes().menu();

        // Submenus only open and close; they navigate nowhere.
        if menu.find(&key).is_some_and(MenuItem::is_submenu) {
            debug!(key = %key, "submenu selected, ignoring");
            return;
        }

        let key_path = menu.key_path(&key).unwrap_or_else(|| vec![key.clone()]);
        let target = menu
            .find(&key)
            .and_then(MenuItem::path)
            .map(str::to_string)
            .unwrap_or(key);

        self.go(&target, None);
        self.controller.select_menu_item(&key_path);
    }

    /// The current view.
    pub fn view(&self) -> ShellView {
        let (location, chrome, breadcrumbs, selected_keys) = match &self.current {
            Some(view) => (
                Some(view.location.clone()),
                view.chrome,
                view.breadcrumbs.clone(),
                view.selected_keys.clone(),
            ),
            None => (None, Chrome::Shell, Vec::new(), Vec::new()),
        };

        ShellView {
            shell: self.controller.state(),
            location,
            chrome,
            breadcrumbs,
            selected_keys,
            open_keys: self.controller.open_keys().map(<[String]>::to_vec),
            sidebar_hidden: self.controller.sidebar_hidden(),
            authenticated: self.state.session().is_authenticated(),
        }
    }

    /// Consume events until the sender side closes, publishing a view after
    /// each one. Returns the final view.
    ///
    /// A full view channel pauses event handling until the consumer catches
    /// up.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<ShellEvent>,
        views: mpsc::Sender<ShellView>,
    ) -> ShellView {
        while let Some(event) = events.recv().await {
            let view = self.handle(event);
            // A dropped receiver is fine; the final view is still returned.
            let _ = views.send(view).await;
        }
        debug!("shell event channel closed");
        self.view()
    }
}

/// Start a shell on the current Tokio runtime.
///
/// Returns the event sender, the stream of views, and a handle resolving to
/// the final view once the sender is dropped.
pub fn spawn_shell(
    state: AppState,
    width: u32,
) -> (
    mpsc::Sender<ShellEvent>,
    mpsc::Receiver<ShellView>,
    JoinHandle<ShellView>,
) {
    let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
    let (view_tx, view_rx) = mpsc::channel(EVENT_BUFFER);

    let runtime = ShellRuntime::mount(state, width);
    let handle = tokio::spawn(runtime.run(event_rx, view_tx));

    (event_tx, view_rx, handle)
}

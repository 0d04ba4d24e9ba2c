use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::models::{Location, NavigationOutcome, ScrollPosition};

use super::guard::{NavigationGuard, Next, Resolution};
use super::table::{ResolvedRoute, RouteTable, normalize_path};

/// Guard redirects followed for a single navigation before giving up.
pub const MAX_GUARD_REDIRECTS: usize = 8;

/// History entries kept per navigator. The oldest entries are dropped first.
pub const MAX_HISTORY_ENTRIES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryMode {
    Push,
    Pop,
}

/// Saved scroll positions only exist for paths still present in `entries`.
#[derive(Debug, Default)]
struct History {
    entries: VecDeque<Location>,
    saved_scroll: HashMap<String, ScrollPosition>,
}

impl History {
    fn push(&mut self, location: Location) {
        if self.entries.back() == Some(&location) {
            return;
        }
        self.entries.push_back(location);
        while self.entries.len() > MAX_HISTORY_ENTRIES {
            if let Some(evicted) = self.entries.pop_front() {
                self.forget_scroll(&evicted.path);
            }
        }
    }

    fn pop(&mut self) {
        if let Some(left) = self.entries.pop_back() {
            self.forget_scroll(&left.path);
        }
    }

    fn forget_scroll(&mut self, path: &str) {
        if !self.entries.iter().any(|l| l.path == path) {
            self.saved_scroll.remove(path);
        }
    }
}

/// Navigator
///
/// Hosts navigation for the console: resolves the requested path, runs the
/// registered guard, follows its redirects, and commits the final location to
/// history.
///
/// Every call to `navigate` takes a ticket. If another navigation starts while
/// a guard is still pending, the older one is reported `Superseded` once its
/// guard resolves and commits nothing.
pub struct Navigator {
    table: Arc<RouteTable>,
    guard: Arc<dyn NavigationGuard>,
    generation: AtomicU64,
    history: Mutex<History>,
}

impl Navigator {
    pub fn new(table: Arc<RouteTable>, guard: Arc<dyn NavigationGuard>) -> Self {
        Self {
            table,
            guard,
            generation: AtomicU64::new(0),
            history: Mutex::new(History::default()),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// The last committed location, if any navigation has committed yet.
    pub fn current(&self) -> Option<Location> {
        self.lock_history().entries.back().cloned()
    }

    pub fn history_len(&self) -> usize {
        self.lock_history().entries.len()
    }

    /// Records the scroll position of the current location so `back()` can restore it.
    pub fn save_scroll(&self, position: ScrollPosition) {
        let mut history = self.lock_history();
        if let Some(path) = history.entries.back().map(|l| l.path.clone()) {
            history.saved_scroll.insert(path, position);
        }
    }

    pub async fn navigate(&self, path: &str) -> NavigationOutcome {
        self.run(path, HistoryMode::Push).await
    }

    /// back
    ///
    /// Navigates to the previous history entry, guarded like any other
    /// navigation. Returns `None` when there is nothing to go back to.
    pub async fn back(&self) -> Option<NavigationOutcome> {
        let previous = {
            let history = self.lock_history();
            let len = history.entries.len();
            if len < 2 {
                return None;
            }
            history.entries[len - 2].path.clone()
        };

        Some(self.run(&previous, HistoryMode::Pop).await)
    }

    async fn run(&self, path: &str, mode: HistoryMode) -> NavigationOutcome {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let requested = normalize_path(path);
        let mut target_path = requested.clone();

        for _ in 0..=MAX_GUARD_REDIRECTS {
            let target = self.table.resolve(&target_path);
            let from = self.current();

            let (next, rx) = Next::channel();
            self.guard.before_each(&target, from.as_ref(), next);
            let resolution = rx.await;

            if self.generation.load(Ordering::SeqCst) != ticket {
                tracing::debug!(path = %requested, "navigation superseded");
                return NavigationOutcome::Superseded;
            }

            match resolution {
                Ok(Resolution::Proceed) => return self.commit(&requested, target, mode),
                Ok(Resolution::Redirect(to)) => {
                    tracing::debug!(from = %target.path, to = %to, "guard redirect");
                    target_path = normalize_path(&to);
                }
                Err(_) => {
                    tracing::debug!(path = %target.path, "navigation blocked by guard");
                    return NavigationOutcome::Blocked { path: target.path };
                }
            }
        }

        tracing::warn!(path = %requested, "guard redirect limit reached");
        NavigationOutcome::RedirectLoop { path: requested }
    }

    fn commit(&self, requested: &str, target: ResolvedRoute, mode: HistoryMode) -> NavigationOutcome {
        let location = Location {
            path: target.path,
            name: target.name,
            title: target.meta.title,
        };
        let redirected_from = (location.path != requested).then(|| requested.to_string());

        let mut history = self.lock_history();

        // Going back only restores when the guard let it reach the entry it
        // asked for; a redirected `back()` is an ordinary push.
        let scroll = if mode == HistoryMode::Pop && redirected_from.is_none() {
            history.pop();
            history
                .saved_scroll
                .get(&location.path)
                .copied()
                .unwrap_or_default()
        } else {
            ScrollPosition::default()
        };

        history.push(location.clone());

        tracing::debug!(path = %location.path, ?redirected_from, "navigation committed");

        NavigationOutcome::Committed {
            location,
            redirected_from,
            scroll,
        }
    }

    fn lock_history(&self) -> std::sync::MutexGuard<'_, History> {
        self.history.lock().unwrap_or_else(|e| e.into_inner())
    }
}

use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};

/// Marker set on the document root while the dark theme is applied.
pub const DARK_MARKER: &str = "dark";

/// ShellDocument
///
/// The console's document-level presentation state: the visible title and the
/// set of boolean markers on the root element. The guard writes the title, the
/// theme controller writes the dark marker, and page shells read both.
#[derive(Debug)]
pub struct ShellDocument {
    title: RwLock<String>,
    markers: RwLock<BTreeSet<String>>,
}

impl ShellDocument {
    /// Starts with `initial_title` (the application name) and no markers.
    pub fn new(initial_title: &str) -> Self {
        Self {
            title: RwLock::new(initial_title.to_string()),
            markers: RwLock::new(BTreeSet::new()),
        }
    }

    pub fn title(&self) -> String {
        self.title.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn set_title(&self, title: &str) {
        let mut current = self.title.write().unwrap_or_else(|e| e.into_inner());
        *current = title.to_string();
    }

    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(marker)
    }

    /// Adds the marker when `on`, removes it otherwise.
    pub fn set_marker(&self, marker: &str, on: bool) {
        let mut markers = self.markers.write().unwrap_or_else(|e| e.into_inner());
        if on {
            markers.insert(marker.to_string());
        } else {
            markers.remove(marker);
        }
    }
}

pub type DocumentState = Arc<ShellDocument>;

use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::{
    document::{DARK_MARKER, DocumentState},
    storage::{StorageState, THEME_KEY},
};

/// The persisted literal for a theme value.
pub fn theme_literal(is_dark: bool) -> &'static str {
    if is_dark { "dark" } else { "light" }
}

// --- OS Preference Probe ---

/// ColorSchemeProbe
///
/// A point-in-time read of the operating system's dark color scheme preference.
/// The controller calls it only during `initialize()`; later OS changes are
/// not observed until the next initialization.
pub trait ColorSchemeProbe: Send + Sync {
    fn prefers_dark(&self) -> bool;
}

/// SystemColorScheme
///
/// Asks the desktop environment. Falls back to light when detection fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemColorScheme;

impl ColorSchemeProbe for SystemColorScheme {
    fn prefers_dark(&self) -> bool {
        detect_system_dark_mode()
    }
}

/// FixedColorScheme
///
/// A preference pinned by configuration (`COLOR_SCHEME`) or by tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedColorScheme(pub bool);

impl ColorSchemeProbe for FixedColorScheme {
    fn prefers_dark(&self) -> bool {
        self.0
    }
}

fn detect_system_dark_mode() -> bool {
    // Windows: AppsUseLightTheme is 0 in dark mode.
    #[cfg(target_os = "windows")]
    {
        use winreg::RegKey;
        use winreg::enums::HKEY_CURRENT_USER;

        if let Ok(key) = RegKey::predef(HKEY_CURRENT_USER)
            .open_subkey("Software\\Microsoft\\Windows\\CurrentVersion\\Themes\\Personalize")
        {
            if let Ok(value) = key.get_value::<u32, _>("AppsUseLightTheme") {
                return value == 0;
            }
        }
    }

    #[cfg(target_os = "linux")]
    {
        use std::process::Command;

        if let Ok(output) = Command::new("gsettings")
            .args(["get", "org.gnome.desktop.interface", "color-scheme"])
            .output()
        {
            if String::from_utf8_lossy(&output.stdout).contains("prefer-dark") {
                return true;
            }
        }

        if let Ok(output) = Command::new("gsettings")
            .args(["get", "org.gnome.desktop.interface", "gtk-theme"])
            .output()
        {
            if String::from_utf8_lossy(&output.stdout)
                .to_lowercase()
                .contains("dark")
            {
                return true;
            }
        }
    }

    #[cfg(target_os = "macos")]
    {
        use std::process::Command;

        if let Ok(output) = Command::new("defaults")
            .args(["read", "-g", "AppleInterfaceStyle"])
            .output()
        {
            if output.status.success()
                && String::from_utf8_lossy(&output.stdout)
                    .to_lowercase()
                    .contains("dark")
            {
                return true;
            }
        }
    }

    false
}

// --- Controller ---

/// ThemeController
///
/// Owns the single `is_dark` preference. Every mutation goes through
/// `apply_and_persist`, which updates the document's dark marker, writes the
/// persisted literal, and only then publishes the new value to subscribers.
/// The whole mutation runs under one lock, so two toggles never interleave and
/// no subscriber sees a value ahead of the applied state.
pub struct ThemeController {
    store: StorageState,
    document: DocumentState,
    probe: Arc<dyn ColorSchemeProbe>,
    state: Mutex<bool>,
    published: watch::Sender<bool>,
}

impl ThemeController {
    /// Starts light. Call `initialize()` once at process start.
    pub fn new(
        store: StorageState,
        document: DocumentState,
        probe: Arc<dyn ColorSchemeProbe>,
    ) -> Self {
        let (published, _) = watch::channel(false);
        Self {
            store,
            document,
            probe,
            state: Mutex::new(false),
            published,
        }
    }

    /// initialize
    ///
    /// Reads the persisted preference; when none is stored (an empty value counts
    /// as none, as does an unreadable store) asks the OS probe once. The result is always applied, even if it
    /// equals the current value. Returns the resulting value.
    pub fn initialize(&self) -> bool {
        let mut state = self.lock_state();

        let is_dark = match self.store.get(THEME_KEY) {
            Ok(Some(saved)) if !saved.is_empty() => saved == "dark",
            Ok(_) => self.probe.prefers_dark(),
            Err(e) => {
                tracing::warn!(error = %e, "theme read failed, using OS preference");
                self.probe.prefers_dark()
            }
        };

        *state = is_dark;
        self.apply_and_persist(is_dark);
        tracing::info!(theme = theme_literal(is_dark), "theme initialized");
        is_dark
    }

    /// Flips the preference, applies and persists it, and returns the new value.
    pub fn toggle(&self) -> bool {
        let mut state = self.lock_state();
        *state = !*state;
        let is_dark = *state;

        self.apply_and_persist(is_dark);
        tracing::info!(theme = theme_literal(is_dark), "theme toggled");
        is_dark
    }

    pub fn is_dark(&self) -> bool {
        *self.lock_state()
    }

    /// A receiver that observes every applied value.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.published.subscribe()
    }

    /// Write failures are logged and dropped; they do not undo the visual change.
    fn apply_and_persist(&self, is_dark: bool) {
        self.document.set_marker(DARK_MARKER, is_dark);

        if let Err(e) = self.store.set(THEME_KEY, theme_literal(is_dark)) {
            tracing::warn!(error = %e, "failed to persist theme");
        }

        self.published.send_replace(is_dark);
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, bool> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

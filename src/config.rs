use std::env;
use std::path::PathBuf;

/// Application name shown after every page title.
pub const DEFAULT_APP_NAME: &str = "Midjourney Proxy";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// AppConfig
///
/// Holds the console shell's configuration. It is loaded once at startup and
/// never changes afterwards; handlers pull it from the application state via
/// FromRef.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls log format and which settings are mandatory.
    pub env: Env,
    // Appended to every page title: "{title} - {app_name}".
    pub app_name: String,
    // JSON file backing the persisted key-value store.
    pub storage_path: PathBuf,
    // Socket address for the HTTP host.
    pub bind_addr: String,
    // Pins the OS color scheme preference instead of asking the desktop.
    // `None` means detect.
    pub color_scheme: Option<ColorScheme>,
}

/// Env
///
/// Defines the runtime context.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ColorScheme {
    Light,
    Dark,
}

impl ColorScheme {
    /// Parses "dark" or "light", ignoring case. Anything else is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
}

impl Default for AppConfig {
    /// default
    ///
    /// Safe, non-panicking values for test setup. The storage path points into
    /// the system temp directory.
    fn default() -> Self {
        Self {
            env: Env::Local,
            app_name: DEFAULT_APP_NAME.to_string(),
            storage_path: env::temp_dir().join("console-shell-test").join("storage.json"),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            color_scheme: None,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables.
    ///
    /// # Panics
    /// Panics in `Env::Production` when `CONSOLE_STORAGE_PATH` is not set, so a
    /// production shell never silently writes session state to a default
    /// location.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let storage_path = match env {
            Env::Production => PathBuf::from(
                env::var("CONSOLE_STORAGE_PATH")
                    .expect("FATAL: CONSOLE_STORAGE_PATH must be set in production."),
            ),
            Env::Local => env::var("CONSOLE_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_storage_path()),
        };

        Self {
            env,
            app_name: env::var("APP_NAME").unwrap_or_else(|_| DEFAULT_APP_NAME.to_string()),
            storage_path,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            color_scheme: env::var("COLOR_SCHEME")
                .ok()
                .and_then(|v| ColorScheme::parse(&v)),
        }
    }
}

/// Per-user config directory, or the working directory when there is none.
pub fn default_storage_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("console-shell");
    path.push("storage.json");
    path
}

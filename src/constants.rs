//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default base URL of the vibra API
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Name of the data directory under the user's home
pub const DATA_DIR_NAME: &str = ".vibra";

/// File holding the persisted session (single slot)
pub const SESSION_FILE: &str = "farcasterUser.json";

/// Optional YAML config file inside the data directory
pub const CONFIG_FILE: &str = "config.yaml";

/// Default log file, relative to the working directory
pub const DEFAULT_LOG_FILE: &str = "vibra.log";

/// Seconds between signer approval checks
pub const DEFAULT_POLL_SECS: u64 = 5;

/// Username shown when the server does not echo the author of a new cast
pub const FALLBACK_USERNAME: &str = "anon_user";

/// Display name shown when the server does not echo the author of a new cast
pub const FALLBACK_DISPLAY_NAME: &str = "Anon";

/// Avatar used when the server does not echo the author of a new cast
pub const FALLBACK_PFP_URL: &str = "https://wrpcd.net/cdn-cgi/image/anim=false,fit=contain,f=auto,w=168/https%3A%2F%2Fwarpcast.com%2Favatar.png";

/// Application name
pub const APP_NAME: &str = "vibra";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

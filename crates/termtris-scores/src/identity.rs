//! Display name lookup from the operating environment.

use tracing::{debug, warn};

use crate::entry::{DEFAULT_USER, sanitize_name};

/// Environment variables consulted for the account name, in order
const ACCOUNT_VARS: [&str; 3] = ["USER", "LOGNAME", "USERNAME"];

/// Account name of the current user, sanitized for storage
pub fn account_name() -> String {
    account_name_from(|key| std::env::var(key).ok())
}

/// Resolve the account name through a custom variable lookup
pub fn account_name_from<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    for key in ACCOUNT_VARS {
        if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
            debug!("Using account name from {}", key);
            return sanitize_name(&value);
        }
    }

    warn!(
        "Failed to determine account name, using \"{}\"",
        DEFAULT_USER
    );
    DEFAULT_USER.to_string()
}

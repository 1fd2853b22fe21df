use std::path::Path;

use chrono::Local;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::config::{load_config_from, save_config_to};
use crate::models::Platform;

/// Store credentials for `platform` in the config file at `path`. Values not
/// given keep what was stored before.
pub fn login(
    path: &Path,
    platform: Platform,
    csrf: Option<String>,
    session: Option<String>,
    csrf_header: Option<String>,
) -> Result<()> {
    let mut user_config = load_config_from(path)?;

    let backend = user_config.backends.entry(platform).or_default();
    if let Some(csrf) = csrf {
        backend.csrf = csrf;
    }
    if let Some(session) = session {
        backend.session = session;
    }
    if csrf_header.is_some() {
        backend.csrf_header = csrf_header;
    }

    if backend.csrf.is_empty() || backend.session.is_empty() {
        return Err(Error::Config {
            message: format!(
                "both a CSRF token and a session cookie are needed for {}: pass --csrf and --session",
                platform
            ),
        });
    }
    backend.updated_at = Some(Local::now().to_rfc3339());

    if user_config.default_provider.is_none() {
        user_config.default_provider = Some(platform);
    }

    save_config_to(path, &user_config)?;
    info!(%platform, path = %path.display(), "saved credentials");
    println!("Saved {} credentials to {}", platform, path.display());
    Ok(())
}

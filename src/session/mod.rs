// wpsync/src/session/mod.rs
pub(crate) mod console;
pub(crate) mod logic;

use tracing::{debug, info};

use crate::cache::ConfigStore;
use crate::config::settings::RetryPolicy;
use crate::config::{Mode, SiteConfig};
use crate::errors::{AppError, Result};
use crate::utils::wordpress;

pub use console::{Console, LineConsole};
pub use logic::ConfigureOutcome;

/// A validated request to configure one WordPress installation.
#[derive(Debug, Clone)]
pub struct Session {
    mode: Mode,
    base_dir: String,
    config: SiteConfig,
}

impl Session {
    /// Validates the mode label and the WordPress marker file.
    ///
    /// Touches nothing on disk beyond checking that `wp-config.php` exists.
    pub fn new(mode: &str, base_dir: impl Into<String>) -> Result<Self> {
        let mode: Mode = mode.parse()?;
        let base_dir = base_dir.into();

        if !wordpress::is_wordpress_install(&base_dir) {
            return Err(AppError::MissingWordPress(base_dir));
        }

        Ok(Session {
            mode,
            config: SiteConfig::for_base_dir(&base_dir),
            base_dir,
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn base_dir(&self) -> &str {
        &self.base_dir
    }

    /// The configuration currently in effect.
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }
}

/// Public entry point for the configuration session.
/// Loads or collects the configuration for `session` and reports the result on `console`.
pub fn run_session_flow<C: Console>(
    session: &mut Session,
    store: &ConfigStore,
    console: &mut C,
    policy: RetryPolicy,
) -> Result<ConfigureOutcome> {
    let outcome = logic::auto_configure(session, store, console, policy)?;
    let fingerprint = store.fingerprint(session.base_dir());

    info!(
        mode = %session.mode(),
        fingerprint = %fingerprint,
        state = ?outcome.state,
        saved_to = ?outcome.saved_to,
        "configuration session finished"
    );
    debug!(config = ?session.config(), "configuration in effect");
    console.write_line(&format!(
        "✅ Configuration ready for {} ({})",
        session.mode(), fingerprint
    ))?;
    Ok(outcome)
}

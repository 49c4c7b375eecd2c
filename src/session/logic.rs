// wpsync/src/session/logic.rs
use std::path::PathBuf;
use tracing::debug;

use super::Session;
use super::console::Console;
use crate::cache::{CacheLookup, ConfigStore};
use crate::config::settings::RetryPolicy;
use crate::config::{PromptedField, SiteConfig};
use crate::errors::{AppError, Result};

const CONFIRM_PROMPT: &str = "Is this okay (Y/N)?";

/// Where the auto-configure run ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// No cache entry existed; the user entered everything.
    NoCacheFile,
    /// A cache entry existed but could not be used; the user entered everything.
    CacheLoadFailed,
    /// The cached values were rejected at confirmation; the user re-entered everything.
    CacheLoadedUnconfirmed,
    /// The cached values were accepted as-is.
    CacheLoadedConfirmed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigureOutcome {
    pub state: CacheState,
    /// Cache file written by manual entry. `None` when the cached values were accepted.
    pub saved_to: Option<PathBuf>,
}

/// Loads the cached configuration and asks for confirmation, falling back to
/// manual entry when there is no usable cache or the user declines it.
///
/// Manual entry always ends by writing a fresh cache entry; the cache is
/// never re-read afterwards.
pub fn auto_configure<C: Console>(
    session: &mut Session,
    store: &ConfigStore,
    console: &mut C,
    policy: RetryPolicy,
) -> Result<ConfigureOutcome> {
    let state = match store.load(&session.base_dir)? {
        CacheLookup::Missing => CacheState::NoCacheFile,
        CacheLookup::Invalid(_) => CacheState::CacheLoadFailed,
        CacheLookup::Loaded(cached) => {
            session.config = cached;
            if confirm_config(&session.config, console)? {
                debug!(base_dir = %session.base_dir, "cached configuration confirmed");
                return Ok(ConfigureOutcome {
                    state: CacheState::CacheLoadedConfirmed,
                    saved_to: None,
                });
            }
            CacheState::CacheLoadedUnconfirmed
        }
    };

    debug!(base_dir = %session.base_dir, state = ?state, "falling back to manual entry");
    let saved_to = manual_configure(session, store, console, policy)?;
    Ok(ConfigureOutcome {
        state,
        saved_to: Some(saved_to),
    })
}

/// Prompts for all six fields, confirms, and persists the confirmed record.
///
/// A declined confirmation restarts from the first field. The number of
/// rounds is bounded only by `policy`.
pub fn manual_configure<C: Console>(
    session: &mut Session,
    store: &ConfigStore,
    console: &mut C,
    policy: RetryPolicy,
) -> Result<PathBuf> {
    let mut attempt: u32 = 1;
    loop {
        if !policy.allows(attempt) {
            return Err(AppError::RetriesExhausted(attempt - 1));
        }

        let mut draft = SiteConfig::for_base_dir(&session.base_dir);
        for field in PromptedField::ALL {
            draft.set(field, filled_input(console, field.question())?);
        }
        session.config = draft;

        if confirm_config(&session.config, console)? {
            return store.save(&session.base_dir, &session.config);
        }
        debug!(attempt, "configuration declined, starting over");
        attempt = attempt.saturating_add(1);
    }
}

/// Prints every field and asks for a yes/no answer.
pub fn confirm_config<C: Console>(config: &SiteConfig, console: &mut C) -> Result<bool> {
    console.write_line("")?;
    console.write_line("-- Configuration --")?;
    for line in config.summary_lines() {
        console.write_line(&line)?;
    }
    console.write_line("")?;
    console.write_line("")?;

    let answer = console.ask(CONFIRM_PROMPT)?;
    Ok(is_affirmative(&answer))
}

/// Repeats `prompt` until a non-empty answer is given.
pub fn filled_input<C: Console>(console: &mut C, prompt: &str) -> Result<String> {
    loop {
        let answer = console.ask(prompt)?;
        if !answer.is_empty() {
            return Ok(answer);
        }
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.to_lowercase().as_str(), "y" | "yes")
}

// wpsync/src/utils/wordpress.rs
use std::env;
use std::path::Path;

use crate::errors::{AppError, Result};

/// File whose presence marks a directory as a WordPress installation.
pub const MARKER_FILE: &str = "wp-config.php";

pub fn is_wordpress_install(base_dir: &str) -> bool {
    // An empty path would resolve the marker against the working directory.
    !base_dir.is_empty() && Path::new(base_dir).join(MARKER_FILE).is_file()
}

/// Directory holding the running executable, used when no base directory is given.
pub fn default_base_dir() -> Result<String> {
    let exe = env::current_exe()?.canonicalize()?;
    let dir = exe.parent().ok_or_else(|| {
        AppError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("executable path {} has no parent directory", exe.display()),
        ))
    })?;
    Ok(dir.to_string_lossy().into_owned())
}

// wpsync/src/cache/mod.rs
//! Per-site configuration cache.
//!
//! Each WordPress base directory gets one JSON file under the configuration
//! root, named by a short fingerprint of the directory string. The string is
//! hashed as given, so `/srv/wp` and `/srv/wp/` are different cache entries.

use serde_json::Value;
use sha1::{Digest, Sha1};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::SiteConfig;
use crate::errors::{AppError, Result};

/// Number of hex characters kept from the digest.
pub const FINGERPRINT_LEN: usize = 8;

pub type Fingerprinter = fn(&str) -> String;

/// First eight lowercase hex characters of the SHA-1 digest of `base_dir`.
pub fn fingerprint(base_dir: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(base_dir.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..FINGERPRINT_LEN].to_string()
}

/// Result of looking up a cache entry. Only `Loaded` carries a usable record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    Missing,
    Invalid(String),
    Loaded(SiteConfig),
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    root: PathBuf,
    fingerprinter: Fingerprinter,
}

impl ConfigStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_fingerprinter(root, fingerprint)
    }

    pub fn with_fingerprinter(root: impl Into<PathBuf>, fingerprinter: Fingerprinter) -> Self {
        ConfigStore {
            root: root.into(),
            fingerprinter,
        }
    }

    #[cfg(test)]
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn fingerprint(&self, base_dir: &str) -> String {
        (self.fingerprinter)(base_dir)
    }

    pub fn entry_path(&self, base_dir: &str) -> PathBuf {
        self.root.join(self.fingerprint(base_dir))
    }

    /// Looks up the cached record for `base_dir`.
    ///
    /// A missing file or unusable content is reported through [`CacheLookup`],
    /// never as an error. Only a failed read of an existing file is an error.
    pub fn load(&self, base_dir: &str) -> Result<CacheLookup> {
        let path = self.entry_path(base_dir);
        if !path.is_file() {
            debug!(path = %path.display(), "no cached configuration");
            return Ok(CacheLookup::Missing);
        }

        let bytes = fs::read(&path).map_err(|source| AppError::CacheIo {
            path: path.clone(),
            source,
        })?;

        let lookup = parse_entry(&bytes);
        match &lookup {
            CacheLookup::Invalid(reason) => {
                warn!(path = %path.display(), reason = %reason, "ignoring cached configuration")
            }
            _ => debug!(path = %path.display(), "loaded cached configuration"),
        }
        Ok(lookup)
    }

    /// Writes `config` as the cache entry for `base_dir`, replacing any previous content.
    pub fn save(&self, base_dir: &str, config: &SiteConfig) -> Result<PathBuf> {
        self.ensure_root()?;

        let path = self.entry_path(base_dir);
        let content = serde_json::to_string(config)?;
        write_private(&path, content.as_bytes()).map_err(|source| AppError::CacheIo {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), "saved configuration cache");
        Ok(path)
    }

    fn ensure_root(&self) -> Result<()> {
        if self.root.is_dir() {
            return Ok(());
        }

        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o700);
        }
        builder.create(&self.root).map_err(|source| AppError::CacheIo {
            path: self.root.clone(),
            source,
        })
    }
}

fn parse_entry(bytes: &[u8]) -> CacheLookup {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return CacheLookup::Invalid("cache file is empty".to_string());
    }

    let value: Value = match serde_json::from_slice(bytes) {
        Ok(v) => v,
        Err(e) => return CacheLookup::Invalid(format!("malformed JSON: {}", e)),
    };
    if is_falsy(&value) {
        return CacheLookup::Invalid("cache file holds an empty value".to_string());
    }

    match serde_json::from_value::<SiteConfig>(value) {
        Ok(config) => CacheLookup::Loaded(config),
        Err(e) => CacheLookup::Invalid(format!("unexpected cache layout: {}", e)),
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn write_private(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(content)?;

    // The open mode only applies to new files; tighten an existing one as well.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn sample_config(base_dir: &str) -> SiteConfig {
        SiteConfig {
            base_dir: base_dir.to_string(),
            base_url: "http://local.test".into(),
            base_db: "wp_local".into(),
            dest_dir: "/var/www/wp".into(),
            dest_url: "https://example.com".into(),
            dest_db: "wp_prod".into(),
            dest_server: "web1.example.com".into(),
        }
    }

    #[test]
    fn test_fingerprint_is_eight_lowercase_hex_chars() {
        for dir in ["/srv/wp", "", "relative/path", "/srv/ünïcode"] {
            let fp = fingerprint(dir);
            assert_eq!(fp.len(), FINGERPRINT_LEN);
            assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
            assert_eq!(fp, fingerprint(dir));
        }
    }

    #[test]
    fn test_fingerprint_matches_sha1_prefix() {
        // sha1("") = da39a3ee5e6b4b0d3255bfef95601890afd80709
        assert_eq!(fingerprint(""), "da39a3ee");
        // sha1("abc") = a9993e364706816aba3e25717850c26c9cd0d89d
        assert_eq!(fingerprint("abc"), "a9993e36");
    }

    #[test]
    fn test_fingerprint_does_not_canonicalize() {
        assert_ne!(fingerprint("/srv/wp"), fingerprint("/srv/wp/"));
        assert_ne!(fingerprint("/srv/wp"), fingerprint("/srv/./wp"));
    }

    #[test]
    fn test_load_reports_missing_entry() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let store = ConfigStore::new(dir.path().join(".wpsync"));
        assert_eq!(store.load("/srv/wp")?, CacheLookup::Missing);
        Ok(())
    }

    #[test]
    fn test_save_then_load_round_trip() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let store = ConfigStore::new(dir.path().join(".wpsync"));
        let config = sample_config("/srv/wp");

        let path = store.save("/srv/wp", &config)?;
        assert_eq!(path, dir.path().join(".wpsync").join(fingerprint("/srv/wp")));
        assert_eq!(store.load("/srv/wp")?, CacheLookup::Loaded(config));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_save_restricts_permissions() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir()?;
        let root = dir.path().join(".wpsync");
        let store = ConfigStore::new(&root);

        // pre-existing, world-readable entry gets tightened
        fs::create_dir(&root)?;
        let entry = store.entry_path("/srv/wp");
        fs::write(&entry, "{}")?;
        fs::set_permissions(&entry, fs::Permissions::from_mode(0o644))?;

        store.save("/srv/wp", &sample_config("/srv/wp"))?;
        assert_eq!(fs::metadata(&entry)?.permissions().mode() & 0o777, 0o600);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_save_creates_private_root() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir()?;
        let root = dir.path().join(".wpsync");
        let store = ConfigStore::new(&root);
        let path = store.save("/srv/wp", &sample_config("/srv/wp"))?;

        assert_eq!(fs::metadata(&root)?.permissions().mode() & 0o777, 0o700);
        assert_eq!(fs::metadata(&path)?.permissions().mode() & 0o777, 0o600);
        Ok(())
    }

    #[test]
    fn test_save_overwrites_previous_entry() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let store = ConfigStore::new(dir.path());
        store.save("/srv/wp", &sample_config("/srv/wp"))?;

        let mut updated = sample_config("/srv/wp");
        updated.dest_server = "web2.example.com".into();
        store.save("/srv/wp", &updated)?;

        assert_eq!(store.load("/srv/wp")?, CacheLookup::Loaded(updated));
        Ok(())
    }

    #[test]
    fn test_unusable_content_is_invalid() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let store = ConfigStore::new(dir.path());
        let entry = store.entry_path("/srv/wp");

        let partial = json!({ "baseDir": "/srv/wp", "baseUrl": "x" }).to_string();
        for content in ["", "  \n", "{not json", "null", "false", "0", "\"\"", "[]", "{}", partial.as_str()] {
            fs::write(&entry, content)?;
            assert!(
                matches!(store.load("/srv/wp")?, CacheLookup::Invalid(_)),
                "content {:?} was not rejected",
                content
            );
        }
        Ok(())
    }

    #[test]
    fn test_loaded_record_keeps_cached_base_dir() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let store = ConfigStore::new(dir.path());
        let content = serde_json::to_string(&sample_config("/elsewhere"))?;
        fs::write(store.entry_path("/srv/wp"), content)?;

        match store.load("/srv/wp")? {
            CacheLookup::Loaded(config) => assert_eq!(config.base_dir, "/elsewhere"),
            other => panic!("expected loaded entry, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_injected_fingerprinter_names_the_entry() -> anyhow::Result<()> {
        fn constant(_: &str) -> String {
            "fixed".to_string()
        }

        let dir = tempdir()?;
        let store = ConfigStore::with_fingerprinter(dir.path(), constant);
        let path = store.save("/srv/wp", &sample_config("/srv/wp"))?;
        assert_eq!(path, dir.path().join("fixed"));
        assert_eq!(store.fingerprint("/any"), "fixed");
        Ok(())
    }
}

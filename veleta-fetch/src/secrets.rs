//! Credential retrieval.
//!
//! Secrets are JSON objects mapping key names to values (the same shape the
//! managed secret service stores them in), e.g.
//! `{"openaq": "...", "inclasns": "..."}`. Retrieval failure is fatal to
//! the invocation: credentials are required, not optional.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::SecretError;

// ============================================================================
// Secret Store Trait
// ============================================================================

/// Store of named secrets.
pub trait SecretStore: Send + Sync {
    /// Retrieves a secret by name as a key/value mapping. Errors propagate;
    /// callers never default missing credentials.
    fn get(&self, name: &str) -> Result<HashMap<String, String>, SecretError>;

    /// Retrieves a single key from a named secret.
    fn get_key(&self, name: &str, key: &str) -> Result<String, SecretError> {
        self.get(name)?
            .remove(key)
            .ok_or_else(|| SecretError::MissingKey {
                secret: name.to_string(),
                key: key.to_string(),
            })
    }
}

fn parse_secret(name: &str, raw: &str) -> Result<HashMap<String, String>, SecretError> {
    serde_json::from_str(raw).map_err(|e| SecretError::Malformed(name.to_string(), e))
}

// ============================================================================
// Env Secret Store
// ============================================================================

/// Secrets injected through the environment by the invoking scheduler.
///
/// Secret `tfm-ucm` is read from `VELETA_SECRET_TFM_UCM` (uppercased,
/// `-` mapped to `_`), whose value is the JSON object.
#[derive(Debug, Clone, Default)]
pub struct EnvSecretStore;

impl EnvSecretStore {
    /// Creates a new store.
    pub fn new() -> Self {
        Self
    }

    /// Returns the environment variable carrying the named secret.
    pub fn var_name(name: &str) -> String {
        let suffix: String = name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("VELETA_SECRET_{suffix}")
    }
}

impl SecretStore for EnvSecretStore {
    fn get(&self, name: &str) -> Result<HashMap<String, String>, SecretError> {
        let var = Self::var_name(name);
        let raw = std::env::var(&var).map_err(|_| SecretError::NotFound(name.to_string()))?;
        parse_secret(name, &raw)
    }
}

// ============================================================================
// File Secret Store
// ============================================================================

/// Secrets mounted as JSON files under a directory, one file per secret.
#[derive(Debug, Clone)]
pub struct FileSecretStore {
    dir: PathBuf,
}

impl FileSecretStore {
    /// Creates a store over the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SecretStore for FileSecretStore {
    fn get(&self, name: &str) -> Result<HashMap<String, String>, SecretError> {
        let path = self.dir.join(format!("{name}.json"));
        if !path.is_file() {
            return Err(SecretError::NotFound(name.to_string()));
        }
        let raw = std::fs::read_to_string(&path)?;
        parse_secret(name, &raw)
    }
}

// ============================================================================
// Tests
// ============================================================================

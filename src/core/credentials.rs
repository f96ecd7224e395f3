use std::collections::HashMap;
use std::env;
use std::fs;

use anyhow::{Context, Result};

/// Static username to password map backing the login prompt. Read from
/// the `CREDENTIALS_JSON` env var when set, otherwise from a JSON file:
/// one flat object of `{"username": "password"}` pairs.
#[derive(Debug)]
pub struct Credentials(HashMap<String, String>);

impl Credentials {
    pub fn load(path: &str) -> Result<Self> {
        Self::from_sources(env::var("CREDENTIALS_JSON").ok().as_deref(), path)
    }

    /// The env value takes precedence over the file when both are
    /// present. An env value that fails to parse is an error, not a
    /// fallback to the file.
    fn from_sources(env_json: Option<&str>, path: &str) -> Result<Self> {
        match env_json {
            Some(raw) => Self::parse(raw).context("Invalid CREDENTIALS_JSON value"),
            None => Self::from_file(path),
        }
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read credentials file {}", path))?;
        Self::parse(&raw).with_context(|| format!("Invalid credentials file {}", path))
    }

    fn parse(raw: &str) -> Result<Self> {
        let map: HashMap<String, String> = serde_json::from_str(raw)?;
        Ok(Self(map))
    }

    /// Exact string comparison on both fields. Passwords in the list
    /// are plaintext, not hashes.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.0
            .get(username)
            .is_some_and(|expected| expected == password)
    }
}

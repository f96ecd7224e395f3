//! Per-user transcript persistence, one JSON file per username.
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::models::{ChatMessage, Transcript};

/// Stores transcripts under a base directory as
/// `historial_<username>.json`, the same name and format earlier
/// deployments wrote, so existing history files keep loading.
pub struct TranscriptStore {
    dir: PathBuf,
}

impl TranscriptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, username: &str) -> PathBuf {
        self.dir.join(format!("historial_{}.json", username))
    }

    /// Load the saved transcript for a username. No file means a fresh
    /// transcript. An unreadable or unparseable file logs a warning and
    /// also yields a fresh transcript so the session can proceed.
    pub fn load(&self, username: &str) -> Transcript {
        let path = self.path_for(username);
        if !path.exists() {
            return Transcript::new();
        }
        match Self::read(&path) {
            Ok(messages) => Transcript::new_with_messages(messages),
            Err(e) => {
                tracing::warn!("Could not load history from {}: {:#}", path.display(), e);
                Transcript::new()
            }
        }
    }

    fn read(path: &Path) -> Result<Vec<ChatMessage>> {
        let raw = fs::read_to_string(path)?;
        let messages = serde_json::from_str(&raw)?;
        Ok(messages)
    }

    /// Replace the transcript file for a username. The content goes to
    /// a temp file in the same directory first and is renamed over the
    /// target, so a reader never sees a partial write.
    pub fn save(&self, username: &str, transcript: &Transcript) -> Result<()> {
        let path = self.path_for(username);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(transcript.messages())?;

        let tmp_path = self.dir.join(format!(".historial_{}.json.tmp", username));
        let mut tmp_file = fs::File::create(&tmp_path)
            .with_context(|| format!("Failed to create {}", tmp_path.display()))?;
        tmp_file
            .write_all(serialized.as_bytes())
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        tmp_file
            .sync_all()
            .with_context(|| format!("Failed to sync {}", tmp_path.display()))?;
        drop(tmp_file);

        fs::rename(&tmp_path, &path)
            .with_context(|| format!("Failed to move {} into place", tmp_path.display()))?;
        Ok(())
    }
}

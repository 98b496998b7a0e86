use crate::constants::SESSION_FILE;
use crate::models::Session;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Single-slot durable record for the current session.
///
/// Writes are last-write-wins; there is no locking between writers.
#[derive(Clone, Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store the session record inside `data_dir`
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        SessionStore {
            path: data_dir.as_ref().join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted session. Missing or malformed records read as `None`.
    pub fn load(&self) -> Option<Session> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Could not read stored session");
                return None;
            }
        };

        match serde_json::from_str::<Session>(&content) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring malformed stored session");
                None
            }
        }
    }

    /// Persist the session, replacing whatever was stored
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create data directory {:?}", dir))?;
            }
        }
        let content = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write session file {:?}", self.path))?;
        Ok(())
    }

    /// Remove the stored session if there is one
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to delete session file {:?}", self.path))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SignerStatus;
    use tempfile::TempDir;

    fn approved() -> Session {
        Session {
            signer_uuid: "19d0c5fd-9b33-4a48-a0e2-bc7b0555baec".into(),
            public_key: "0x3daa".into(),
            status: SignerStatus::Approved,
            signer_approval_url: None,
            fid: Some(16098),
        }
    }

    #[test]
    fn test_missing_record_is_none() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_save_then_load_is_equal() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("nested"));
        store.save(&approved()).unwrap();
        assert_eq!(store.load(), Some(approved()));
    }

    #[test]
    fn test_malformed_records_are_none() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        for junk in ["", "not json", "{\"signer_uuid\": 5}", "[]", "null"] {
            fs::write(store.path(), junk).unwrap();
            assert_eq!(store.load(), None, "input {:?}", junk);
        }
    }

    #[test]
    fn test_clear_is_unconditional() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        store.clear().unwrap();
        store.save(&approved()).unwrap();
        store.clear().unwrap();
        assert!(!store.path().exists());
    }
}

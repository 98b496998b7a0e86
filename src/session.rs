//! Session manager - the one signed-in identity and its signer lifecycle
//!
//! Each network-backed operation is split in two: a prepare step that
//! applies the guard and yields the command to send (or nothing), and an
//! apply step that consumes the response and reports what changed.
//! Failures are logged and swallowed here; callers only see the outcome.

use thiserror::Error;

use crate::messages::NetworkCommand;
use crate::models::{Session, SignerStatus};
use crate::network::ApiError;
use crate::storage::SessionStore;

/// What an apply step did to the session
#[derive(Clone, Debug, PartialEq)]
pub enum SessionUpdate {
    /// The session was replaced wholesale and persisted
    Replaced,
    /// Nothing changed
    Unchanged,
    /// The call failed; the message was logged
    Failed(String),
}

/// Session state was read where no manager was installed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SessionAccessError {
    #[error("session state used outside of a session provider")]
    NoProvider,
}

/// Owner and sole writer of the current [`Session`]
#[derive(Debug)]
pub struct SessionManager {
    current: Option<Session>,
    store: SessionStore,
}

impl SessionManager {
    /// Restore whatever session was persisted in `store`
    pub fn restore(store: SessionStore) -> Self {
        let current = store.load();
        if let Some(session) = &current {
            tracing::info!(signer = %session.signer_uuid, status = session.status.as_str(), "Restored session");
        }
        SessionManager { current, store }
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Begin the signer flow
    pub fn login(&self) -> NetworkCommand {
        NetworkCommand::Login
    }

    pub fn apply_login(&mut self, result: Result<Session, ApiError>) -> SessionUpdate {
        match result {
            Ok(session) => {
                tracing::info!(signer = %session.signer_uuid, status = session.status.as_str(), "Signer created");
                self.replace(session)
            }
            Err(e) => {
                tracing::error!(error = %e, "Login failed");
                SessionUpdate::Failed(e.to_string())
            }
        }
    }

    /// Forget the session, in memory and on disk
    pub fn logout(&mut self) {
        self.current = None;
        if let Err(e) = self.store.clear() {
            tracing::error!(error = %e, "Failed to remove stored session");
        }
        tracing::info!("Logged out");
    }

    /// Poll command for a pending signer; `None` unless one is pending
    pub fn check_signer_status(&self) -> Option<NetworkCommand> {
        let session = self.current.as_ref().filter(|s| s.is_pending())?;
        Some(NetworkCommand::CheckSignerStatus {
            signer_uuid: session.signer_uuid.clone(),
        })
    }

    pub fn apply_signer_status(&mut self, result: Result<Session, ApiError>) -> SessionUpdate {
        match result {
            Ok(session) if session.status == SignerStatus::Approved => {
                tracing::info!(signer = %session.signer_uuid, fid = ?session.fid, "Signer approved");
                self.replace(session)
            }
            Ok(session) => {
                tracing::debug!(status = session.status.as_str(), "Signer not approved yet");
                SessionUpdate::Unchanged
            }
            Err(e) => {
                tracing::error!(error = %e, "Error checking signer status");
                SessionUpdate::Failed(e.to_string())
            }
        }
    }

    fn replace(&mut self, session: Session) -> SessionUpdate {
        if let Err(e) = self.store.save(&session) {
            tracing::error!(error = %e, "Failed to persist session");
        }
        self.current = Some(session);
        SessionUpdate::Replaced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn pending() -> Session {
        Session {
            signer_uuid: "7f3c".into(),
            public_key: "0xabc".into(),
            status: SignerStatus::PendingApproval,
            signer_approval_url: Some("https://client.warpcast.com/deeplinks/signed-key-request?token=t".into()),
            fid: None,
        }
    }

    fn approved() -> Session {
        Session {
            signer_uuid: "7f3c".into(),
            public_key: "0xabc".into(),
            status: SignerStatus::Approved,
            signer_approval_url: None,
            fid: Some(16098),
        }
    }

    fn manager_with(dir: &TempDir, session: Option<Session>) -> SessionManager {
        let store = SessionStore::new(dir.path());
        if let Some(session) = session {
            store.save(&session).unwrap();
        }
        SessionManager::restore(store)
    }

    #[test]
    fn test_restore_round_trips_stored_session() {
        let dir = TempDir::new().unwrap();
        let manager = manager_with(&dir, Some(pending()));
        assert_eq!(manager.current(), Some(&pending()));
    }

    #[test]
    fn test_restore_ignores_garbage() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        std::fs::write(store.path(), "{ not json").unwrap();
        let manager = SessionManager::restore(store);
        assert_eq!(manager.current(), None);
    }

    #[test]
    fn test_login_success_replaces_and_persists() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager_with(&dir, None);
        assert_eq!(manager.login(), NetworkCommand::Login);

        assert_eq!(manager.apply_login(Ok(pending())), SessionUpdate::Replaced);
        assert_eq!(manager.current(), Some(&pending()));
        assert_eq!(SessionStore::new(dir.path()).load(), Some(pending()));
    }

    #[test]
    fn test_login_failure_leaves_logged_out() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager_with(&dir, None);
        let update = manager.apply_login(Err(ApiError::Status {
            status: 500,
            body: "boom".into(),
        }));
        assert!(matches!(update, SessionUpdate::Failed(_)));
        assert_eq!(manager.current(), None);
        assert_eq!(SessionStore::new(dir.path()).load(), None);
    }

    #[test]
    fn test_logout_clears_regardless_of_status() {
        for session in [pending(), approved()] {
            let dir = TempDir::new().unwrap();
            let mut manager = manager_with(&dir, Some(session));
            manager.logout();
            assert_eq!(manager.current(), None);
            assert!(!SessionStore::new(dir.path()).path().exists());
        }
    }

    #[test]
    fn test_check_is_noop_without_pending_session() {
        let dir = TempDir::new().unwrap();
        assert_eq!(manager_with(&dir, None).check_signer_status(), None);

        let dir = TempDir::new().unwrap();
        assert_eq!(manager_with(&dir, Some(approved())).check_signer_status(), None);

        let mut other = pending();
        other.status = SignerStatus::Other("revoked".into());
        let dir = TempDir::new().unwrap();
        assert_eq!(manager_with(&dir, Some(other)).check_signer_status(), None);
    }

    #[test]
    fn test_check_uses_signer_uuid() {
        let dir = TempDir::new().unwrap();
        let manager = manager_with(&dir, Some(pending()));
        assert_eq!(
            manager.check_signer_status(),
            Some(NetworkCommand::CheckSignerStatus { signer_uuid: "7f3c".into() })
        );
    }

    #[test]
    fn test_approved_status_replaces_wholesale() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager_with(&dir, Some(pending()));
        assert_eq!(manager.apply_signer_status(Ok(approved())), SessionUpdate::Replaced);
        assert_eq!(manager.current(), Some(&approved()));
        assert_eq!(manager.current().unwrap().signer_approval_url, None);
        assert_eq!(SessionStore::new(dir.path()).load(), Some(approved()));
    }

    #[test]
    fn test_other_status_leaves_session_alone() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager_with(&dir, Some(pending()));

        let mut still_pending = pending();
        still_pending.public_key = "0xchanged".into();
        assert_eq!(manager.apply_signer_status(Ok(still_pending)), SessionUpdate::Unchanged);

        let mut revoked = approved();
        revoked.status = SignerStatus::Other("revoked".into());
        assert_eq!(manager.apply_signer_status(Ok(revoked)), SessionUpdate::Unchanged);

        assert_eq!(manager.current(), Some(&pending()));
        assert_eq!(SessionStore::new(dir.path()).load(), Some(pending()));
    }

    #[test]
    fn test_status_failure_is_swallowed() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager_with(&dir, Some(pending()));
        let update = manager.apply_signer_status(Err(ApiError::Transport("reset".into())));
        assert!(matches!(update, SessionUpdate::Failed(_)));
        assert_eq!(manager.current(), Some(&pending()));
    }
}

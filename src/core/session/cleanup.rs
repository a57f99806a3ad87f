//! Session lifecycle: creation, explicit cleanup and idle expiry

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tokio::sync::watch;

use super::layout::{SessionLayout, UPLOAD_SUBDIRS};
use crate::domain::{PalosaError, Result, SessionId};

/// Outcome of one expiry sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Sessions inspected
    pub sessions_seen: usize,
    /// Sessions whose directories were removed
    pub removed: Vec<SessionId>,
    /// Sessions skipped because they could not be inspected or removed
    pub failed: usize,
}

/// Creates, removes and expires session directories
#[derive(Debug, Clone)]
pub struct SessionStore {
    layout: SessionLayout,
}

impl SessionStore {
    pub fn new(layout: SessionLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &SessionLayout {
        &self.layout
    }

    /// Allocates a new session and its upload folders
    pub async fn create(&self) -> Result<SessionId> {
        let session = SessionId::generate();
        for sub in UPLOAD_SUBDIRS {
            tokio::fs::create_dir_all(self.layout.upload_dir(&session).join(sub)).await?;
        }
        tracing::info!(session_id = %session, "Session created");
        Ok(session)
    }

    /// Removes every directory owned by the session
    ///
    /// Returns `true` if anything was removed.
    pub async fn cleanup(&self, session: &SessionId) -> Result<bool> {
        let mut removed = false;
        for dir in self.layout.session_dirs(session) {
            match tokio::fs::remove_dir_all(&dir).await {
                Ok(()) => removed = true,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(PalosaError::Io(format!(
                        "Failed to remove {}: {e}",
                        dir.display()
                    )))
                }
            }
        }
        tracing::info!(session_id = %session, removed, "Session cleaned up");
        Ok(removed)
    }

    /// Removes sessions idle for longer than `ttl`
    pub fn sweep_expired(&self, ttl: Duration) -> Result<SweepStats> {
        self.sweep_expired_at(ttl, SystemTime::now())
    }

    /// Same as [`sweep_expired`](Self::sweep_expired) with an explicit clock
    ///
    /// A session that cannot be inspected or removed is logged, counted in
    /// [`SweepStats::failed`] and skipped; the sweep carries on with the rest.
    ///
    /// # Errors
    ///
    /// Returns an error only if a storage root exists but cannot be listed.
    pub fn sweep_expired_at(&self, ttl: Duration, now: SystemTime) -> Result<SweepStats> {
        let mut stats = SweepStats::default();

        for session in self.known_sessions()? {
            stats.sessions_seen += 1;
            match self.expire_if_idle(&session, ttl, now) {
                Ok(true) => stats.removed.push(session),
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(
                        session_id = %session,
                        error = %e,
                        category = e.category(),
                        "Skipping session during sweep"
                    );
                    stats.failed += 1;
                }
            }
        }

        Ok(stats)
    }

    fn expire_if_idle(&self, session: &SessionId, ttl: Duration, now: SystemTime) -> Result<bool> {
        let Some(last_activity) = self.last_activity(session)? else {
            return Ok(false);
        };

        let idle = now.duration_since(last_activity).unwrap_or(Duration::ZERO);
        if idle <= ttl {
            return Ok(false);
        }

        for dir in self.layout.session_dirs(session) {
            match fs::remove_dir_all(&dir) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(PalosaError::Io(format!(
                        "Failed to remove {}: {e}",
                        dir.display()
                    )))
                }
            }
        }
        tracing::info!(
            session_id = %session,
            idle_secs = idle.as_secs(),
            "Expired session removed"
        );
        Ok(true)
    }

    /// Session names present under any root, sorted
    fn known_sessions(&self) -> Result<BTreeSet<SessionId>> {
        let mut sessions = BTreeSet::new();
        for root in self.layout.roots() {
            let entries = match fs::read_dir(root) {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(PalosaError::Io(format!(
                        "Failed to list {}: {e}",
                        root.display()
                    )))
                }
            };
            for entry in entries {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        tracing::warn!(root = %root.display(), error = %e, "Unreadable directory entry");
                        continue;
                    }
                };
                if !entry.file_type().is_ok_and(|t| t.is_dir()) {
                    continue;
                }
                let name = entry.file_name();
                match name.to_str().map(SessionId::new) {
                    Some(Ok(session)) => {
                        sessions.insert(session);
                    }
                    _ => tracing::debug!(entry = ?name, "Skipping non-session directory"),
                }
            }
        }
        Ok(sessions)
    }

    /// Newest modification time of anything the session owns
    fn last_activity(&self, session: &SessionId) -> Result<Option<SystemTime>> {
        let mut newest = None;
        for dir in self.layout.session_dirs(session) {
            match newest_mtime(&dir) {
                Ok(mtime) => newest = newest.max(mtime),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(PalosaError::Io(format!(
                        "Failed to inspect {}: {e}",
                        dir.display()
                    )))
                }
            }
        }
        Ok(newest)
    }
}

/// Symlinks count with their own mtime and are never followed
fn newest_mtime(path: &Path) -> std::io::Result<Option<SystemTime>> {
    let metadata = fs::symlink_metadata(path)?;
    let mut newest = Some(metadata.modified()?);
    if metadata.is_dir() {
        for entry in fs::read_dir(path)? {
            newest = newest.max(newest_mtime(&entry?.path())?);
        }
    }
    Ok(newest)
}

/// Runs [`SessionStore::sweep_expired`] every `interval` until shutdown
pub async fn run_sweeper(
    store: SessionStore,
    interval: Duration,
    ttl: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    tracing::info!(
        interval_secs = interval.as_secs(),
        ttl_secs = ttl.as_secs(),
        "Starting session sweeper"
    );

    loop {
        let sweep_store = store.clone();
        let result = tokio::task::spawn_blocking(move || sweep_store.sweep_expired(ttl))
            .await
            .map_err(|e| PalosaError::Io(format!("Sweep task failed: {e}")))?;

        match result {
            Ok(stats) => tracing::debug!(
                seen = stats.sessions_seen,
                removed = stats.removed.len(),
                failed = stats.failed,
                "Sweep finished"
            ),
            Err(e) => tracing::warn!(error = %e, category = e.category(), "Sweep failed"),
        }

        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    tracing::info!("Session sweeper stopped");
                    return Ok(());
                }
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

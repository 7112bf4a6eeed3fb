use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::domain::{Session, SessionId};

/// Snapshot storage so sessions survive process restarts.
pub trait SessionRepository: Send + Sync {
    /// Returns `None` when no usable snapshot exists.
    fn load(&self, id: &SessionId) -> Result<Option<Session>, RepositoryError>;
    fn save(&self, session: &Session) -> Result<(), RepositoryError>;
    fn delete(&self, id: &SessionId) -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("snapshot storage unavailable: {0}")]
    Unavailable(String),
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One pretty-printed JSON file per session under a snapshot directory.
#[derive(Debug, Clone)]
pub struct JsonFileSessionRepository {
    root: PathBuf,
}

impl JsonFileSessionRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &SessionId) -> PathBuf {
        self.root.join(format!("{}.json", id.as_str()))
    }
}

impl SessionRepository for JsonFileSessionRepository {
    fn load(&self, id: &SessionId) -> Result<Option<Session>, RepositoryError> {
        let path = self.path_for(id);
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        match serde_json::from_slice::<Session>(&raw) {
            Ok(session) if session.session_id == *id => Ok(Some(session)),
            Ok(session) => {
                warn!(
                    path = %path.display(),
                    found = %session.session_id,
                    "snapshot belongs to another session; starting fresh"
                );
                Ok(None)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "corrupt snapshot; starting fresh");
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), RepositoryError> {
        fs::create_dir_all(&self.root)?;
        let path = self.path_for(&session.session_id);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, serde_json::to_vec_pretty(session)?)?;
        fs::rename(&staging, &path)?;
        Ok(())
    }

    fn delete(&self, id: &SessionId) -> Result<(), RepositoryError> {
        match fs::remove_file(self.path_for(id)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

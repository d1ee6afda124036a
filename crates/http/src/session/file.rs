use super::{TokenKey, TokenStore};
use ellp_core::{CoreError, CoreResult, Session, TokenPair, User};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

/// Token store persisted as a JSON document on disk.
///
/// Every mutation rewrites the whole document through a temporary file and
/// an atomic rename, so a crash never leaves a half-written session behind.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    session: Mutex<Session>,
}

impl FileTokenStore {
    /// Open the store at `path`, loading any session saved there.
    ///
    /// A missing or empty file yields an empty session. A corrupt file is
    /// logged and treated as empty; it is overwritten on the next write.
    pub fn open(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();
        let session = match load(&path) {
            Ok(session) => session,
            Err(CoreError::Serialization { message }) => {
                warn!(path = %path.display(), %message, "discarding unreadable session file");
                Session::default()
            }
            Err(err) => return Err(err),
        };

        Ok(Self {
            path,
            session: Mutex::new(session),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update<F>(&self, f: F) -> CoreResult<()>
    where
        F: FnOnce(&mut Session),
    {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = session.clone();
        f(&mut next);
        save(&self.path, &next)?;
        *session = next;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: TokenKey) -> Option<String> {
        let session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        match key {
            TokenKey::Access => session.access_token.clone(),
            TokenKey::Refresh => session.refresh_token.clone(),
        }
    }

    fn set(&self, key: TokenKey, value: &str) -> CoreResult<()> {
        self.update(|session| {
            let slot = match key {
                TokenKey::Access => &mut session.access_token,
                TokenKey::Refresh => &mut session.refresh_token,
            };
            *slot = Some(value.to_string());
        })
    }

    fn set_tokens(&self, tokens: &TokenPair) -> CoreResult<()> {
        self.update(|session| {
            session.access_token = Some(tokens.access_token.clone());
            session.refresh_token = Some(tokens.refresh_token.clone());
        })
    }

    fn user(&self) -> Option<User> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .user
            .clone()
    }

    fn set_user(&self, user: Option<User>) -> CoreResult<()> {
        self.update(|session| session.user = user)
    }

    fn clear(&self) -> CoreResult<()> {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "session file removed"),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        *session = Session::default();
        Ok(())
    }
}

fn load(path: &Path) -> CoreResult<Session> {
    if !path.exists() {
        return Ok(Session::default());
    }

    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Session::default());
    }

    Ok(serde_json::from_str(&content)?)
}

fn save(path: &Path, session: &Session) -> CoreResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_vec_pretty(session)?;
    let tmp_path = temp_path(path)?;

    let result = (|| -> std::io::Result<()> {
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(&content)?;
        tmp_file.sync_all()?;
        drop(tmp_file);
        fs::rename(&tmp_path, path)
    })();

    if let Err(err) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(err.into());
    }
    Ok(())
}

fn temp_path(path: &Path) -> CoreResult<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| CoreError::invalid_config(format!("{} has no file name", path.display())))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    Ok(path.with_file_name(tmp_name))
}

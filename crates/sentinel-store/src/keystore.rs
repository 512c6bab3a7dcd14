//! Private key persistence.
//!
//! The key store holds one secret: the issuer's PKCS#8 PEM document. Writes
//! go to a temporary file in the same directory and are renamed into place,
//! so a reader never sees a half-written key. First-run creation is
//! serialized across processes with an advisory lock on `<key_path>.lock`.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use zeroize::Zeroizing;

use crate::error::{Result, StoreError};

/// Storage for a single secret key document.
pub trait KeyStore: Send + Sync {
    /// Load the secret, or `None` if none has been saved.
    fn load(&self) -> Result<Option<Zeroizing<String>>>;

    /// Persist the secret, replacing any previous one.
    fn save(&self, secret: &str) -> Result<()>;
}

/// Key store backed by a single file.
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    path: PathBuf,
}

/// Holds the exclusive key-creation lock until dropped.
#[derive(Debug)]
pub struct KeyLock {
    file: File,
    path: PathBuf,
}

impl Drop for KeyLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to release key lock");
        }
    }
}

impl FileKeyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the advisory lock file.
    pub fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".lock");
        PathBuf::from(name)
    }

    /// Block until the exclusive key-creation lock is held.
    pub fn lock(&self) -> Result<KeyLock> {
        let path = self.lock_path();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)?;
        FileExt::lock_exclusive(&file).map_err(|e| {
            StoreError::Lock(format!("cannot lock {}: {}", path.display(), e))
        })?;
        Ok(KeyLock { file, path })
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }
}

impl KeyStore for FileKeyStore {
    fn load(&self) -> Result<Option<Zeroizing<String>>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(Zeroizing::new(contents))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, secret: &str) -> Result<()> {
        let dir = self.directory();
        fs::create_dir_all(dir)?;

        let mut temp = tempfile::NamedTempFile::new_in(dir)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            temp.as_file()
                .set_permissions(fs::Permissions::from_mode(0o600))?;
        }

        temp.as_file_mut().write_all(secret.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;

        tracing::debug!(path = %self.path.display(), "key file written");
        Ok(())
    }
}

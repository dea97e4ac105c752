use std::fs::File;
use std::io;
use std::path::Path;

use fs2::FileExt;
use tracing::{debug, trace};

use crate::error::{Error, Result};

/// Advisory whole-file lock, released on drop
pub(crate) struct FileLock<'a> {
    file: &'a File,
}

impl<'a> FileLock<'a> {
    /// Block until an exclusive lock is held
    pub(crate) fn exclusive(file: &'a File, path: &Path) -> Result<Self> {
        acquire(path, || FileExt::lock_exclusive(file))?;
        debug!("Acquired exclusive lock on {}", path.display());
        Ok(Self { file })
    }

    /// Block until a shared lock is held
    pub(crate) fn shared(file: &'a File, path: &Path) -> Result<Self> {
        acquire(path, || FileExt::lock_shared(file))?;
        debug!("Acquired shared lock on {}", path.display());
        Ok(Self { file })
    }
}

impl Drop for FileLock<'_> {
    fn drop(&mut self) {
        let _ = FileExt::unlock(self.file);
    }
}

/// Retry a blocking lock call until it succeeds or fails for a reason other than a signal
fn acquire<F>(path: &Path, lock: F) -> Result<()>
where
    F: Fn() -> io::Result<()>,
{
    loop {
        match lock() {
            Ok(()) => return Ok(()),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                trace!("Lock on {} interrupted, retrying", path.display());
            }
            Err(source) => {
                return Err(Error::Lock {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::path::PathBuf;

    #[test]
    fn test_acquire_retries_interrupted() {
        let calls = Cell::new(0);
        let result = acquire(Path::new("scores"), || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(io::Error::from(io::ErrorKind::Interrupted))
            } else {
                Ok(())
            }
        });
        assert!(result.is_ok());
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_acquire_reports_lock_failure() {
        let result = acquire(Path::new("scores"), || {
            Err(io::Error::from(io::ErrorKind::PermissionDenied))
        });
        match result {
            Err(Error::Lock { path, source }) => {
                assert_eq!(path, PathBuf::from("scores"));
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("expected lock error, got {:?}", other),
        }
    }

    #[test]
    fn test_shared_locks_coexist() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let a = File::open(temp.path()).unwrap();
        let b = File::open(temp.path()).unwrap();

        let _first = FileLock::shared(&a, temp.path()).unwrap();
        let _second = FileLock::shared(&b, temp.path()).unwrap();
    }

    #[test]
    fn test_exclusive_released_on_drop() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let a = File::open(temp.path()).unwrap();
        let b = File::open(temp.path()).unwrap();

        {
            let _guard = FileLock::exclusive(&a, temp.path()).unwrap();
            assert!(FileExt::try_lock_exclusive(&b).is_err());
        }
        FileExt::try_lock_exclusive(&b).unwrap();
        FileExt::unlock(&b).unwrap();
    }
}

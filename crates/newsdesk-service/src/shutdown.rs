use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use tokio::signal;
use tracing::{error, info, warn};
use url::Url;

/// The on-disk file behind a store, removed by an explicit teardown.
///
/// In-memory databases have no file; their teardown is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreFile {
    path: Option<PathBuf>,
}

impl StoreFile {
    pub fn from_database_url(database_url: &str) -> Self {
        let path = match database_url.strip_prefix("file:") {
            Some(rest) => file_uri_path(rest),
            None => (!database_url.is_empty() && database_url != ":memory:")
                .then(|| PathBuf::from(database_url)),
        };

        Self { path }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Delete the store file and any SQLite sidecar files. Failures are
    /// logged and never returned; returns whether the main file was removed.
    pub fn teardown(self) -> bool {
        let Some(path) = self.path else {
            return false;
        };

        let removed = remove_logged(&path);
        for suffix in ["-journal", "-wal", "-shm"] {
            let mut sidecar = OsString::from(path.as_os_str());
            sidecar.push(suffix);
            remove_logged(Path::new(&sidecar));
        }

        if removed {
            info!(path = %path.display(), "Removed store file");
        }
        removed
    }
}

/// Local path named by a SQLite `file:` URI, given the part after the scheme.
///
/// Relative paths resolve against the working directory like SQLite does.
/// `None` for in-memory databases and for URIs naming a remote host.
fn file_uri_path(rest: &str) -> Option<PathBuf> {
    let location = rest.split(['?', '#']).next().unwrap_or_default();
    if location.is_empty() || location == ":memory:" {
        return None;
    }

    let url = if location.starts_with('/') {
        Url::parse(&format!("file:{rest}")).ok()?
    } else {
        let cwd = std::env::current_dir().ok()?;
        Url::from_directory_path(cwd).ok()?.join(rest).ok()?
    };

    if url
        .query_pairs()
        .any(|(key, value)| key == "mode" && value == "memory")
    {
        return None;
    }

    url.to_file_path().ok()
}

fn remove_logged(path: &Path) -> bool {
    match std::fs::remove_file(path) {
        Ok(()) => true,
        Err(err) if err.kind() == io::ErrorKind::NotFound => false,
        Err(err) => {
            error!(path = %path.display(), error = %err, "Failed to remove store file");
            false
        }
    }
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store;

    #[test]
    fn test_memory_urls_have_no_file() {
        assert_eq!(StoreFile::from_database_url(":memory:").path(), None);
        assert_eq!(StoreFile::from_database_url("file::memory:").path(), None);
        assert_eq!(
            StoreFile::from_database_url("file:shared?mode=memory&cache=shared").path(),
            None
        );
    }

    #[test]
    fn test_file_urls_resolve_to_paths() {
        assert_eq!(
            StoreFile::from_database_url("newsdesk.db").path(),
            Some(Path::new("newsdesk.db"))
        );
        assert_eq!(
            StoreFile::from_database_url("file:data/newsdesk.db?mode=rwc").path(),
            Some(std::env::current_dir().unwrap().join("data/newsdesk.db").as_path())
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_file_uris_are_decoded() {
        assert_eq!(
            StoreFile::from_database_url("file:///var/lib/news%20desk.db").path(),
            Some(Path::new("/var/lib/news desk.db"))
        );
        assert_eq!(
            StoreFile::from_database_url("file://localhost/var/lib/newsdesk.db?cache=shared")
                .path(),
            Some(Path::new("/var/lib/newsdesk.db"))
        );
        assert_eq!(
            StoreFile::from_database_url("file:/var/lib/newsdesk.db").path(),
            Some(Path::new("/var/lib/newsdesk.db"))
        );
        assert_eq!(
            StoreFile::from_database_url("file://elsewhere/newsdesk.db").path(),
            None
        );
    }

    #[test]
    fn test_teardown_removes_file_named_by_encoded_uri() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("news desk.db");
        std::fs::write(&path, b"").unwrap();

        let uri = Url::from_file_path(&path).unwrap();
        assert!(uri.as_str().contains("news%20desk.db"));

        assert!(StoreFile::from_database_url(uri.as_str()).teardown());
        assert!(!path.exists());
    }

    #[test]
    fn test_teardown_removes_store_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("newsdesk.db");
        let url = path.to_str().unwrap().to_string();

        let conn = store::establish(&url).unwrap();
        drop(conn);
        assert!(path.exists());

        assert!(StoreFile::from_database_url(&url).teardown());
        assert!(!path.exists());
    }

    #[test]
    fn test_teardown_of_missing_file_is_quiet() {
        let dir = tempfile::tempdir().unwrap();
        let store_file = StoreFile::from_database_url(dir.path().join("absent.db").to_str().unwrap());

        assert!(!store_file.teardown());
    }

    #[test]
    fn test_teardown_failure_is_not_returned() {
        // A directory can't be removed with remove_file
        let dir = tempfile::tempdir().unwrap();
        let store_file = StoreFile::from_database_url(dir.path().to_str().unwrap());

        assert!(!store_file.teardown());
        assert!(dir.path().exists());
    }

    #[test]
    fn test_teardown_in_memory_is_noop() {
        assert!(!StoreFile::from_database_url(":memory:").teardown());
    }
}

//! Static file serving module
//!
//! Resolves a request path to a regular file under the server root, loads it
//! and picks its content type. Resolution never leaves the root: lexical
//! `..` handling rejects escapes up front, and the canonical target is
//! checked against the canonical root to catch symlinks pointing outside.

use std::io;
use std::path::{Path, PathBuf};

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use percent_encoding::percent_decode_str;
use thiserror::Error;
use tokio::fs;

use crate::config::AppState;
use crate::http::{self, mime};
use crate::logger::{self, RequestOutcome};

/// Per-request failure while serving a file
#[derive(Debug, Error)]
pub enum ServeError {
    /// No regular file at the requested path
    #[error("file not found: {path}")]
    NotFound { path: String },

    /// The path would resolve outside the server root
    #[error("path escapes server root: {path}")]
    Traversal { path: String },

    /// Unexpected I/O fault (permissions, read errors)
    #[error("failed to access {}: {source}", path.display())]
    Internal {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A file loaded from disk, ready to send
#[derive(Debug)]
pub struct LoadedFile {
    /// Canonical location on disk
    pub path: PathBuf,
    pub content: Bytes,
    pub content_type: &'static str,
}

/// Serve a GET request for `request_path`
///
/// Every outcome is logged; the returned response always carries the fixed
/// header set.
pub async fn serve(request_path: &str, state: &AppState) -> Response<Full<Bytes>> {
    let shown_path = display_path(request_path, state.index_file());

    match load_file(&state.root, request_path, state.index_file()).await {
        Ok(file) => {
            let resolved = file.path.display().to_string();
            logger::log_request(&RequestOutcome::Served {
                path: &resolved,
                content_type: file.content_type,
            });
            http::build_file_response(file.content, file.content_type)
        }
        Err(ServeError::NotFound { .. }) => {
            logger::log_request(&RequestOutcome::NotFound { path: &shown_path });
            http::build_404_response(&shown_path)
        }
        Err(ServeError::Traversal { path }) => {
            logger::log_request(&RequestOutcome::Rejected { path: &path });
            http::build_404_response(&shown_path)
        }
        Err(err @ ServeError::Internal { .. }) => {
            logger::log_request(&RequestOutcome::Failed {
                path: &shown_path,
                detail: &err.to_string(),
            });
            http::build_500_response()
        }
    }
}

/// Path as reported back to the client and the log: query and fragment
/// stripped, `/` shown as the index file
fn display_path(request_path: &str, index_file: &str) -> String {
    let path = strip_query_and_fragment(request_path);
    if path == "/" {
        format!("/{index_file}")
    } else {
        path.to_string()
    }
}

/// Characters that separate path segments in a request
#[cfg(windows)]
const SEPARATORS: &[char] = &['/', '\\'];
#[cfg(not(windows))]
const SEPARATORS: &[char] = &['/'];

fn strip_query_and_fragment(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or_default()
}

/// Map a request path onto a path under `root`, without touching the disk
///
/// Returns `Traversal` if `..` segments climb above the root and `NotFound`
/// if the path cannot be decoded or names a directory (trailing `/`, `.` or
/// `..`), since only regular files are served.
pub fn resolve_path(
    root: &Path,
    request_path: &str,
    index_file: &str,
) -> Result<PathBuf, ServeError> {
    let path = strip_query_and_fragment(request_path);
    let path = if path == "/" || path.is_empty() {
        index_file
    } else {
        path
    };

    let decoded = percent_decode_str(path)
        .decode_utf8()
        .map_err(|_| ServeError::NotFound {
            path: path.to_string(),
        })?;

    let mut segments: Vec<&str> = Vec::new();
    let mut names_directory = false;
    for segment in decoded.split(SEPARATORS) {
        names_directory = matches!(segment, "" | "." | "..");
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(ServeError::Traversal {
                        path: request_path.to_string(),
                    });
                }
            }
            s if s.contains('\0') => {
                return Err(ServeError::NotFound {
                    path: request_path.to_string(),
                })
            }
            s => segments.push(s),
        }
    }

    if names_directory {
        return Err(ServeError::NotFound {
            path: request_path.to_string(),
        });
    }

    Ok(segments.iter().fold(root.to_path_buf(), |acc, s| acc.join(s)))
}

/// Resolve and read the file behind `request_path`
pub async fn load_file(
    root: &Path,
    request_path: &str,
    index_file: &str,
) -> Result<LoadedFile, ServeError> {
    let candidate = resolve_path(root, request_path, index_file)?;

    let canonical = fs::canonicalize(&candidate)
        .await
        .map_err(|e| classify_io_error(request_path, &candidate, e))?;

    if !canonical.starts_with(root) {
        return Err(ServeError::Traversal {
            path: request_path.to_string(),
        });
    }

    let metadata = fs::metadata(&canonical)
        .await
        .map_err(|e| classify_io_error(request_path, &canonical, e))?;
    if !metadata.is_file() {
        return Err(ServeError::NotFound {
            path: request_path.to_string(),
        });
    }

    let content = fs::read(&canonical)
        .await
        .map_err(|e| classify_io_error(request_path, &canonical, e))?;
    let content_type = mime::content_type_for(&canonical);

    Ok(LoadedFile {
        path: canonical,
        content: Bytes::from(content),
        content_type,
    })
}

/// Paths that cannot name a file are a 404; anything else is an internal
/// fault (permissions, symlink loops, read errors)
fn classify_io_error(request_path: &str, path: &Path, err: io::Error) -> ServeError {
    match err.kind() {
        io::ErrorKind::NotFound
        | io::ErrorKind::NotADirectory
        | io::ErrorKind::InvalidFilename => ServeError::NotFound {
            path: request_path.to_string(),
        },
        _ => ServeError::Internal {
            path: path.to_path_buf(),
            source: err,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;

    fn site() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        std_fs::write(root.join("index.html"), "A").unwrap();
        std_fs::write(root.join("styles.css"), "B").unwrap();
        std_fs::write(root.join("feed-times.csv"), "day,time\n").unwrap();
        std_fs::create_dir(root.join("Branding")).unwrap();
        std_fs::write(root.join("Branding").join("logo.png"), [0x89, b'P', b'N', b'G']).unwrap();
        std_fs::write(root.join("my page.html"), "spaced").unwrap();
        (dir, root)
    }

    #[test]
    fn test_resolve_root_is_index() {
        let root = Path::new("/srv/site");
        assert_eq!(
            resolve_path(root, "/", "index.html").unwrap(),
            root.join("index.html")
        );
        assert_eq!(
            resolve_path(root, "/?v=1", "index.html").unwrap(),
            root.join("index.html")
        );
    }

    #[test]
    fn test_resolve_normalizes() {
        let root = Path::new("/srv/site");
        assert_eq!(
            resolve_path(root, "/a/./b/../styles.css", "index.html").unwrap(),
            root.join("a").join("styles.css")
        );
        assert_eq!(
            resolve_path(root, "//styles.css#top", "index.html").unwrap(),
            root.join("styles.css")
        );
        assert_eq!(
            resolve_path(root, "/a/../styles.css", "index.html").unwrap(),
            root.join("styles.css")
        );
    }

    #[test]
    fn test_resolve_directory_forms_are_not_found() {
        let root = Path::new("/srv/site");
        for path in ["/index.html/", "/styles.css/.", "/Branding/", "/a/..", "/index.html/?v=1"] {
            assert!(
                matches!(resolve_path(root, path, "index.html"), Err(ServeError::NotFound { .. })),
                "{path} should not name a file"
            );
        }
    }

    #[test]
    fn test_resolve_rejects_escape() {
        let root = Path::new("/srv/site");
        for path in ["/../../etc/passwd", "/a/../../x", "/%2e%2e/secret", "/..%2fsecret"] {
            assert!(
                matches!(resolve_path(root, path, "index.html"), Err(ServeError::Traversal { .. })),
                "{path} should be rejected"
            );
        }
    }

    #[test]
    fn test_resolve_rejects_bad_encoding() {
        let root = Path::new("/srv/site");
        assert!(matches!(
            resolve_path(root, "/%ff%fe.html", "index.html"),
            Err(ServeError::NotFound { .. })
        ));
        assert!(matches!(
            resolve_path(root, "/a%00b", "index.html"),
            Err(ServeError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_existing_files() {
        let (_dir, root) = site();

        let file = load_file(&root, "/", "index.html").await.unwrap();
        assert_eq!(file.content, "A");
        assert_eq!(file.content_type, "text/html");
        assert_eq!(file.path, root.join("index.html"));

        let file = load_file(&root, "/styles.css?v=3", "index.html").await.unwrap();
        assert_eq!(file.content, "B");
        assert_eq!(file.content_type, "text/css");

        let file = load_file(&root, "/feed-times.csv", "index.html").await.unwrap();
        assert_eq!(file.content_type, "text/csv");

        let file = load_file(&root, "/Branding/logo.png", "index.html").await.unwrap();
        assert_eq!(file.content_type, "image/png");
        assert_eq!(&file.content[..], &[0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn test_load_percent_encoded() {
        let (_dir, root) = site();
        let file = load_file(&root, "/my%20page.html", "index.html").await.unwrap();
        assert_eq!(file.content, "spaced");
    }

    #[cfg(windows)]
    #[test]
    fn test_resolve_backslash_separates_on_windows() {
        let root = Path::new("C:\\site");
        assert!(matches!(
            resolve_path(root, "/..\\secret", "index.html"),
            Err(ServeError::Traversal { .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_load_backslash_in_file_name() {
        let (_dir, root) = site();
        std_fs::write(root.join("a\\b.html"), "slashed").unwrap();
        let file = load_file(&root, "/a\\b.html", "index.html").await.unwrap();
        assert_eq!(file.content, "slashed");
        let file = load_file(&root, "/a%5Cb.html", "index.html").await.unwrap();
        assert_eq!(file.content, "slashed");
    }

    #[tokio::test]
    async fn test_load_overlong_name_is_not_found() {
        let (_dir, root) = site();
        let path = format!("/{}.html", "a".repeat(300));
        assert!(matches!(
            load_file(&root, &path, "index.html").await,
            Err(ServeError::NotFound { .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_load_symlink_loop_is_internal() {
        let (_dir, root) = site();
        std::os::unix::fs::symlink(root.join("loop.html"), root.join("loop.html")).unwrap();
        assert!(matches!(
            load_file(&root, "/loop.html", "index.html").await,
            Err(ServeError::Internal { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_missing_and_directory() {
        let (_dir, root) = site();
        assert!(matches!(
            load_file(&root, "/missing.png", "index.html").await,
            Err(ServeError::NotFound { .. })
        ));
        assert!(matches!(
            load_file(&root, "/Branding", "index.html").await,
            Err(ServeError::NotFound { .. })
        ));
        assert!(matches!(
            load_file(&root, "/index.html/extra", "index.html").await,
            Err(ServeError::NotFound { .. })
        ));
        assert!(matches!(
            load_file(&root, "/index.html/", "index.html").await,
            Err(ServeError::NotFound { .. })
        ));
        assert!(matches!(
            load_file(&root, "/styles.css/", "index.html").await,
            Err(ServeError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_missing_index() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        assert!(matches!(
            load_file(&root, "/", "index.html").await,
            Err(ServeError::NotFound { .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_out_of_root_is_rejected() {
        let outside = tempfile::tempdir().unwrap();
        std_fs::write(outside.path().join("secret.txt"), "secret").unwrap();
        let (_dir, root) = site();
        std::os::unix::fs::symlink(outside.path().join("secret.txt"), root.join("link.txt")).unwrap();

        assert!(matches!(
            load_file(&root, "/link.txt", "index.html").await,
            Err(ServeError::Traversal { .. })
        ));
    }

    #[test]
    fn test_display_path() {
        assert_eq!(display_path("/", "index.html"), "/index.html");
        assert_eq!(display_path("/missing.png?x=1", "index.html"), "/missing.png");
    }

    #[test]
    fn test_internal_error_message() {
        let err = classify_io_error(
            "/x",
            Path::new("/srv/site/x"),
            io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied"),
        );
        assert!(matches!(err, ServeError::Internal { .. }));
        assert!(err.to_string().contains("Permission denied"));
    }
}

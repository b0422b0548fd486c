//! Request routing — map method and path to a response.
//!
//! The route table is fixed:
//!
//! | Method | Path | Behavior |
//! |---|---|---|
//! | GET  | `/`              | 200, empty body |
//! | GET  | `/echo/{value}`  | 200, `text/plain`, echoes `{value}` verbatim |
//! | GET  | `/user-agent`    | 200, `text/plain`, the `User-Agent` value |
//! | GET  | `/files/{name}`  | file contents as `application/octet-stream`, or 404 |
//! | POST | `/files/{name}`  | writes the body to the file, 201 |
//!
//! Any other method/path combination is 404, except that a non-GET/POST
//! method on an otherwise-valid path is 405.
//! The serving directory is injected at construction and read-only after.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use crate::http::{Method, Request, Response, StatusCode};

/// Dispatches parsed requests against the fixed route table.
///
/// Cheap to share: the only state is the serving directory path.
#[derive(Debug, Clone)]
pub struct Router {
    directory: PathBuf,
}

impl Router {
    /// Creates a router serving `/files/` routes from `directory`.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Returns the serving directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Routes one request to a response. Never fails: route misses and file
    /// I/O problems all surface as status codes.
    pub async fn dispatch(&self, request: &Request) -> Response {
        let path = request.path();

        if path == "/" {
            return match request.method() {
                Method::Get => Response::new(StatusCode::Ok),
                Method::Post => Response::new(StatusCode::NotFound),
                Method::Other(_) => Response::new(StatusCode::MethodNotAllowed),
            };
        }

        // The captured value is the path remainder, verbatim, not URL-decoded.
        if let Some(value) = path.strip_prefix("/echo/") {
            return match request.method() {
                Method::Get => Response::new(StatusCode::Ok)
                    .header("Content-Type", "text/plain")
                    .body(value),
                Method::Post => Response::new(StatusCode::NotFound),
                Method::Other(_) => Response::new(StatusCode::MethodNotAllowed),
            };
        }

        if path == "/user-agent" {
            return match request.method() {
                Method::Get => Response::new(StatusCode::Ok)
                    .header("Content-Type", "text/plain")
                    .body(request.header("user-agent").unwrap_or("")),
                Method::Post => Response::new(StatusCode::NotFound),
                Method::Other(_) => Response::new(StatusCode::MethodNotAllowed),
            };
        }

        if let Some(name) = path.strip_prefix("/files/") {
            return self.serve_file(request, name).await;
        }

        Response::new(StatusCode::NotFound)
    }

    async fn serve_file(&self, request: &Request, name: &str) -> Response {
        let Some(file_path) = self.resolve(name) else {
            debug!(name, "rejected file name");
            return Response::new(StatusCode::NotFound);
        };

        match request.method() {
            Method::Get => match tokio::fs::read(&file_path).await {
                Ok(contents) => Response::new(StatusCode::Ok)
                    .header("Content-Type", "application/octet-stream")
                    .body_bytes(contents),
                Err(e) => {
                    debug!(path = %file_path.display(), error = %e, "file read failed");
                    Response::new(StatusCode::NotFound)
                }
            },
            Method::Post => match tokio::fs::write(&file_path, request.body()).await {
                Ok(()) => Response::new(StatusCode::Created),
                Err(e) => {
                    warn!(path = %file_path.display(), error = %e, "file write failed");
                    Response::new(StatusCode::InternalServerError)
                }
            },
            Method::Other(_) => Response::new(StatusCode::MethodNotAllowed),
        }
    }

    /// Joins a captured file name onto the serving directory.
    ///
    /// Names with `..` or `.` segments, an absolute prefix, or no segments at
    /// all are rejected so a request cannot escape the serving directory.
    fn resolve(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() {
            return None;
        }
        let relative = Path::new(name);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return None;
        }
        Some(self.directory.join(relative))
    }
}

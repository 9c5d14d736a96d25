//! Favicon fetch functionality
//!
//! Builds requests against the Google favicon resolution service, downloads
//! the best-matching icon for a target website and writes it to disk.

use regex::Regex;
use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;

// Matches an RFC 3986 scheme prefix ("https://", "ftp://", ...)
static SCHEME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://").unwrap()
});

/// Production endpoint of the favicon resolution service
pub const FAVICON_ENDPOINT: &str = "https://t0.gstatic.com/faviconV2";

/// Client identifier sent with every request
const CLIENT_ID: &str = "SOCIAL";

/// Resource selector sent with every request
const ICON_TYPE: &str = "FAVICON";

/// Fallback order hint: resolve by type, then size, then URL
const FALLBACK_OPTS: &str = "TYPE,SIZE,URL";

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when fetching a favicon
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("No icon available (HTTP {status}, content type '{content_type}')")]
    NoIconFound { status: u16, content_type: String },

    #[error("Filesystem error: {0}")]
    FileSystem(#[from] std::io::Error),
}

/// A single favicon download request
///
/// Constructed per invocation and handed off to a worker thread; holds no
/// shared state, so concurrent requests for different targets are safe.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Domain or URL whose favicon is wanted
    pub target: String,
    /// Directory the icon file is written into (created if absent)
    pub output_dir: PathBuf,
    /// Requested icon edge length in pixels
    pub size: u32,
}

impl FetchRequest {
    /// Create a request for the favicon of `target` at `size`x`size` pixels
    pub fn new(target: impl Into<String>, output_dir: impl Into<PathBuf>, size: u32) -> Self {
        Self {
            target: target.into().trim().to_string(),
            output_dir: output_dir.into(),
            size,
        }
    }

    /// The target as a fully qualified URL
    ///
    /// Inputs already carrying a scheme pass through verbatim; everything
    /// else gets an `https://` prefix.
    pub fn normalized_target(&self) -> String {
        if SCHEME_PATTERN.is_match(&self.target) {
            self.target.clone()
        } else {
            format!("https://{}", self.target)
        }
    }

    /// Network-location component of the normalized target, scheme and path
    /// stripped ("https://www.douban.com/x" -> "www.douban.com")
    fn host(&self) -> String {
        let normalized = self.normalized_target();
        let without_scheme = normalized
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&normalized);
        without_scheme
            .split('/')
            .next()
            .unwrap_or(without_scheme)
            .to_string()
    }

    /// Output filename for a response with the given content type
    pub fn file_name(&self, content_type: &str) -> String {
        format!(
            "{}_{}x{}{}",
            self.host(),
            self.size,
            self.size,
            extension_for(content_type)
        )
    }

    /// Full service request URL for this fetch
    fn request_url(&self, endpoint: &str) -> String {
        format!(
            "{}?client={}&type={}&fallback_opts={}&url={}&size={}",
            endpoint,
            CLIENT_ID,
            ICON_TYPE,
            FALLBACK_OPTS,
            urlencoding::encode(&self.normalized_target()),
            self.size
        )
    }

    /// Download the favicon and write it to the output directory
    ///
    /// # Returns
    /// * `Ok(PathBuf)` - Path of the file actually written
    /// * `Err(FetchError)` - Transport fault, no icon available, or a
    ///   directory/file write fault; no file is written on any error
    pub fn fetch(&self) -> Result<PathBuf, FetchError> {
        self.fetch_from(FAVICON_ENDPOINT)
    }

    /// Fetch against an explicit endpoint (tests point this at a local server)
    fn fetch_from(&self, endpoint: &str) -> Result<PathBuf, FetchError> {
        let url = self.request_url(endpoint);
        log::info!(
            "Fetching favicon for '{}' at {}x{}",
            self.target,
            self.size,
            self.size
        );
        log::debug!("Request URL: {}", url);

        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("favicon-downloader/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let response = client.get(&url).send()?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        // The service signals "no icon" with a non-200 status or a non-image
        // body (an error page can come back with status 200); neither is a
        // transport fault and neither is retried.
        if status != reqwest::StatusCode::OK || !content_type.contains("image") {
            log::info!(
                "No icon for '{}' (HTTP {}, content type '{}')",
                self.target,
                status.as_u16(),
                content_type
            );
            return Err(FetchError::NoIconFound {
                status: status.as_u16(),
                content_type,
            });
        }

        let bytes = response.bytes()?;

        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(self.file_name(&content_type));
        fs::write(&path, &bytes)?;

        log::info!("Saved icon to {}", path.display());
        Ok(path)
    }
}

/// File extension for a response content type
///
/// Anything that is not SVG, PNG or JPEG (including unknown image subtypes)
/// falls back to `.ico`.
fn extension_for(content_type: &str) -> &'static str {
    if content_type.contains("svg") {
        ".svg"
    } else if content_type.contains("png") {
        ".png"
    } else if content_type.contains("jpeg") {
        ".jpg"
    } else {
        ".ico"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    /// Spin up a local server that answers exactly one request, returning the
    /// endpoint to fetch from and a handle resolving to the requested URL.
    fn serve_once(
        status: u16,
        content_type: Option<&'static str>,
        body: Vec<u8>,
    ) -> (String, thread::JoinHandle<Option<String>>) {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let endpoint = format!("http://{}/faviconV2", addr);

        let handle = thread::spawn(move || {
            let request = server.recv().ok()?;
            let url = request.url().to_string();
            let mut response = tiny_http::Response::from_data(body).with_status_code(status);
            if let Some(ct) = content_type {
                response.add_header(
                    tiny_http::Header::from_bytes(&b"Content-Type"[..], ct.as_bytes()).unwrap(),
                );
            }
            let _ = request.respond(response);
            Some(url)
        });

        (endpoint, handle)
    }

    #[test]
    fn test_normalize_adds_https_scheme() {
        let request = FetchRequest::new("github.com", "/tmp/icons", 64);
        assert_eq!(request.normalized_target(), "https://github.com");

        let request = FetchRequest::new("www.douban.com", "/tmp/icons", 64);
        assert_eq!(request.normalized_target(), "https://www.douban.com");
    }

    #[test]
    fn test_normalize_keeps_existing_scheme() {
        for target in ["https://github.com", "http://example.org/path", "ftp://mirror.example"] {
            let request = FetchRequest::new(target, "/tmp/icons", 64);
            assert_eq!(request.normalized_target(), target);
        }
    }

    #[test]
    fn test_new_trims_whitespace() {
        let request = FetchRequest::new("  github.com \n", "/tmp/icons", 64);
        assert_eq!(request.target, "github.com");
    }

    #[test]
    fn test_host_strips_scheme_and_path() {
        let request = FetchRequest::new("https://example.org/path/deeper", "/tmp/icons", 64);
        assert_eq!(request.host(), "example.org");

        let request = FetchRequest::new("developer.mozilla.org/en-US/docs", "/tmp/icons", 64);
        assert_eq!(request.host(), "developer.mozilla.org");
    }

    #[test]
    fn test_host_keeps_port() {
        let request = FetchRequest::new("http://localhost:8080/app", "/tmp/icons", 64);
        assert_eq!(request.host(), "localhost:8080");
    }

    #[test]
    fn test_extension_for_content_types() {
        assert_eq!(extension_for("image/svg+xml"), ".svg");
        assert_eq!(extension_for("image/png"), ".png");
        assert_eq!(extension_for("image/jpeg"), ".jpg");
        assert_eq!(extension_for("image/x-icon"), ".ico");
        assert_eq!(extension_for("image/unknown-subtype"), ".ico");
        assert_eq!(extension_for(""), ".ico");
    }

    #[test]
    fn test_file_name_derivation() {
        let request = FetchRequest::new("github.com", "/tmp/icons", 128);
        assert_eq!(request.file_name("image/png"), "github.com_128x128.png");

        let request = FetchRequest::new("https://example.org/path", "/tmp/icons", 64);
        assert_eq!(request.file_name("image/svg+xml"), "example.org_64x64.svg");
    }

    #[test]
    fn test_fetch_success_writes_file() {
        let payload = b"\x89PNG fake image payload".to_vec();
        let (endpoint, handle) = serve_once(200, Some("image/png"), payload.clone());

        let dir = tempfile::tempdir().unwrap();
        let request = FetchRequest::new("github.com", dir.path(), 128);
        let path = request.fetch_from(&endpoint).unwrap();

        assert_eq!(path, dir.path().join("github.com_128x128.png"));
        assert_eq!(fs::read(&path).unwrap(), payload);

        // The service URL carries all five query parameters
        let url = handle.join().unwrap().unwrap();
        assert!(url.contains("client=SOCIAL"));
        assert!(url.contains("type=FAVICON"));
        assert!(url.contains("fallback_opts=TYPE,SIZE,URL"));
        assert!(url.contains("url=https%3A%2F%2Fgithub.com"));
        assert!(url.contains("size=128"));
    }

    #[test]
    fn test_fetch_creates_output_directory() {
        let (endpoint, handle) = serve_once(200, Some("image/png"), vec![1, 2, 3]);

        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let request = FetchRequest::new("github.com", &nested, 32);
        let path = request.fetch_from(&endpoint).unwrap();

        assert!(path.starts_with(&nested));
        assert!(path.exists());
        handle.join().unwrap();
    }

    #[test]
    fn test_fetch_unknown_image_type_falls_back_to_ico() {
        let (endpoint, handle) = serve_once(200, Some("image/vnd.microsoft.icon"), vec![0; 16]);

        let dir = tempfile::tempdir().unwrap();
        let request = FetchRequest::new("example.org", dir.path(), 16);
        let path = request.fetch_from(&endpoint).unwrap();

        assert_eq!(path, dir.path().join("example.org_16x16.ico"));
        handle.join().unwrap();
    }

    #[test]
    fn test_fetch_404_is_no_icon_found() {
        let (endpoint, handle) = serve_once(404, Some("text/plain"), b"not found".to_vec());

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("icons");
        let request = FetchRequest::new("github.com", &out, 128);
        let err = request.fetch_from(&endpoint).unwrap_err();

        match err {
            FetchError::NoIconFound { status, .. } => assert_eq!(status, 404),
            other => panic!("expected NoIconFound, got {:?}", other),
        }
        // Nothing written, not even the directory
        assert!(!out.exists());
        handle.join().unwrap();
    }

    #[test]
    fn test_fetch_200_non_image_is_no_icon_found() {
        let (endpoint, handle) =
            serve_once(200, Some("text/html"), b"<html>error page</html>".to_vec());

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("icons");
        let request = FetchRequest::new("github.com", &out, 128);
        let err = request.fetch_from(&endpoint).unwrap_err();

        match err {
            FetchError::NoIconFound { status, content_type } => {
                assert_eq!(status, 200);
                assert!(content_type.contains("text/html"));
            }
            other => panic!("expected NoIconFound, got {:?}", other),
        }
        assert!(!out.exists());
        handle.join().unwrap();
    }

    #[test]
    fn test_fetch_connection_failure_is_network_error() {
        // Bind then drop to get a port nothing listens on
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let endpoint = format!("http://127.0.0.1:{}/faviconV2", port);

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("icons");
        let request = FetchRequest::new("github.com", &out, 128);
        let err = request.fetch_from(&endpoint).unwrap_err();

        assert!(matches!(err, FetchError::Network(_)));
        assert!(!out.exists());
    }

    #[test]
    fn test_fetch_twice_overwrites_same_path() {
        let dir = tempfile::tempdir().unwrap();
        let request = FetchRequest::new("github.com", dir.path(), 64);

        let (endpoint, handle) = serve_once(200, Some("image/png"), b"first".to_vec());
        let first = request.fetch_from(&endpoint).unwrap();
        handle.join().unwrap();

        let (endpoint, handle) = serve_once(200, Some("image/png"), b"second".to_vec());
        let second = request.fetch_from(&endpoint).unwrap();
        handle.join().unwrap();

        assert_eq!(first, second);
        assert_eq!(fs::read(&second).unwrap(), b"second");
    }
}

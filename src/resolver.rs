//! Reference resolution - turns a schema reference into an open byte stream.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::error::ResolveError;
use crate::reference::SchemaReference;

/// Opens schema references relative to a fixed working directory.
///
/// The resolver holds no mutable state, so one instance can be shared
/// freely between threads.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use schema_loader::Resolver;
///
/// let resolver = Resolver::new("/specs").timeout(Duration::from_secs(5));
/// let stream = resolver.open("schema.json").unwrap();
/// let document = schema_loader::decode_json(stream).unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    /// Directory that local paths are joined onto. Empty means the
    /// process current directory.
    pub working_dir: PathBuf,
    /// Deadline for a whole HTTP exchange, body included. `None` waits
    /// indefinitely.
    pub timeout: Option<Duration>,
}

impl Resolver {
    /// Create a resolver rooted at `working_dir`, with no HTTP deadline.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            timeout: None,
        }
    }

    /// Bound every HTTP fetch made through this resolver.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Open a reference as a readable stream.
    ///
    /// Dropping the returned stream closes the file or releases the
    /// HTTP connection.
    ///
    /// # Errors
    ///
    /// - `ResolveError::InvalidReference` if the reference is malformed or unsupported
    /// - `ResolveError::FileOpen` if a local file cannot be opened
    /// - `ResolveError::FetchFailed` if the server answers with a non-2xx status
    /// - `ResolveError::Network` if the request cannot be completed
    pub fn open(&self, reference: &str) -> Result<SchemaStream, ResolveError> {
        self.open_inner(reference, self.timeout)
    }

    /// Like [`Resolver::open`], with a deadline for this call only.
    ///
    /// When the deadline passes the call fails with a `Network` error whose
    /// [`ResolveError::is_timeout`] is true.
    pub fn open_with_timeout(
        &self,
        reference: &str,
        timeout: Duration,
    ) -> Result<SchemaStream, ResolveError> {
        self.open_inner(reference, Some(timeout))
    }

    fn open_inner(
        &self,
        reference: &str,
        timeout: Option<Duration>,
    ) -> Result<SchemaStream, ResolveError> {
        match SchemaReference::parse(reference)? {
            SchemaReference::Local(path) => self.open_local(&path),
            #[cfg(feature = "remote")]
            SchemaReference::Remote(url) => fetch(url, timeout),
            #[cfg(not(feature = "remote"))]
            SchemaReference::Remote(_) => {
                let _ = timeout;
                Err(ResolveError::invalid(
                    reference,
                    "remote references require the `remote` feature",
                ))
            }
        }
    }

    fn open_local(&self, path: &Path) -> Result<SchemaStream, ResolveError> {
        let full_path = join_under(&self.working_dir, path);
        debug!(path = %full_path.display(), "opening local schema");

        let file = File::open(&full_path).map_err(|source| ResolveError::FileOpen {
            path: full_path.clone(),
            source,
        })?;

        Ok(SchemaStream {
            inner: StreamInner::File(file),
            origin: full_path.display().to_string(),
        })
    }
}

/// Join `path` onto `working_dir`, nesting absolute paths instead of letting
/// them replace the base. An empty `working_dir` leaves `path` unchanged.
fn join_under(working_dir: &Path, path: &Path) -> PathBuf {
    if working_dir.as_os_str().is_empty() {
        return path.to_path_buf();
    }

    let relative: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::Prefix(_) | Component::RootDir))
        .collect();
    working_dir.join(relative)
}

/// Open a reference relative to the process current directory.
///
/// Shorthand for `Resolver::default().open(reference)`.
pub fn open(reference: &str) -> Result<SchemaStream, ResolveError> {
    Resolver::default().open(reference)
}

#[cfg(feature = "remote")]
fn fetch(url: url::Url, timeout: Option<Duration>) -> Result<SchemaStream, ResolveError> {
    let url_string = url.to_string();
    debug!(url = %url_string, ?timeout, "fetching remote schema");

    // reqwest's blocking client defaults to a 30s timeout; set it explicitly
    // so `None` really means no deadline.
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|source| ResolveError::Network {
            url: url_string.clone(),
            source,
        })?;

    let response = client
        .get(url)
        .send()
        .map_err(|source| ResolveError::Network {
            url: url_string.clone(),
            source,
        })?;

    let status = response.status();
    debug!(url = %url_string, status = status.as_u16(), "received response");

    // Non-2xx: drop the response without reading the body
    if !status.is_success() {
        return Err(ResolveError::FetchFailed {
            url: url_string,
            status: status.as_u16(),
        });
    }

    Ok(SchemaStream {
        inner: StreamInner::Http(response),
        origin: url_string,
    })
}

/// An open schema byte stream.
///
/// Owns the underlying file or HTTP response; dropping it releases them.
pub struct SchemaStream {
    inner: StreamInner,
    origin: String,
}

enum StreamInner {
    File(File),
    #[cfg(feature = "remote")]
    Http(reqwest::blocking::Response),
}

impl SchemaStream {
    /// The opened file path or fetched URL.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// True when the stream is an HTTP response body rather than a file.
    pub fn is_remote(&self) -> bool {
        match self.inner {
            StreamInner::File(_) => false,
            #[cfg(feature = "remote")]
            StreamInner::Http(_) => true,
        }
    }
}

impl Read for SchemaStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.inner {
            StreamInner::File(file) => file.read(buf),
            #[cfg(feature = "remote")]
            StreamInner::Http(response) => response.read(buf),
        }
    }
}

impl fmt::Debug for SchemaStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaStream")
            .field("origin", &self.origin)
            .field("remote", &self.is_remote())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn read_all(mut stream: SchemaStream) -> String {
        let mut content = String::new();
        stream.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn open_joins_working_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("schema.json"), r#"{"type":"object"}"#).unwrap();

        let resolver = Resolver::new(dir.path());
        let stream = resolver.open("schema.json").unwrap();
        assert!(!stream.is_remote());
        assert!(stream.origin().ends_with("schema.json"));
        assert_eq!(read_all(stream), r#"{"type":"object"}"#);
    }

    #[test]
    fn open_nested_relative_path() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("types")).unwrap();
        fs::write(dir.path().join("types/buyer.yaml"), "type: object\n").unwrap();

        let stream = Resolver::new(dir.path()).open("types/buyer.yaml").unwrap();
        assert_eq!(read_all(stream), "type: object\n");
    }

    #[test]
    fn open_percent_encoded_name() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("my schema.json"), "{}").unwrap();

        let stream = Resolver::new(dir.path()).open("my%20schema.json").unwrap();
        assert_eq!(read_all(stream), "{}");
    }

    #[test]
    fn open_absolute_path_nests_under_working_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("schema.json"), "{}").unwrap();

        let stream = Resolver::new(dir.path()).open("/schema.json").unwrap();
        assert_eq!(read_all(stream), "{}");
    }

    #[test]
    fn open_absolute_path_without_working_dir() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("abs.json");
        fs::write(&file, "{}").unwrap();

        let stream = Resolver::default().open(file.to_str().unwrap()).unwrap();
        assert_eq!(read_all(stream), "{}");
    }

    #[test]
    fn join_under_forms() {
        assert_eq!(
            join_under(Path::new("/specs"), Path::new("/s.json")),
            PathBuf::from("/specs/s.json")
        );
        assert_eq!(
            join_under(Path::new("/specs"), Path::new("types/s.json")),
            PathBuf::from("/specs/types/s.json")
        );
        assert_eq!(
            join_under(Path::new(""), Path::new("/s.json")),
            PathBuf::from("/s.json")
        );
    }

    #[test]
    fn open_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = Resolver::new(dir.path()).open("missing.json");
        match result {
            Err(ResolveError::FileOpen { path, source }) => {
                assert_eq!(path, dir.path().join("missing.json"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected FileOpen, got {:?}", other),
        }
    }

    #[test]
    fn open_rejects_unsupported_scheme() {
        let result = Resolver::default().open("ftp://example.com/schema.json");
        assert!(matches!(
            result,
            Err(ResolveError::InvalidReference { .. })
        ));
    }

    #[test]
    fn timeout_builder() {
        let resolver = Resolver::new("/specs").timeout(Duration::from_millis(250));
        assert_eq!(resolver.working_dir, PathBuf::from("/specs"));
        assert_eq!(resolver.timeout, Some(Duration::from_millis(250)));
        assert_eq!(Resolver::default().timeout, None);
    }

    #[test]
    fn resolver_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        fn assert_send<T: Send>() {}
        assert_send_sync::<Resolver>();
        assert_send::<SchemaStream>();
    }

    #[cfg(feature = "remote")]
    mod remote {
        use super::*;

        #[test]
        fn open_success_streams_body() {
            let mut server = mockito::Server::new();
            let mock = server
                .mock("GET", "/schema.json")
                .with_status(200)
                .with_body(r#"{"type":"string"}"#)
                .create();

            let url = format!("{}/schema.json", server.url());
            let stream = open(&url).unwrap();
            assert!(stream.is_remote());
            assert_eq!(read_all(stream), r#"{"type":"string"}"#);
            mock.assert();
        }

        #[test]
        fn open_accepts_any_2xx() {
            let mut server = mockito::Server::new();
            let _mock = server
                .mock("GET", "/s.yaml")
                .with_status(203)
                .with_body("a: 1\n")
                .create();

            let stream = open(&format!("{}/s.yaml", server.url())).unwrap();
            assert_eq!(read_all(stream), "a: 1\n");
        }

        #[test]
        fn open_non_2xx_is_fetch_failed() {
            let mut server = mockito::Server::new();
            for status in [301, 404, 500] {
                let path = format!("/status/{}", status);
                let _mock = server
                    .mock("GET", path.as_str())
                    .with_status(status)
                    .with_body("error page")
                    .create();

                let err = open(&format!("{}{}", server.url(), path)).unwrap_err();
                assert_eq!(err.status(), Some(status as u16), "status {}", status);
                assert!(!err.to_string().contains("error page"));
            }
        }

        #[test]
        fn open_unreachable_host_is_network_error() {
            // Port 9 (discard) on localhost is almost never listening
            let result = open("http://127.0.0.1:9/schema.json");
            assert!(matches!(result, Err(ResolveError::Network { .. })));
        }
    }
}

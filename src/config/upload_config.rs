//! Upload configuration resolved once at startup

use std::fmt;
use std::net::Ipv6Addr;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::cli::Cli;
use crate::errors::{OtaError, Result};

pub const DEFAULT_SYNC_STATUS: u16 = 200;
pub const DEFAULT_SYNC_MARKER: &str = "SYNC";

/// Transport scheme used to reach the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/// HTTP Basic credentials; only built when both parts are non-empty
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn from_parts(username: Option<&str>, password: Option<&str>) -> Option<Self> {
        match (username, password) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some(Self {
                    username: username.to_string(),
                    password: password.to_string(),
                })
            }
            _ => None,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// What the board must answer during the sync handshake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncExpectation {
    /// Status the sync POST must return
    pub status: u16,
    /// Substring the polled GET body must contain
    pub marker: String,
}

impl Default for SyncExpectation {
    fn default() -> Self {
        Self {
            status: DEFAULT_SYNC_STATUS,
            marker: DEFAULT_SYNC_MARKER.to_string(),
        }
    }
}

impl SyncExpectation {
    /// Parse a `code:string` override.
    ///
    /// Anything other than exactly two `:`-separated parts leaves the defaults
    /// in place; a non-numeric code is rejected.
    pub fn parse(value: &str) -> Result<Self> {
        let parts: Vec<&str> = value.split(':').collect();
        if parts.len() != 2 {
            log::warn!(
                "Ignoring sync expectation '{}', expected the form code:string",
                value
            );
            return Ok(Self::default());
        }

        let status = parts[0].trim().parse::<u16>().map_err(|e| {
            OtaError::Config(format!("Invalid sync status code '{}': {}", parts[0], e))
        })?;

        Ok(Self {
            status,
            marker: parts[1].to_string(),
        })
    }
}

/// Everything a single upload run needs to know
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub address: String,
    pub port: u16,
    pub scheme: Scheme,
    pub sync_endpoint: Option<String>,
    pub upload_endpoint: Option<String>,
    pub reset_endpoint: Option<String>,
    pub sketch: Option<PathBuf>,
    pub binary: bool,
    pub credentials: Option<Credentials>,
    pub sync_expectation: SyncExpectation,
    /// Serve the sketch locally and send its URL instead of its bytes
    pub self_serve: bool,
    /// Port the sketch server binds to; the board port when unset
    pub serve_port: Option<u16>,
    pub timeout: Duration,
    pub verbose: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            address: "localhost".to_string(),
            port: 80,
            scheme: Scheme::Http,
            sync_endpoint: None,
            upload_endpoint: None,
            reset_endpoint: None,
            sketch: None,
            binary: false,
            credentials: None,
            sync_expectation: SyncExpectation::default(),
            self_serve: false,
            serve_port: None,
            timeout: Duration::from_secs(10),
            verbose: true,
        }
    }
}

impl UploadConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let sync_endpoint = non_empty(cli.sync.as_deref());
        // The override only matters when there is a sync phase to apply it to
        let sync_expectation = match (&sync_endpoint, non_empty(cli.sync_exp.as_deref())) {
            (Some(_), Some(value)) => SyncExpectation::parse(&value)?,
            _ => SyncExpectation::default(),
        };

        let scheme = if non_empty(cli.ssl.as_deref()).is_some() {
            Scheme::Https
        } else {
            Scheme::Http
        };

        let config = Self {
            address: cli.address.clone(),
            port: cli.port,
            scheme,
            sync_endpoint,
            upload_endpoint: non_empty(cli.upload.as_deref()),
            reset_endpoint: non_empty(cli.reset.as_deref()),
            sketch: non_empty(cli.sketch.as_deref()).map(PathBuf::from),
            binary: cli.binary,
            credentials: Credentials::from_parts(cli.username.as_deref(), cli.password.as_deref()),
            sync_expectation,
            self_serve: cli.serve,
            serve_port: cli.serve_port,
            timeout: Duration::from_secs(cli.timeout),
            verbose: cli.verbose,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.address.trim().is_empty() {
            return Err(OtaError::Config("Board address must not be empty".to_string()));
        }
        Ok(())
    }

    /// `<scheme>://<address>:<port>` without a trailing slash
    pub fn base_url(&self) -> String {
        let host = match self.address.parse::<Ipv6Addr>() {
            Ok(_) => format!("[{}]", self.address),
            Err(_) => self.address.clone(),
        };
        format!("{}://{}:{}", self.scheme.as_str(), host, self.port)
    }

    /// Full URL of an endpoint path, appended verbatim to the base URL
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        let url = Url::parse(&format!("{}{}", self.base_url(), endpoint))?;
        Ok(url)
    }

    pub fn serve_port(&self) -> u16 {
        self.serve_port.unwrap_or(self.port)
    }

    pub fn has_any_phase(&self) -> bool {
        self.sync_endpoint.is_some() || self.upload_endpoint.is_some() || self.reset_endpoint.is_some()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

//! Node endpoint resolution.
//!
//! The base URL is a loose `scheme://host:port` mask. Anything that does not
//! start with an HTTP scheme is reduced to its last path segment and treated
//! as a host, so local file paths are never followed.

use std::fmt;

use raiblocks_types::constants::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SCHEME};
use reqwest::Url;

/// Fully resolved node endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Endpoint {
    /// Resolve an optional base URL, filling in scheme, host and port.
    pub fn resolve(base_url: Option<&str>) -> Self {
        let base = match base_url.map(str::trim).filter(|b| !b.is_empty()) {
            Some(base) => base,
            None => return Self::default(),
        };

        let (scheme, rest) = match base.split_once("://") {
            Some((scheme, rest)) if is_http(scheme) => (scheme.to_ascii_lowercase(), rest),
            _ => {
                let last = base.split('/').filter(|s| !s.is_empty()).last().unwrap_or("");
                (DEFAULT_SCHEME.to_string(), last)
            }
        };

        let authority = rest.split(['/', '?', '#']).next().unwrap_or("");
        let url = match Url::parse(&format!("{}://{}", scheme, authority)) {
            Ok(url) => url,
            Err(e) => {
                log::warn!("unusable node address {:?} ({}), using {}", base, e, DEFAULT_HOST);
                return Self {
                    scheme,
                    ..Self::default()
                };
            }
        };
        // `Url` elides a port equal to the scheme default; keep it when it was written out.
        let port = url.port().or_else(|| {
            let known = url.port_or_known_default()?;
            authority.ends_with(&format!(":{}", known)).then_some(known)
        });

        Self {
            host: url.host_str().unwrap_or(DEFAULT_HOST).to_string(),
            port: port.unwrap_or(DEFAULT_PORT),
            scheme,
        }
    }

    /// URL the request is POSTed to.
    pub fn url(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}/", self.scheme, self.host, self.port)
    }
}

fn is_http(scheme: &str) -> bool {
    scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
}

//! Endpoint resolution
//!
//! Turns a user-supplied base URL (possibly empty, possibly schemeless) and a
//! declared protocol family into a concrete scheme, host, port and path,
//! matched against a provider profile.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::LlmError;
use crate::protocol::ProtocolFamily;
use crate::provider::{ProviderProfile, ProviderRegistry, Scheme};

/// Fully addressed request target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    /// Connection scheme
    pub scheme: Scheme,
    /// Host name or address literal
    pub host: String,
    /// TCP port
    pub port: u16,
    /// Request path, never empty
    pub path: String,
}

impl ResolvedEndpoint {
    /// Endpoint as a parsed URL
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Resolution` if the parts do not form a valid URL
    pub fn url(&self) -> Result<Url, LlmError> {
        Url::parse(&self.to_string()).map_err(|e| LlmError::Resolution(format!("invalid endpoint {self}: {e}")))
    }
}

impl fmt::Display for ResolvedEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}{}", self.scheme, self.host, self.port, self.path)
    }
}

/// Resolved endpoint together with the profile that governs the request
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    /// Request target
    pub endpoint: ResolvedEndpoint,
    /// Profile supplying headers, body shape and response parsing
    pub profile: &'a ProviderProfile,
    /// Model the request is addressed to
    pub model: String,
}

/// Endpoint pieces recovered from the raw string
#[derive(Debug, Default)]
struct ParsedEndpoint {
    scheme: Option<Scheme>,
    host: Option<String>,
    port: Option<u16>,
    path: String,
}

/// Matches raw endpoints against the provider registry
#[derive(Debug, Clone, Copy)]
pub struct EndpointResolver<'a> {
    registry: &'a ProviderRegistry,
}

impl<'a> EndpointResolver<'a> {
    /// Resolver backed by `registry`
    pub const fn new(registry: &'a ProviderRegistry) -> Self {
        Self { registry }
    }

    /// Resolve `raw` for a request to `model`
    ///
    /// The profile is matched by parsed host first, then by `declared`
    /// family (preferring `selected`). Without an explicit model the matched
    /// profile's default is used. Resolution is idempotent: feeding the
    /// displayed endpoint back in yields the same result.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Resolution` for unsupported schemes, when no
    /// profile matches, or when neither the endpoint nor the profile names
    /// a host. Returns `LlmError::InvalidRequest` when no model is known.
    pub fn resolve(
        &self,
        raw: Option<&str>,
        declared: ProtocolFamily,
        selected: &'a ProviderProfile,
        model: Option<&str>,
    ) -> Result<Resolution<'a>, LlmError> {
        let parsed = parse_endpoint(raw.unwrap_or_default(), selected.default_scheme)?;

        let profile = parsed
            .host
            .as_deref()
            .and_then(|host| self.registry.find_by_host(host))
            .or_else(|| self.registry.find_by_family(declared, selected))
            .ok_or_else(|| {
                LlmError::Resolution(format!(
                    "no provider matches host {:?} or protocol '{declared}'",
                    parsed.host.as_deref().unwrap_or_default()
                ))
            })?;

        let (scheme, host, port, base_path) = match parsed.host {
            Some(host) => {
                let scheme = parsed.scheme.unwrap_or(profile.default_scheme);
                (scheme, host, parsed.port.unwrap_or_else(|| scheme.default_port()), parsed.path)
            }
            None => {
                let host = profile.default_host.clone().ok_or_else(|| {
                    LlmError::Resolution(format!("provider '{}' needs an endpoint URL", profile.name))
                })?;
                let scheme = profile.default_scheme;
                let port = profile.default_port.unwrap_or_else(|| scheme.default_port());
                let base_path = if parsed.path.is_empty() {
                    profile.default_base_path.clone()
                } else {
                    parsed.path
                };
                (scheme, host, port, base_path)
            }
        };

        let model = model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_owned)
            .or_else(|| profile.default_model.clone())
            .ok_or_else(|| LlmError::InvalidRequest(format!("no model configured for provider '{}'", profile.name)))?;

        let endpoint = ResolvedEndpoint {
            scheme,
            host,
            port,
            path: reconcile_path(&base_path, &profile.suffix_for(&model)),
        };

        Ok(Resolution {
            endpoint,
            profile,
            model,
        })
    }
}

/// Append `suffix` to `path` unless already present, with exactly one `/`
/// at the seam
pub fn reconcile_path(path: &str, suffix: &str) -> String {
    let joined = if suffix.is_empty() || path.ends_with(suffix) {
        path.to_owned()
    } else {
        match (path.ends_with('/'), suffix.strip_prefix('/')) {
            (true, Some(rest)) => format!("{path}{rest}"),
            (false, None) => format!("{path}/{suffix}"),
            _ => format!("{path}{suffix}"),
        }
    };

    if joined.starts_with('/') {
        joined
    } else {
        format!("/{joined}")
    }
}

fn parse_endpoint(raw: &str, default_scheme: Scheme) -> Result<ParsedEndpoint, LlmError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(ParsedEndpoint::default());
    }

    // Path only: addressed to the profile's default host
    if raw.starts_with('/') {
        return Ok(ParsedEndpoint {
            path: raw.to_owned(),
            ..ParsedEndpoint::default()
        });
    }

    let candidate = if raw.contains("://") {
        raw.to_owned()
    } else {
        format!("{default_scheme}://{raw}")
    };

    let url = match Url::parse(&candidate) {
        Ok(url) => url,
        Err(error) => {
            tracing::warn!(endpoint = raw, %error, "unparseable endpoint, using provider defaults");
            return Ok(ParsedEndpoint::default());
        }
    };

    let scheme = Scheme::from_str(url.scheme())
        .map_err(|_| LlmError::Resolution(format!("unsupported scheme '{}' in endpoint {raw}", url.scheme())))?;

    let Some(host) = url.host_str().filter(|h| !h.is_empty()) else {
        return Ok(ParsedEndpoint::default());
    };

    Ok(ParsedEndpoint {
        scheme: Some(scheme),
        host: Some(host.to_owned()),
        port: url.port(),
        path: url.path().to_owned(),
    })
}

use {
    reqwest::{
        Url,
        blocking::Client,
        header::LOCATION,
        redirect::Policy,
    },
    sha2::{Digest, Sha256},
    std::{fmt, time::Duration},
    thiserror::Error,
};

/// Redirect hops followed before giving up.
pub const MAX_REDIRECTS: usize = 5;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed ({status})")]
    Status { status: u16 },

    #[error("Redirect ({status}) without a usable Location header")]
    MissingLocation { status: u16 },

    #[error("Too many redirects (more than {limit})")]
    TooManyRedirects { limit: usize },
}

/// The three release artifacts hashed for every formula update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Source,
    Arm64Bottle,
    X86_64Bottle,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArtifactKind::Source => "Source tarball",
            ArtifactKind::Arm64Bottle => "ARM64 bottle (Apple Silicon)",
            ArtifactKind::X86_64Bottle => "x86_64 bottle (Intel)",
        })
    }
}

/// A remote artifact to hash: where it lives and what to call it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub url: String,
}

impl Artifact {
    pub fn label(&self) -> String {
        self.kind.to_string()
    }
}

/// Anything that can produce the SHA-256 of a remote artifact.
pub trait ArtifactSource {
    /// Returns the lowercase hex SHA-256 of the artifact's bytes.
    fn sha256(&self, artifact: &Artifact) -> Result<String, FetchError>;
}

/// Hex encoded SHA-256 digest of `bytes`.
#[cfg(test)]
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Blocking HTTP fetcher. Redirects are followed here rather than by the
/// client, at most `MAX_REDIRECTS` hops.
pub struct HttpFetcher {
    client: Client,
    max_redirects: usize,
}

impl HttpFetcher {
    pub fn new(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .redirect(Policy::none())
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            max_redirects: MAX_REDIRECTS,
        })
    }
}

impl ArtifactSource for HttpFetcher {
    fn sha256(&self, artifact: &Artifact) -> Result<String, FetchError> {
        let mut url = Url::parse(&artifact.url).map_err(|e| FetchError::InvalidUrl {
            url: artifact.url.clone(),
            reason: e.to_string(),
        })?;
        let mut redirects = 0;

        loop {
            tracing::debug!(%url, kind = ?artifact.kind, "GET");
            let mut response = self.client.get(url.clone()).send()?;
            let status = response.status();

            if status.is_success() {
                // Hashed as it streams.
                let mut hasher = Sha256::new();
                let bytes = response.copy_to(&mut hasher)?;
                tracing::debug!(%url, bytes, "fetched");
                return Ok(format!("{:x}", hasher.finalize()));
            }

            if !status.is_redirection() {
                return Err(FetchError::Status {
                    status: status.as_u16(),
                });
            }

            redirects += 1;
            if redirects > self.max_redirects {
                return Err(FetchError::TooManyRedirects {
                    limit: self.max_redirects,
                });
            }

            // `Location` may be relative to the URL that produced it.
            let next = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|location| url.join(location).ok())
                .ok_or(FetchError::MissingLocation {
                    status: status.as_u16(),
                })?;
            tracing::debug!(from = %url, to = %next, hop = redirects, "redirect");
            url = next;
        }
    }
}

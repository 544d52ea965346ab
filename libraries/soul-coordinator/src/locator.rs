//! Resource locators and the track keys derived from them
//!
//! A [`TrackKey`] is what engines stamp on every clock publication. It is a
//! digest of the normalized locator URL, so two spellings of the same resource
//! (`HTTP://Host:80/a/../b.mp3` and `http://host/b.mp3`) share a key.

use crate::error::{CoordinatorError, Result};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use url::Url;

/// Location of a playable resource (local file or remote stream)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator(Url);

impl Locator {
    /// Parse a URL string
    pub fn parse(input: &str) -> Result<Self> {
        Ok(Self(Url::parse(input)?))
    }

    /// Build a `file://` locator from a filesystem path
    ///
    /// Relative paths resolve against the current working directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|e| {
                    CoordinatorError::InvalidLocator(format!("{}: {}", path.display(), e))
                })?
                .join(path)
        };

        Url::from_file_path(&absolute)
            .map(Self)
            .map_err(|()| CoordinatorError::InvalidLocator(absolute.display().to_string()))
    }

    /// Whether the resource lives on local storage
    pub fn is_local(&self) -> bool {
        self.0.scheme() == "file"
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Derive the track key for this locator
    ///
    /// The fragment is ignored: it addresses a position inside the resource,
    /// not a different resource.
    pub fn key(&self) -> TrackKey {
        let mut normalized = self.0.clone();
        normalized.set_fragment(None);

        let digest = Sha256::digest(normalized.as_str().as_bytes());
        TrackKey(hex::encode(digest))
    }
}

impl From<Url> for Locator {
    fn from(url: Url) -> Self {
        Self(url)
    }
}

impl FromStr for Locator {
    type Err = CoordinatorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Opaque identifier correlating clock telemetry with the track that produced it
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackKey(String);

impl TrackKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&Locator> for TrackKey {
    fn from(locator: &Locator) -> Self {
        locator.key()
    }
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Full digests are noisy in logs
        f.write_str(&self.0[..self.0.len().min(12)])
    }
}

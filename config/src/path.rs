//! Dotted field paths (`full_node.introducer_peer.host`).

use std::fmt;
use std::str::FromStr;

use crate::ConfigError;

/// One component of a [`FieldPath`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A mapping key.
    Key(String),
    /// An all-digit component. Indexes sequences; against a mapping it is
    /// looked up as a key.
    Index(usize),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        let canonical = raw == "0" || !raw.starts_with('0');
        if canonical && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = raw.parse() {
                return Self::Index(index);
            }
        }
        Self::Key(raw.to_string())
    }

    /// The segment as a mapping key.
    pub fn key(&self) -> String {
        match self {
            Self::Key(key) => key.clone(),
            Self::Index(index) => index.to_string(),
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Key(_) => None,
            Self::Index(index) => Some(*index),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// A parsed, non-empty path into the config document.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    /// Parse a dot-separated path. Empty paths and empty segments
    /// (`a..b`, `.a`, `a.`) are rejected.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        if raw.is_empty() {
            return Err(ConfigError::InvalidPath(raw.to_string()));
        }
        let segments = raw
            .split('.')
            .map(|part| {
                if part.trim().is_empty() {
                    Err(ConfigError::InvalidPath(raw.to_string()))
                } else {
                    Ok(Segment::parse(part))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// All segments but the last.
    pub fn parent(&self) -> &[Segment] {
        &self.segments[..self.segments.len() - 1]
    }

    pub fn leaf(&self) -> &Segment {
        &self.segments[self.segments.len() - 1]
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

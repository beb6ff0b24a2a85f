//! Structural paths to request parameters.
//!
//! `MISSING_PARAMETER`, `INVALID_PARAMETER` and `PARAMETER_OUT_OF_RANGE`
//! errors name the offending field of the request with a [`ParameterPath`].
//! On the wire it is a dot-joined string: `device.config.0.value`. Segments
//! made only of digits are array indexes, everything else is an object key.
//! Request field names never contain dots or consist of digits only.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One step into a request object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Identifies a (possibly nested) field inside a request.
///
/// Never empty: the first segment is always a top-level parameter key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParameterPath(Vec<PathSegment>);

impl ParameterPath {
    /// Path to a top-level parameter.
    pub fn root(key: impl Into<String>) -> Self {
        Self(vec![PathSegment::Key(key.into())])
    }

    /// Descend into an object key.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.0.push(PathSegment::Key(key.into()));
        self
    }

    /// Descend into an array element.
    pub fn index(mut self, index: usize) -> Self {
        self.0.push(PathSegment::Index(index));
        self
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// The top-level parameter this path points into.
    pub fn parameter(&self) -> &str {
        match self.0.first() {
            Some(PathSegment::Key(key)) => key,
            _ => "",
        }
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

/// Errors parsing a dot-joined path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsePathError {
    #[error("parameter path is empty")]
    Empty,

    #[error("empty segment at position {position} in parameter path")]
    EmptySegment { position: usize },

    #[error("parameter path must start with a key, found index {index}")]
    LeadingIndex { index: usize },
}

impl FromStr for ParameterPath {
    type Err = ParsePathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParsePathError::Empty);
        }

        let mut segments = Vec::new();
        for (position, raw) in s.split('.').enumerate() {
            if raw.is_empty() {
                return Err(ParsePathError::EmptySegment { position });
            }
            let segment = if raw.bytes().all(|b| b.is_ascii_digit()) {
                match raw.parse::<usize>() {
                    Ok(index) => PathSegment::Index(index),
                    Err(_) => PathSegment::Key(raw.to_string()),
                }
            } else {
                PathSegment::Key(raw.to_string())
            };
            segments.push(segment);
        }

        if let Some(PathSegment::Index(index)) = segments.first() {
            return Err(ParsePathError::LeadingIndex { index: *index });
        }

        Ok(Self(segments))
    }
}

impl fmt::Display for ParameterPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl Serialize for ParameterPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ParameterPath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_nested_path() {
        let path: ParameterPath = "device.config.0.value".parse().unwrap();
        assert_eq!(
            path.segments(),
            &[
                PathSegment::Key("device".into()),
                PathSegment::Key("config".into()),
                PathSegment::Index(0),
                PathSegment::Key("value".into()),
            ]
        );
        assert_eq!(path.parameter(), "device");
        assert_eq!(path.to_string(), "device.config.0.value");
    }

    #[test]
    fn builder_matches_parsed() {
        let built = ParameterPath::root("routine").key("actions").index(2);
        let parsed: ParameterPath = "routine.actions.2".parse().unwrap();
        assert_eq!(built, parsed);
        assert_eq!(built.depth(), 3);
    }

    #[test]
    fn reject_malformed_paths() {
        assert_eq!("".parse::<ParameterPath>(), Err(ParsePathError::Empty));
        assert_eq!(
            "room..name".parse::<ParameterPath>(),
            Err(ParsePathError::EmptySegment { position: 1 })
        );
        assert_eq!(
            "3.name".parse::<ParameterPath>(),
            Err(ParsePathError::LeadingIndex { index: 3 })
        );
    }

    #[test]
    fn serializes_as_string() {
        let path = ParameterPath::root("ids").index(4);
        assert_eq!(serde_json::to_string(&path).unwrap(), "\"ids.4\"");

        let parsed: ParameterPath = serde_json::from_str("\"ids.4\"").unwrap();
        assert_eq!(parsed, path);

        assert!(serde_json::from_str::<ParameterPath>("\"\"").is_err());
    }
}

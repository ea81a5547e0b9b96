//! Root-anchored, slash-delimited node paths

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A path through the document hierarchy, e.g. `/World/Models`
///
/// The root path `/` has no segments. Every other path is a sequence of
/// non-empty segments that never contain a `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodePath {
    segments: Vec<String>,
}

impl NodePath {
    /// The document root
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Parse a path string. Relative paths, empty segments and trailing
    /// slashes are rejected.
    pub fn parse(path: &str) -> Result<Self> {
        let Some(rest) = path.strip_prefix('/') else {
            return Err(CoreError::InvalidPath {
                path: path.to_string(),
                reason: "path must start with '/'",
            });
        };

        if rest.is_empty() {
            return Ok(Self::root());
        }

        let segments: Vec<String> = rest.split('/').map(str::to_string).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(CoreError::InvalidPath {
                path: path.to_string(),
                reason: "path contains an empty segment",
            });
        }

        Ok(Self { segments })
    }

    /// Build a path from individual segment names
    pub fn from_segments<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        segments
            .into_iter()
            .try_fold(Self::root(), |path, segment| path.child(segment))
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment, `None` for the root
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(|s| s.as_str())
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments below the root
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Parent path, `None` for the root
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }

        let mut parent_segments = self.segments.clone();
        parent_segments.pop();
        Some(Self {
            segments: parent_segments,
        })
    }

    /// Append a child segment
    pub fn child(&self, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() || name.contains('/') {
            return Err(CoreError::InvalidPath {
                path: format!("{}/{}", self.as_prefix(), name),
                reason: "segment must be non-empty and contain no '/'",
            });
        }

        let mut segments = self.segments.clone();
        segments.push(name);
        Ok(Self { segments })
    }

    /// Every non-root prefix of this path, shortest first, ending with the path itself
    pub fn prefixes(&self) -> Vec<NodePath> {
        (1..=self.segments.len())
            .map(|len| Self {
                segments: self.segments[..len].to_vec(),
            })
            .collect()
    }

    /// Whether `self` equals `ancestor` or lies below it
    pub fn starts_with(&self, ancestor: &NodePath) -> bool {
        self.segments.starts_with(&ancestor.segments)
    }

    fn as_prefix(&self) -> String {
        if self.is_root() {
            String::new()
        } else {
            self.to_string()
        }
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for NodePath {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NodePath {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<NodePath> for String {
    fn from(path: NodePath) -> Self {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let path = NodePath::parse("/World/Models/glass_Xform").unwrap();
        assert_eq!(path.depth(), 3);
        assert_eq!(path.name(), Some("glass_Xform"));
        assert_eq!(path.to_string(), "/World/Models/glass_Xform");

        let root = NodePath::parse("/").unwrap();
        assert!(root.is_root());
        assert_eq!(root.to_string(), "/");
        assert_eq!(root.name(), None);
    }

    #[test]
    fn test_malformed_paths_rejected() {
        assert!(NodePath::parse("World/Models").is_err());
        assert!(NodePath::parse("/World//Models").is_err());
        assert!(NodePath::parse("/World/").is_err());
        assert!(NodePath::parse("").is_err());
        assert!(NodePath::root().child("a/b").is_err());
        assert!(NodePath::root().child("").is_err());
    }

    #[test]
    fn test_parent_and_prefixes() {
        let path = NodePath::parse("/World/Models/Release_261").unwrap();
        assert_eq!(path.parent().unwrap().to_string(), "/World/Models");
        assert_eq!(NodePath::root().parent(), None);

        let prefixes: Vec<String> = path.prefixes().iter().map(|p| p.to_string()).collect();
        assert_eq!(
            prefixes,
            vec!["/World", "/World/Models", "/World/Models/Release_261"]
        );
    }

    #[test]
    fn test_starts_with() {
        let world = NodePath::parse("/World").unwrap();
        let models = NodePath::parse("/World/Models").unwrap();
        let worldly = NodePath::parse("/Worldly").unwrap();

        assert!(models.starts_with(&world));
        assert!(world.starts_with(&world));
        assert!(!worldly.starts_with(&world));
        assert!(world.starts_with(&NodePath::root()));
    }

    #[test]
    fn test_from_segments() {
        let path = NodePath::from_segments(["World", "Setup", "Lights"]).unwrap();
        assert_eq!(path.to_string(), "/World/Setup/Lights");
    }
}

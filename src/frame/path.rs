use std::fmt;

use serde::Serialize;

/// Sequence of column names locating a column through nested groups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub struct ColumnPath(Vec<String>);

impl ColumnPath {
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn parent(&self) -> Option<ColumnPath> {
        if self.0.is_empty() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    pub fn child(&self, name: impl Into<String>) -> ColumnPath {
        let mut names = self.0.clone();
        names.push(name.into());
        Self(names)
    }

    /// `self` followed by every name of `suffix`.
    pub fn join(&self, suffix: &ColumnPath) -> ColumnPath {
        let mut names = self.0.clone();
        names.extend(suffix.0.iter().cloned());
        Self(names)
    }

    pub fn starts_with(&self, prefix: &ColumnPath) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for ColumnPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

impl From<&str> for ColumnPath {
    fn from(name: &str) -> Self {
        Self(vec![name.to_string()])
    }
}

impl From<String> for ColumnPath {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl From<Vec<&str>> for ColumnPath {
    fn from(names: Vec<&str>) -> Self {
        Self(names.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for ColumnPath {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl From<&[&str]> for ColumnPath {
    fn from(names: &[&str]) -> Self {
        Self(names.iter().map(|n| n.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_navigation() {
        let path = ColumnPath::from(vec!["name", "first"]);
        assert_eq!(path.name(), Some("first"));
        assert_eq!(path.parent(), Some(ColumnPath::from("name")));
        assert_eq!(ColumnPath::from("name").child("first"), path);
        assert!(path.starts_with(&ColumnPath::from("name")));
        assert_eq!(path.to_string(), "name/first");
        assert_eq!(ColumnPath::root().parent(), None);
    }
}

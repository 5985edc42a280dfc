use serde::{Deserialize, Serialize};

use crate::frame::{Column, ColumnPath, DataFrame};

/// What a lookup does when the requested column does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingColumnPolicy {
    /// Raise a resolution error.
    #[default]
    Fail,
    /// Report the column as absent.
    Skip,
    /// Produce an empty placeholder column so evaluation can continue.
    Create,
}

/// Root frame and missing-column policy for one resolution.
pub struct ResolutionContext<'a> {
    frame: &'a DataFrame,
    policy: MissingColumnPolicy,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(frame: &'a DataFrame, policy: MissingColumnPolicy) -> Self {
        Self { frame, policy }
    }

    pub fn frame(&self) -> &'a DataFrame {
        self.frame
    }

    pub fn policy(&self) -> MissingColumnPolicy {
        self.policy
    }

    pub fn with_policy(&self, policy: MissingColumnPolicy) -> Self {
        Self {
            frame: self.frame,
            policy,
        }
    }
}

/// A column together with its path from the root frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumn {
    pub path: ColumnPath,
    pub column: Column,
}

impl ResolvedColumn {
    pub fn new(path: ColumnPath, column: Column) -> Self {
        Self { path, column }
    }

    pub fn name(&self) -> &str {
        self.column.name()
    }
}

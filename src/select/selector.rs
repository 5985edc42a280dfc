use std::collections::HashSet;
use std::fmt;

use crate::core::{FrameError, Result};
use crate::frame::{Column, ColumnPath, DataFrame};

use super::{ColumnFilter, MissingColumnPolicy, ResolutionContext, ResolvedColumn};

/// Anything that resolves to an ordered list of columns.
pub trait ColumnSet {
    fn resolve(&self, context: &ResolutionContext<'_>) -> Result<Vec<ResolvedColumn>>;
}

/// Anything that resolves to at most one column.
pub trait SingleColumn: ColumnSet {
    fn resolve_single(&self, context: &ResolutionContext<'_>) -> Result<Option<ResolvedColumn>>;
}

/// Positional access into a resolved column list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSpec {
    First,
    Last,
    At(usize),
    /// Exactly one column, anything else is an error.
    Single,
}

/// Column selection expression.
///
/// Results come out depth-first in frame declaration order, so the same
/// selector on the same frame always yields the same sequence.
#[derive(Debug, Clone)]
pub enum ColumnSelector {
    /// Column at a path from the root, through nested groups.
    Path(ColumnPath),
    /// Every top-level column.
    All,
    Union {
        items: Vec<ColumnSelector>,
        /// Drop later results whose path was already produced.
        distinct: bool,
    },
    /// Resolves `child` inside every group resolved by `parent`.
    Dive {
        parent: Box<ColumnSelector>,
        child: Box<ColumnSelector>,
    },
    /// Direct children of every resolved group.
    Children(Box<ColumnSelector>),
    /// Depth-first walk of every resolved column's subtree.
    Recursive {
        source: Box<ColumnSelector>,
        include_groups: bool,
        include_top_level: bool,
    },
    Filter {
        source: Box<ColumnSelector>,
        filter: ColumnFilter,
    },
    Indexed {
        source: Box<ColumnSelector>,
        index: IndexSpec,
    },
    Except {
        source: Box<ColumnSelector>,
        excluded: Box<ColumnSelector>,
    },
}

impl ColumnSelector {
    pub fn path(path: impl Into<ColumnPath>) -> Self {
        Self::Path(path.into())
    }

    pub fn all() -> Self {
        Self::All
    }

    pub fn union(items: Vec<ColumnSelector>) -> Self {
        Self::Union {
            items,
            distinct: false,
        }
    }

    pub fn union_distinct(items: Vec<ColumnSelector>) -> Self {
        Self::Union {
            items,
            distinct: true,
        }
    }

    /// Concatenation of `self` and `other`, flattening nested plain unions.
    pub fn and(self, other: ColumnSelector) -> Self {
        match self {
            Self::Union {
                mut items,
                distinct: false,
            } => {
                items.push(other);
                Self::union(items)
            }
            first => Self::union(vec![first, other]),
        }
    }

    pub fn dive(self, child: ColumnSelector) -> Self {
        Self::Dive {
            parent: Box::new(self),
            child: Box::new(child),
        }
    }

    pub fn children(self) -> Self {
        Self::Children(Box::new(self))
    }

    pub fn recursive(self, include_groups: bool, include_top_level: bool) -> Self {
        Self::Recursive {
            source: Box::new(self),
            include_groups,
            include_top_level,
        }
    }

    /// Every column of the frame at any depth, groups included.
    pub fn all_recursively() -> Self {
        Self::All.recursive(true, true)
    }

    pub fn filter(self, filter: ColumnFilter) -> Self {
        Self::Filter {
            source: Box::new(self),
            filter,
        }
    }

    pub fn at(self, index: IndexSpec) -> Self {
        Self::Indexed {
            source: Box::new(self),
            index,
        }
    }

    pub fn first(self) -> Self {
        self.at(IndexSpec::First)
    }

    pub fn last(self) -> Self {
        self.at(IndexSpec::Last)
    }

    pub fn single(self) -> Self {
        self.at(IndexSpec::Single)
    }

    pub fn except(self, excluded: ColumnSelector) -> Self {
        Self::Except {
            source: Box::new(self),
            excluded: Box::new(excluded),
        }
    }

    fn resolve_in(&self, context: &ResolutionContext<'_>) -> Result<Vec<ResolvedColumn>> {
        match self {
            Self::Path(path) => resolve_path(context, path),
            Self::All => Ok(top_level(context.frame(), &ColumnPath::root())),
            Self::Union { items, distinct } => {
                let mut out = Vec::new();
                let mut seen = HashSet::new();
                for item in items {
                    for resolved in item.resolve_in(context)? {
                        if !*distinct || seen.insert(resolved.path.clone()) {
                            out.push(resolved);
                        }
                    }
                }
                Ok(out)
            }
            Self::Dive { parent, child } => {
                let mut out = Vec::new();
                for resolved in parent.resolve_in(context)? {
                    let nested = match &resolved.column {
                        Column::Group(group) => group.frame().clone(),
                        _ if context.policy() == MissingColumnPolicy::Create
                            && resolved.column.is_empty() =>
                        {
                            DataFrame::empty()
                        }
                        _ => match context.policy() {
                            MissingColumnPolicy::Skip => continue,
                            _ => return Err(FrameError::NotAGroup(resolved.path)),
                        },
                    };
                    let nested_context = ResolutionContext::new(&nested, context.policy());
                    for inner in child.resolve_in(&nested_context)? {
                        out.push(ResolvedColumn::new(resolved.path.join(&inner.path), inner.column));
                    }
                }
                Ok(out)
            }
            Self::Children(source) => Ok(source
                .resolve_in(context)?
                .into_iter()
                .filter_map(|r| match &r.column {
                    Column::Group(group) => Some(top_level(group.frame(), &r.path)),
                    _ => None,
                })
                .flatten()
                .collect()),
            Self::Recursive {
                source,
                include_groups,
                include_top_level,
            } => {
                let mut out = Vec::new();
                for resolved in source.resolve_in(context)? {
                    walk(resolved, *include_groups, *include_top_level, &mut out);
                }
                Ok(out)
            }
            Self::Filter { source, filter } => Ok(source
                .resolve_in(context)?
                .into_iter()
                .filter(|r| filter.test(r))
                .collect()),
            Self::Indexed { source, index } => {
                let resolved = source.resolve_in(context)?;
                Ok(self.pick(resolved, *index, context)?.into_iter().collect())
            }
            Self::Except { source, excluded } => {
                let excluded = excluded.resolve_in(&context.with_policy(MissingColumnPolicy::Skip))?;
                Ok(source
                    .resolve_in(context)?
                    .into_iter()
                    .filter(|r| !excluded.iter().any(|e| r.path.starts_with(&e.path)))
                    .collect())
            }
        }
    }

    fn pick(
        &self,
        mut resolved: Vec<ResolvedColumn>,
        index: IndexSpec,
        context: &ResolutionContext<'_>,
    ) -> Result<Option<ResolvedColumn>> {
        let count = resolved.len();
        let picked = match index {
            IndexSpec::First => resolved.into_iter().next(),
            IndexSpec::Last => resolved.pop(),
            IndexSpec::At(i) => resolved.into_iter().nth(i),
            IndexSpec::Single if count > 1 => {
                return match context.policy() {
                    MissingColumnPolicy::Skip => Ok(None),
                    _ => Err(FrameError::Ambiguous {
                        selector: self.to_string(),
                        count,
                    }),
                };
            }
            IndexSpec::Single => resolved.pop(),
        };
        if picked.is_some() {
            return Ok(picked);
        }
        match context.policy() {
            MissingColumnPolicy::Fail => Err(FrameError::NoSuchElement {
                selector: self.to_string(),
            }),
            MissingColumnPolicy::Skip => Ok(None),
            MissingColumnPolicy::Create => {
                log::debug!("{} resolved to nothing, using a placeholder column", self);
                Ok(Some(ResolvedColumn::new(ColumnPath::root(), Column::placeholder())))
            }
        }
    }
}

fn resolve_path(context: &ResolutionContext<'_>, path: &ColumnPath) -> Result<Vec<ResolvedColumn>> {
    let Some((last, parents)) = path.names().split_last() else {
        return missing(context, path);
    };
    let mut frame = context.frame();
    for (depth, name) in parents.iter().enumerate() {
        match frame.column(name) {
            Some(Column::Group(group)) => frame = group.frame(),
            Some(_) if context.policy() == MissingColumnPolicy::Fail => {
                return Err(FrameError::NotAGroup(ColumnPath::new(
                    path.names()[..=depth].to_vec(),
                )));
            }
            _ => return missing(context, path),
        }
    }
    match frame.column(last) {
        Some(column) => Ok(vec![ResolvedColumn::new(path.clone(), column.clone())]),
        None => missing(context, path),
    }
}

fn missing(context: &ResolutionContext<'_>, path: &ColumnPath) -> Result<Vec<ResolvedColumn>> {
    match context.policy() {
        MissingColumnPolicy::Fail => Err(FrameError::ColumnNotFound(path.clone())),
        MissingColumnPolicy::Skip => Ok(Vec::new()),
        MissingColumnPolicy::Create => {
            log::debug!("Column '{}' not found, creating an empty column", path);
            let column = match path.name() {
                Some(name) => Column::empty(name),
                None => Column::placeholder(),
            };
            Ok(vec![ResolvedColumn::new(path.clone(), column)])
        }
    }
}

fn top_level(frame: &DataFrame, prefix: &ColumnPath) -> Vec<ResolvedColumn> {
    frame
        .columns()
        .iter()
        .filter(|c| !c.is_placeholder())
        .map(|c| ResolvedColumn::new(prefix.child(c.name()), c.clone()))
        .collect()
}

/// Pre-order walk with an explicit stack. Children are pushed in reverse so
/// they pop in declaration order.
fn walk(
    root: ResolvedColumn,
    include_groups: bool,
    include_top_level: bool,
    out: &mut Vec<ResolvedColumn>,
) {
    let mut stack = vec![(root, 0usize)];
    while let Some((resolved, depth)) = stack.pop() {
        let children = match &resolved.column {
            Column::Group(group) => top_level(group.frame(), &resolved.path),
            _ => Vec::new(),
        };
        let is_group = resolved.column.as_group().is_some();
        let visible = (include_top_level || depth > 0) && (include_groups || !is_group);
        stack.extend(children.into_iter().rev().map(|c| (c, depth + 1)));
        if visible {
            out.push(resolved);
        }
    }
}

impl ColumnSet for ColumnSelector {
    fn resolve(&self, context: &ResolutionContext<'_>) -> Result<Vec<ResolvedColumn>> {
        self.resolve_in(context)
    }
}

impl SingleColumn for ColumnSelector {
    fn resolve_single(&self, context: &ResolutionContext<'_>) -> Result<Option<ResolvedColumn>> {
        let resolved = self.resolve_in(context)?;
        match self {
            Self::Path(_) | Self::Indexed { .. } => Ok(resolved.into_iter().next()),
            _ => self.pick(resolved, IndexSpec::Single, context),
        }
    }
}

impl From<&str> for ColumnSelector {
    fn from(path: &str) -> Self {
        Self::path(path)
    }
}

impl From<ColumnPath> for ColumnSelector {
    fn from(path: ColumnPath) -> Self {
        Self::Path(path)
    }
}

impl fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "col(\"{}\")", path),
            Self::All => write!(f, "all()"),
            Self::Union { items, distinct } => {
                write!(f, "{}(", if *distinct { "distinct" } else { "union" })?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            Self::Dive { parent, child } => write!(f, "{}.dive({})", parent, child),
            Self::Children(source) => write!(f, "{}.children()", source),
            Self::Recursive {
                source,
                include_groups,
                include_top_level,
            } => write!(
                f,
                "{}.recursive(groups = {}, topLevel = {})",
                source, include_groups, include_top_level
            ),
            Self::Filter { source, filter } => write!(f, "{}.filter({})", source, filter),
            Self::Indexed { source, index } => match index {
                IndexSpec::First => write!(f, "{}.first()", source),
                IndexSpec::Last => write!(f, "{}.last()", source),
                IndexSpec::At(i) => write!(f, "{}[{}]", source, i),
                IndexSpec::Single => write!(f, "{}.single()", source),
            },
            Self::Except { source, excluded } => write!(f, "{}.except({})", source, excluded),
        }
    }
}

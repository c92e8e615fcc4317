//! Constraint resolution: which tool versions a repository requires.
//!
//! Each supported [`Tool`] has a resolver module reading that ecosystem's
//! manifests. Missing files mean "no constraint"; unreadable or malformed
//! ones are errors.

pub mod mvn;
pub mod pipenv;
pub mod poetry;

use crate::error::{ResolveError, Result};
use runinstall_common::{Tool, ToolConstraint};
use std::io::ErrorKind;
use std::path::Path;

/// Derives required tool versions from repository contents.
#[allow(async_fn_in_trait)]
pub trait ConstraintResolver {
    async fn resolve(&self, tool: Tool, cwd: &Path) -> Result<Vec<ToolConstraint>>;
}

/// Resolver reading the manifests in the working directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct RepositoryResolver;

impl ConstraintResolver for RepositoryResolver {
    async fn resolve(&self, tool: Tool, cwd: &Path) -> Result<Vec<ToolConstraint>> {
        match tool {
            Tool::Mvn => mvn::tool_constraints(cwd).await,
            Tool::Pipenv => pipenv::tool_constraints(cwd).await,
            Tool::Poetry => poetry::tool_constraints(cwd).await,
        }
    }
}

/// Read a file, mapping "not found" to `None`.
pub(crate) async fn read_optional(path: &Path) -> Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ResolveError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Parse a TOML manifest into a table.
pub(crate) fn parse_toml(path: &Path, contents: &str) -> Result<toml::Table> {
    toml::from_str::<toml::Table>(contents).map_err(|source| ResolveError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

/// Walk a dotted key through nested TOML tables.
///
/// `Ok(None)` when any segment is absent; an error when the final value is
/// present but not a string.
pub(crate) fn toml_string(table: &toml::Table, path: &Path, keys: &[&str]) -> Result<Option<String>> {
    let Some((last, parents)) = keys.split_last() else {
        return Ok(None);
    };

    let mut current = table;
    for key in parents {
        match current.get(*key).and_then(toml::Value::as_table) {
            Some(next) => current = next,
            None => return Ok(None),
        }
    }

    match current.get(*last) {
        None => Ok(None),
        Some(toml::Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(_) => Err(ResolveError::InvalidField {
            path: path.to_path_buf(),
            field: keys.join("."),
            expected: "string".to_string(),
        }),
    }
}

//! Pipenv constraints: the Python version a Pipfile requires.

use super::{parse_toml, read_optional, toml_string};
use crate::error::{ResolveError, Result};
use runinstall_common::{ConstraintTool, ToolConstraint};
use std::path::Path;

const PIPFILE: &str = "Pipfile";
const PIPFILE_LOCK: &str = "Pipfile.lock";

pub async fn tool_constraints(cwd: &Path) -> Result<Vec<ToolConstraint>> {
    let pipfile_path = cwd.join(PIPFILE);
    if let Some(contents) = read_optional(&pipfile_path).await? {
        let pipfile = parse_toml(&pipfile_path, &contents)?;
        let python = match toml_string(&pipfile, &pipfile_path, &["requires", "python_full_version"])? {
            Some(full) => Some(full),
            None => toml_string(&pipfile, &pipfile_path, &["requires", "python_version"])?,
        };
        if let Some(python) = python.filter(|v| !v.is_empty()) {
            return Ok(vec![
                ToolConstraint::new(ConstraintTool::Python, python).with_source(PIPFILE),
            ]);
        }
    }

    let lock_path = cwd.join(PIPFILE_LOCK);
    if let Some(contents) = read_optional(&lock_path).await?
        && let Some(python) = lock_python_version(&lock_path, &contents)?
    {
        return Ok(vec![
            ToolConstraint::new(ConstraintTool::Python, python).with_source(PIPFILE_LOCK),
        ]);
    }

    Ok(Vec::new())
}

/// Python version recorded in `Pipfile.lock` `_meta.requires`.
fn lock_python_version(path: &Path, contents: &str) -> Result<Option<String>> {
    let lock: serde_json::Value = serde_json::from_str(contents).map_err(|source| ResolveError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let requires = &lock["_meta"]["requires"];
    Ok(["python_full_version", "python_version"]
        .iter()
        .find_map(|key| requires[*key].as_str())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string))
}

//! Poetry constraints: Python from `pyproject.toml`, Poetry from the lock header.

use super::{parse_toml, read_optional, toml_string};
use crate::error::Result;
use regex::Regex;
use runinstall_common::{ConstraintTool, ToolConstraint};
use std::path::Path;
use std::sync::LazyLock;

const PYPROJECT: &str = "pyproject.toml";
const POETRY_LOCK: &str = "poetry.lock";

static LOCK_GENERATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@generated by Poetry ([0-9][0-9A-Za-z.+\-]*)").unwrap());

pub async fn tool_constraints(cwd: &Path) -> Result<Vec<ToolConstraint>> {
    let mut constraints = Vec::new();

    let pyproject_path = cwd.join(PYPROJECT);
    if let Some(contents) = read_optional(&pyproject_path).await? {
        let pyproject = parse_toml(&pyproject_path, &contents)?;
        let python = match toml_string(&pyproject, &pyproject_path, &["tool", "poetry", "dependencies", "python"])? {
            Some(python) => Some(python),
            None => toml_string(&pyproject, &pyproject_path, &["project", "requires-python"])?,
        };
        if let Some(python) = python {
            constraints.push(ToolConstraint::new(ConstraintTool::Python, python).with_source(PYPROJECT));
        }
    }

    if let Some(lock) = read_optional(&cwd.join(POETRY_LOCK)).await?
        && let Some(version) = lock_poetry_version(&lock)
    {
        constraints.push(ToolConstraint::new(ConstraintTool::Poetry, version).with_source(POETRY_LOCK));
    }

    Ok(constraints)
}

/// Poetry version named in the lock file's generator comment.
pub fn lock_poetry_version(lock: &str) -> Option<String> {
    lock.lines()
        .take_while(|line| line.starts_with('#') || line.trim().is_empty())
        .find_map(|line| LOCK_GENERATOR.captures(line))
        .map(|caps| caps[1].to_string())
}

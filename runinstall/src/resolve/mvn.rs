//! Maven constraints: the wrapper's Maven distribution and the POM's Java level.

use super::read_optional;
use crate::error::Result;
use regex::Regex;
use runinstall_common::{ConstraintTool, ToolConstraint};
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

const WRAPPER_PROPERTIES: &str = ".mvn/wrapper/maven-wrapper.properties";
const POM: &str = "pom.xml";

/// POM properties naming the Java level, most specific first.
const JAVA_PROPERTIES: &[&str] = &["maven.compiler.release", "maven.compiler.source", "java.version"];

static DISTRIBUTION_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"apache-maven-([0-9][0-9A-Za-z.\-]*?)-bin\.(?:zip|tar\.gz)").unwrap());

pub async fn tool_constraints(cwd: &Path) -> Result<Vec<ToolConstraint>> {
    let mut constraints = Vec::new();

    if let Some(properties) = read_optional(&cwd.join(WRAPPER_PROPERTIES)).await? {
        match maven_version(&properties) {
            Some(version) => constraints.push(
                ToolConstraint::new(ConstraintTool::Maven, version).with_source(WRAPPER_PROPERTIES),
            ),
            None => debug!("No Maven distribution version in {}", WRAPPER_PROPERTIES),
        }
    }

    if let Some(pom) = read_optional(&cwd.join(POM)).await?
        && let Some(java) = java_version(&pom)
    {
        constraints.push(ToolConstraint::new(ConstraintTool::Java, java).with_source(POM));
    }

    Ok(constraints)
}

/// Maven version from the wrapper's `distributionUrl`.
pub fn maven_version(properties: &str) -> Option<String> {
    let url = property(properties, "distributionUrl")?;
    DISTRIBUTION_VERSION
        .captures(&url)
        .map(|caps| caps[1].to_string())
}

/// Look up a key in Java `.properties` text.
fn property(properties: &str, key: &str) -> Option<String> {
    properties
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
        .filter_map(|line| {
            let split = line.find(['=', ':'])?;
            Some((line[..split].trim(), line[split + 1..].trim()))
        })
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.replace("\\:", ":").replace("\\=", "="))
}

/// Java level from the POM's properties.
///
/// Property references (`${...}`) are skipped, and legacy `1.x` levels are
/// reported as `x`.
pub fn java_version(pom: &str) -> Option<String> {
    JAVA_PROPERTIES.iter().find_map(|name| {
        let escaped = regex::escape(name);
        let re = Regex::new(&format!(r"<{escaped}>\s*([^<\s]+)\s*</{escaped}>")).ok()?;
        let value = re.captures(pom)?[1].to_string();
        if value.starts_with("${") {
            return None;
        }
        Some(match value.strip_prefix("1.") {
            Some(legacy) if !legacy.is_empty() => legacy.to_string(),
            _ => value,
        })
    })
}

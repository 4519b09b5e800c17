//! Launcher templates.
//!
//! One template file plus a list of named targets yields one rendered file per
//! target (run configurations, wrapper scripts). Supported placeholders:
//!
//! - `{{ name }}`, `{{ entry_point }}`, `{{ arguments }}`
//! - `{{ env.KEY }}` for a single run-environment variable
//! - `{{ env_entries }}` for every variable as `KEY=value` lines

use cura_recipe_core::{RecipeError, RecipeResult, RunEnvironment};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Template suffixes dropped from the output file name.
const TEMPLATE_SUFFIXES: [&str; 2] = [".jinja", ".tpl"];

/// A named program entry to render a launcher for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherTarget {
    pub name: String,
    pub entry_point: String,
    pub arguments: String,
}

/// Target string is not `name:entry_point[:arguments]`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid launcher target '{0}' (expected name:entry_point[:arguments])")]
pub struct TargetParseError(String);

impl FromStr for LauncherTarget {
    type Err = TargetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let name = parts.next().unwrap_or_default().trim();
        let entry_point = parts.next().unwrap_or_default().trim();
        let arguments = parts.next().unwrap_or_default().trim();

        if !is_file_stem(name) || entry_point.is_empty() {
            return Err(TargetParseError(s.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            entry_point: entry_point.to_string(),
            arguments: arguments.to_string(),
        })
    }
}

/// Target names become file names inside the output directory.
fn is_file_stem(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

impl fmt::Display for LauncherTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.name, self.entry_point, self.arguments)
    }
}

/// Render `template` once per target into `output_dir`.
///
/// Returns the written paths in target order.
pub fn render_launchers(
    template: &Path,
    targets: &[LauncherTarget],
    environment: &RunEnvironment,
    output_dir: &Path,
) -> RecipeResult<Vec<PathBuf>> {
    let text = match std::fs::read_to_string(template) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(RecipeError::TemplateNotFound {
                path: template.to_path_buf(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    std::fs::create_dir_all(output_dir)?;
    let suffix = output_suffix(template);

    targets
        .iter()
        .map(|target| -> RecipeResult<PathBuf> {
            if !is_file_stem(&target.name) {
                return Err(RecipeError::InvalidTemplate {
                    path: template.to_path_buf(),
                    reason: format!("launcher name '{}' is not a plain file name", target.name),
                });
            }
            let rendered = render_template(&text, target, environment)
                .map_err(|reason| RecipeError::InvalidTemplate {
                    path: template.to_path_buf(),
                    reason,
                })?;
            let path = output_dir.join(format!("{}{suffix}", target.name));
            std::fs::write(&path, rendered)?;
            tracing::debug!(launcher = %target.name, path = %path.display(), "Rendered launcher");
            Ok(path)
        })
        .collect()
}

/// Extensions of the template file name after dropping a template suffix.
fn output_suffix(template: &Path) -> String {
    let file_name = template
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = TEMPLATE_SUFFIXES
        .iter()
        .find_map(|suffix| file_name.strip_suffix(suffix))
        .unwrap_or(file_name.as_str());
    stem.find('.')
        .map(|dot| stem[dot..].to_string())
        .unwrap_or_default()
}

fn render_template(
    text: &str,
    target: &LauncherTarget,
    environment: &RunEnvironment,
) -> Result<String, String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let close = after
            .find("}}")
            .ok_or_else(|| "unclosed '{{' placeholder".to_string())?;
        let key = after[..close].trim();
        out.push_str(&placeholder_value(key, target, environment)?);
        rest = &after[close + 2..];
    }
    out.push_str(rest);
    Ok(out)
}

fn placeholder_value(
    key: &str,
    target: &LauncherTarget,
    environment: &RunEnvironment,
) -> Result<String, String> {
    match key {
        "name" => Ok(target.name.clone()),
        "entry_point" => Ok(target.entry_point.clone()),
        "arguments" => Ok(target.arguments.clone()),
        "env_entries" => Ok(environment
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("\n")),
        _ => {
            let variable = key
                .strip_prefix("env.")
                .ok_or_else(|| format!("unknown placeholder '{key}'"))?;
            environment
                .get(variable)
                .map(str::to_string)
                .ok_or_else(|| format!("environment has no variable '{variable}'"))
        }
    }
}

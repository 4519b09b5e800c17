//! Option domains and option resolution.
//!
//! Resolution never touches the descriptor: defaults and caller overrides are
//! merged into a fresh [`ResolvedOptions`] snapshot owned by one invocation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::descriptor::PackageDescriptor;
use crate::error::{RecipeError, RecipeResult};

/// Set of values an option accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum OptionDomain {
    /// Any string, e.g. a version number
    Any,
    /// `true` or `false`
    Boolean,
    /// One of an enumerated list
    Choices(Vec<String>),
}

impl OptionDomain {
    /// Normalize `value` into this domain, or `None` if it does not belong.
    ///
    /// Booleans are matched case-insensitively and normalized to lowercase.
    pub fn normalize(&self, value: &str) -> Option<String> {
        match self {
            Self::Any => Some(value.to_string()),
            Self::Boolean => parse_bool(value).map(|b| b.to_string()),
            Self::Choices(choices) => choices.iter().find(|c| *c == value).cloned(),
        }
    }

    /// Whether `value` is already a canonical member of this domain.
    pub fn contains(&self, value: &str) -> bool {
        self.normalize(value).is_some_and(|v| v == value)
    }
}

impl fmt::Display for OptionDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "ANY"),
            Self::Boolean => write!(f, "[true, false]"),
            Self::Choices(choices) => write!(f, "[{}]", choices.join(", ")),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Fully resolved option values for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedOptions(BTreeMap<String, String>);

impl ResolvedOptions {
    /// Value of an option, if it resolved to one.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Boolean view of an option. Absent or non-boolean values read as false.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(parse_bool).unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying map.
    pub const fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

impl FromIterator<(String, String)> for ResolvedOptions {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Merge descriptor defaults with caller overrides. Overrides win.
pub fn resolve_options(
    descriptor: &PackageDescriptor,
    overrides: &BTreeMap<String, String>,
) -> RecipeResult<ResolvedOptions> {
    let mut resolved = BTreeMap::new();

    for (name, value) in &descriptor.default_options {
        let domain = domain_of(descriptor, name)?;
        resolved.insert(name.clone(), normalize(name, domain, value)?);
    }

    for (name, value) in overrides {
        let domain = domain_of(descriptor, name)?;
        let value = normalize(name, domain, value)?;
        tracing::debug!(option = %name, %value, "Applying option override");
        resolved.insert(name.clone(), value);
    }

    Ok(ResolvedOptions(resolved))
}

fn domain_of<'a>(descriptor: &'a PackageDescriptor, name: &str) -> RecipeResult<&'a OptionDomain> {
    descriptor
        .options
        .get(name)
        .ok_or_else(|| RecipeError::UnknownOption {
            name: name.to_string(),
        })
}

fn normalize(name: &str, domain: &OptionDomain, value: &str) -> RecipeResult<String> {
    domain
        .normalize(value)
        .ok_or_else(|| RecipeError::InvalidOptionValue {
            name: name.to_string(),
            value: value.to_string(),
            expected: domain.to_string(),
        })
}

/// Parse a `key=value` override as given on the command line.
pub fn parse_override(raw: &str) -> RecipeResult<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| RecipeError::InvalidOverride(raw.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(RecipeError::InvalidOverride(raw.to_string()));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// Parse a list of `key=value` overrides. Later entries win.
pub fn parse_overrides<S: AsRef<str>>(raw: &[S]) -> RecipeResult<BTreeMap<String, String>> {
    raw.iter().map(|s| parse_override(s.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::cura_descriptor;

    fn overrides(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_no_overrides_yields_defaults() {
        let descriptor = cura_descriptor();
        let resolved = resolve_options(&descriptor, &BTreeMap::new()).unwrap();
        assert_eq!(resolved.as_map(), &descriptor.default_options);
    }

    #[test]
    fn test_override_wins_over_default() {
        let descriptor = cura_descriptor();
        let resolved =
            resolve_options(&descriptor, &overrides(&[("python_version", "3.10")])).unwrap();
        assert_eq!(resolved.get("python_version"), Some("3.10"));
        assert_eq!(resolved.get("staging"), Some("false"));
    }

    #[test]
    fn test_boolean_override_is_normalized() {
        let descriptor = cura_descriptor();
        let resolved = resolve_options(&descriptor, &overrides(&[("enterprise", "True")])).unwrap();
        assert_eq!(resolved.get("enterprise"), Some("true"));
        assert!(resolved.flag("enterprise"));
    }

    #[test]
    fn test_unknown_override_is_rejected() {
        let descriptor = cura_descriptor();
        let err = resolve_options(&descriptor, &overrides(&[("shared", "true")])).unwrap_err();
        assert!(matches!(err, RecipeError::UnknownOption { name } if name == "shared"));
    }

    #[test]
    fn test_out_of_domain_value_is_rejected() {
        let descriptor = cura_descriptor();
        let err = resolve_options(&descriptor, &overrides(&[("staging", "maybe")])).unwrap_err();
        assert!(matches!(
            err,
            RecipeError::InvalidOptionValue { ref name, ref value, .. }
                if name == "staging" && value == "maybe"
        ));
    }

    #[test]
    fn test_resolved_values_stay_in_domain() {
        let descriptor = cura_descriptor();
        for value in ["true", "TRUE", "false", "False"] {
            let resolved =
                resolve_options(&descriptor, &overrides(&[("staging", value), ("enterprise", value)]))
                    .unwrap();
            for (name, value) in resolved.iter() {
                assert!(descriptor.options[name].contains(value), "{name}={value}");
            }
        }
    }

    #[test]
    fn test_choices_domain() {
        let domain = OptionDomain::Choices(vec!["Release".into(), "Debug".into()]);
        assert_eq!(domain.normalize("Debug"), Some("Debug".to_string()));
        assert_eq!(domain.normalize("debug"), None);
        assert_eq!(domain.to_string(), "[Release, Debug]");
    }

    #[test]
    fn test_flag_defaults_to_false_when_absent() {
        let resolved = ResolvedOptions::default();
        assert!(!resolved.flag("staging"));
    }

    #[test]
    fn test_parse_override() {
        assert_eq!(
            parse_override("staging=true").unwrap(),
            ("staging".to_string(), "true".to_string())
        );
        assert_eq!(
            parse_override("python_version = 3.10").unwrap(),
            ("python_version".to_string(), "3.10".to_string())
        );
        assert!(matches!(
            parse_override("staging"),
            Err(RecipeError::InvalidOverride(_))
        ));
        assert!(matches!(
            parse_override("=true"),
            Err(RecipeError::InvalidOverride(_))
        ));
    }

    #[test]
    fn test_parse_overrides_later_entry_wins() {
        let parsed = parse_overrides(&["staging=true", "staging=false"]).unwrap();
        assert_eq!(parsed.get("staging").map(String::as_str), Some("false"));
    }
}

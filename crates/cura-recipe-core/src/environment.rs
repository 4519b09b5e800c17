//! Run-environment rendering.
//!
//! The environment handed to the application at runtime is a pure function of
//! the package name and two boolean options.

use serde::{Serialize, Serializer};
use serde::ser::SerializeMap;

use crate::builtin::{ENTERPRISE_OPTION, STAGING_OPTION};
use crate::descriptor::PackageDescriptor;
use crate::options::ResolvedOptions;

pub const APP_DISPLAY_NAME: &str = "APP_DISPLAY_NAME";
pub const APP_VERSION: &str = "APP_VERSION";
pub const APP_BUILD_TYPE: &str = "APP_BUILD_TYPE";
pub const CLOUD_API_ROOT: &str = "CLOUD_API_ROOT";
pub const CLOUD_ACCOUNT_API_ROOT: &str = "CLOUD_ACCOUNT_API_ROOT";
pub const DIGITAL_FACTORY_URL: &str = "DIGITAL_FACTORY_URL";

/// Rolling version label. Not derived from the package version.
pub const APP_VERSION_LABEL: &str = "master";

/// Build type reported when the enterprise option is on.
pub const ENTERPRISE_BUILD_TYPE: &str = "Enterprise";

/// Infix appended to the leading host label of every service URL.
pub const STAGING_INFIX: &str = "-staging";

const SERVICE_DOMAIN: &str = "ultimaker.com";

/// A service endpoint whose host switches between production and staging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub variable: &'static str,
    pub host_label: &'static str,
}

impl Endpoint {
    /// `https://<label>[-staging].ultimaker.com`
    pub fn url(&self, staging: bool) -> String {
        let infix = if staging { STAGING_INFIX } else { "" };
        format!("https://{}{infix}.{SERVICE_DOMAIN}", self.host_label)
    }
}

pub const ENDPOINTS: [Endpoint; 3] = [
    Endpoint {
        variable: CLOUD_API_ROOT,
        host_label: "api",
    },
    Endpoint {
        variable: CLOUD_ACCOUNT_API_ROOT,
        host_label: "account",
    },
    Endpoint {
        variable: DIGITAL_FACTORY_URL,
        host_label: "digitalfactory",
    },
];

/// Ordered environment variable assignments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunEnvironment(Vec<(String, String)>);

impl RunEnvironment {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
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

    fn push(&mut self, name: &str, value: impl Into<String>) {
        self.0.push((name.to_string(), value.into()));
    }

    /// POSIX shell script exporting every variable.
    pub fn to_shell_script(&self) -> String {
        let mut script = String::from("#!/bin/sh\n");
        for (name, value) in self.iter() {
            script.push_str(&format!("export {name}=\"{}\"\n", escape_shell(value)));
        }
        script
    }

    /// Windows batch script setting every variable.
    pub fn to_batch_script(&self) -> String {
        let mut script = String::from("@echo off\r\n");
        for (name, value) in self.iter() {
            script.push_str(&format!("set \"{name}={}\"\r\n", escape_batch(value)));
        }
        script
    }
}

fn escape_shell(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escape a value placed inside `set "NAME=value"`.
///
/// `%` is doubled. An embedded `"` toggles cmd's quote state, so
/// metacharacters that end up outside quotes are caret-escaped.
fn escape_batch(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let mut quoted = true;
    for c in value.chars() {
        match c {
            '%' => escaped.push_str("%%"),
            '"' => {
                quoted = !quoted;
                escaped.push(c);
            }
            '&' | '|' | '<' | '>' | '^' | '(' | ')' if !quoted => {
                escaped.push('^');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

impl Serialize for RunEnvironment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Render the run environment from resolved options.
pub fn render_environment(
    descriptor: &PackageDescriptor,
    resolved: &ResolvedOptions,
) -> RunEnvironment {
    let enterprise = resolved.flag(ENTERPRISE_OPTION);
    let staging = resolved.flag(STAGING_OPTION);

    let mut env = RunEnvironment::default();
    env.push(APP_DISPLAY_NAME, descriptor.name.as_str());
    env.push(APP_VERSION, APP_VERSION_LABEL);
    env.push(
        APP_BUILD_TYPE,
        if enterprise { ENTERPRISE_BUILD_TYPE } else { "" },
    );
    for endpoint in ENDPOINTS {
        env.push(endpoint.variable, endpoint.url(staging));
    }

    tracing::debug!(enterprise, staging, "Rendered run environment");
    env
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::cura_descriptor;
    use crate::options::resolve_options;
    use std::collections::BTreeMap;

    fn render(enterprise: bool, staging: bool) -> RunEnvironment {
        let descriptor = cura_descriptor();
        let overrides = BTreeMap::from([
            (ENTERPRISE_OPTION.to_string(), enterprise.to_string()),
            (STAGING_OPTION.to_string(), staging.to_string()),
        ]);
        let resolved = resolve_options(&descriptor, &overrides).unwrap();
        render_environment(&descriptor, &resolved)
    }

    #[test]
    fn test_enterprise_staging_scenario() {
        let env = render(true, true);
        assert_eq!(env.get(APP_BUILD_TYPE), Some("Enterprise"));
        assert_eq!(
            env.get(CLOUD_API_ROOT),
            Some("https://api-staging.ultimaker.com")
        );
    }

    #[test]
    fn test_production_scenario() {
        let env = render(false, false);
        assert_eq!(env.get(APP_BUILD_TYPE), Some(""));
        assert_eq!(env.get(CLOUD_API_ROOT), Some("https://api.ultimaker.com"));
    }

    #[test]
    fn test_staging_infix_follows_leading_host_label_only() {
        let env = render(false, true);
        for endpoint in ENDPOINTS {
            let url = env.get(endpoint.variable).unwrap();
            let host = url.strip_prefix("https://").unwrap();
            let (label, rest) = host.split_once('.').unwrap();
            assert_eq!(label, format!("{}{STAGING_INFIX}", endpoint.host_label));
            assert!(!rest.contains(STAGING_INFIX), "{url}");
            assert_eq!(url.matches(STAGING_INFIX).count(), 1, "{url}");
        }
    }

    #[test]
    fn test_no_staging_infix_in_production() {
        let env = render(true, false);
        for endpoint in ENDPOINTS {
            assert!(!env.get(endpoint.variable).unwrap().contains(STAGING_INFIX));
        }
    }

    #[test]
    fn test_constant_entries_and_order() {
        let env = render(false, false);
        assert_eq!(env.get(APP_DISPLAY_NAME), Some("Cura"));
        assert_eq!(env.get(APP_VERSION), Some(APP_VERSION_LABEL));
        let names: Vec<_> = env.iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            [
                APP_DISPLAY_NAME,
                APP_VERSION,
                APP_BUILD_TYPE,
                CLOUD_API_ROOT,
                CLOUD_ACCOUNT_API_ROOT,
                DIGITAL_FACTORY_URL,
            ]
        );
    }

    #[test]
    fn test_missing_flags_read_as_false() {
        let mut descriptor = cura_descriptor();
        descriptor.options.remove(STAGING_OPTION);
        descriptor.default_options.remove(STAGING_OPTION);
        let resolved = resolve_options(&descriptor, &BTreeMap::new()).unwrap();
        let env = render_environment(&descriptor, &resolved);
        assert_eq!(env.get(CLOUD_API_ROOT), Some("https://api.ultimaker.com"));
    }

    #[test]
    fn test_shell_script_escapes_values() {
        let mut env = RunEnvironment::default();
        env.push("GREETING", "say \"hi\" to $USER");
        assert_eq!(
            env.to_shell_script(),
            "#!/bin/sh\nexport GREETING=\"say \\\"hi\\\" to \\$USER\"\n"
        );
    }

    #[test]
    fn test_batch_script_and_json() {
        let env = render(true, false);
        let batch = env.to_batch_script();
        assert!(batch.starts_with("@echo off\r\n"));
        assert!(batch.contains("set \"APP_BUILD_TYPE=Enterprise\"\r\n"));

        let json = serde_json::to_string(&env).unwrap();
        assert!(json.starts_with("{\"APP_DISPLAY_NAME\":\"Cura\""));
    }

    #[test]
    fn test_batch_script_escapes_values() {
        let mut env = RunEnvironment::default();
        env.push("PROGRESS", "100%");
        env.push("QUOTED", "say \"a&b\" & c");
        assert_eq!(
            env.to_batch_script(),
            "@echo off\r\n\
             set \"PROGRESS=100%%\"\r\n\
             set \"QUOTED=say \"a^&b\" & c\"\r\n"
        );
    }
}

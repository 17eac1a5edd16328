//! Config overrides taken from the environment.
//!
//! A variable named `chia.<path>` sets the field at that dotted path, for
//! example `chia.full_node.port=58444`. Shells that refuse dots in variable
//! names can use `chia__full_node__port=58444` instead.

use serde_yaml::Value;

use crate::{ConfigDocument, ConfigError, FieldPath, LeafPolicy};

/// Prefix of a dotted override variable.
pub const DOTTED_PREFIX: &str = "chia.";

/// Prefix of an override variable using `__` between segments.
pub const UNDERSCORE_PREFIX: &str = "chia__";

/// One field override read from an environment variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvOverride {
    /// The variable it came from.
    pub var: String,
    pub path: FieldPath,
    /// The value as written, before coercion to the field's kind.
    pub raw: String,
}

/// Collect overrides from `(name, value)` pairs, sorted by variable name.
/// Variables without an override prefix are ignored.
pub fn parse_env_overrides<I, K, V>(vars: I) -> Result<Vec<EnvOverride>, ConfigError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut overrides = Vec::new();
    for (var, raw) in vars {
        let var = var.into();
        let dotted = if let Some(rest) = var.strip_prefix(DOTTED_PREFIX) {
            rest.to_string()
        } else if let Some(rest) = var.strip_prefix(UNDERSCORE_PREFIX) {
            rest.replace("__", ".")
        } else {
            continue;
        };
        let path = FieldPath::parse(&dotted).map_err(|e| ConfigError::env(&var, e))?;
        overrides.push(EnvOverride {
            var,
            path,
            raw: raw.into(),
        });
    }
    overrides.sort_by(|a, b| a.var.cmp(&b.var));
    Ok(overrides)
}

/// Overrides from the process environment. Variables whose name or value is
/// not valid UTF-8 are skipped.
pub fn env_overrides() -> Result<Vec<EnvOverride>, ConfigError> {
    let vars = std::env::vars_os()
        .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)));
    let overrides = parse_env_overrides(vars)?;
    if !overrides.is_empty() {
        tracing::debug!(count = overrides.len(), "found config overrides in the environment");
    }
    Ok(overrides)
}

impl ConfigDocument {
    /// Coerce each override to the kind of the field it names. Every field
    /// must already exist; nothing is written.
    pub fn resolve_overrides(
        &self,
        overrides: &[EnvOverride],
    ) -> Result<Vec<(FieldPath, Value)>, ConfigError> {
        let mut updates = Vec::with_capacity(overrides.len());
        for o in overrides {
            let value = self
                .coerce(&o.path, &o.raw)
                .map_err(|e| ConfigError::env(&o.var, e))?;
            self.check(&o.path, &value, LeafPolicy::MustExist)
                .map_err(|e| ConfigError::env(&o.var, e))?;
            updates.push((o.path.clone(), value));
        }
        Ok(updates)
    }

    /// Apply every override, or none if any of them is invalid.
    pub fn apply_overrides(&mut self, overrides: &[EnvOverride]) -> Result<usize, ConfigError> {
        let updates = self.resolve_overrides(overrides)?;
        self.set_all(&updates)?;
        for (path, _) in &updates {
            tracing::debug!(%path, "applied environment override");
        }
        Ok(updates.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
full_node:
  port: 8444
  enable_upnp: true
  dns_servers:
    - dns-introducer.chia.net
wallet:
  rpc_port: 9256
"#;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn both_prefixes_map_to_paths() {
        let overrides = parse_env_overrides(vars(&[
            ("PATH", "/usr/bin"),
            ("chia.full_node.port", "58444"),
            ("chia__wallet__rpc_port", "9257"),
            ("CHIA_ROOT", "/root/.chia/mainnet"),
        ]))
        .expect("parse");

        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides[0].path.to_string(), "full_node.port");
        assert_eq!(overrides[0].raw, "58444");
        assert_eq!(overrides[1].path.to_string(), "wallet.rpc_port");
        assert_eq!(overrides[1].var, "chia__wallet__rpc_port");
    }

    #[test]
    fn malformed_variable_names_the_variable() {
        let err = parse_env_overrides(vars(&[("chia.full_node..port", "1")])).expect_err("empty segment");
        assert!(err.to_string().contains("chia.full_node..port"), "{err}");
    }

    #[test]
    fn overrides_are_coerced_to_existing_kinds() {
        let mut doc = ConfigDocument::from_yaml_str(DOC).expect("parse");
        let overrides = parse_env_overrides(vars(&[
            ("chia.full_node.port", "58444"),
            ("chia.full_node.enable_upnp", "false"),
            ("chia.full_node.dns_servers", "[a.example, b.example]"),
        ]))
        .expect("parse");

        assert_eq!(doc.apply_overrides(&overrides).expect("apply"), 3);
        assert_eq!(doc.port_at("full_node.port"), Some(58444));
        assert_eq!(doc.get_str_path("full_node.enable_upnp"), Some(&Value::Bool(false)));
        assert_eq!(
            doc.get_str_path("full_node.dns_servers")
                .and_then(Value::as_sequence)
                .map(|s| s.len()),
            Some(2)
        );
    }

    #[test]
    fn one_bad_override_applies_none() {
        let mut doc = ConfigDocument::from_yaml_str(DOC).expect("parse");
        let before = doc.clone();
        let overrides = parse_env_overrides(vars(&[
            ("chia.full_node.port", "58444"),
            ("chia.full_node.no_such_field", "1"),
        ]))
        .expect("parse");

        let err = doc.apply_overrides(&overrides).expect_err("unknown field");
        assert!(err.to_string().contains("chia.full_node.no_such_field"), "{err}");
        assert_eq!(doc, before);
    }
}

//! The in-memory config document.

use serde_yaml::{Mapping, Value};

use chia_tools_types::NetworkName;

use crate::{ConfigError, FieldPath, Segment};

/// Whether setting a field may create its leaf key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeafPolicy {
    /// The leaf must already exist. Used for operator edits, where a missing
    /// leaf is almost always a typo.
    MustExist,
    /// The leaf may be added to an existing parent mapping. Used for
    /// programmatic updates against configs from older releases.
    MayCreate,
}

/// Coarse shape of a YAML value, used to refuse edits that would change the
/// structure of the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ValueKind {
    Null,
    Scalar,
    Sequence,
    Mapping,
}

impl ValueKind {
    fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Sequence(_) => Self::Sequence,
            Value::Mapping(_) => Self::Mapping,
            Value::Tagged(tagged) => Self::of(&tagged.value),
            Value::Bool(_) | Value::Number(_) | Value::String(_) => Self::Scalar,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Scalar => "scalar",
            Self::Sequence => "sequence",
            Self::Mapping => "mapping",
        }
    }
}

/// A chia `config.yaml` document.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigDocument {
    root: Value,
}

impl ConfigDocument {
    /// Parse a document. The top level must be a mapping.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let root: Value = serde_yaml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        match root {
            Value::Mapping(_) => Ok(Self { root }),
            Value::Null => Ok(Self {
                root: Value::Mapping(Mapping::new()),
            }),
            other => Err(ConfigError::Parse(format!(
                "top level must be a mapping, found a {}",
                ValueKind::of(&other).name()
            ))),
        }
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(&self.root).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    // ── Reads ──────────────────────────────────────────────────────────

    /// Look up the value at `path`.
    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        path.segments()
            .iter()
            .try_fold(&self.root, |value, segment| child(value, segment))
    }

    /// Look up a value by its dotted string form. Invalid paths read as absent.
    pub fn get_str_path(&self, raw: &str) -> Option<&Value> {
        FieldPath::parse(raw).ok().and_then(|path| self.get(&path))
    }

    /// String value at `raw`, if present and a string.
    pub fn string_at(&self, raw: &str) -> Option<&str> {
        self.get_str_path(raw).and_then(Value::as_str)
    }

    /// Port value at `raw`, if present and in range.
    pub fn port_at(&self, raw: &str) -> Option<u16> {
        self.get_str_path(raw)
            .and_then(Value::as_u64)
            .and_then(|port| u16::try_from(port).ok())
    }

    /// The network recorded in `selected_network`.
    pub fn selected_network(&self) -> Result<NetworkName, ConfigError> {
        let name = self
            .string_at("selected_network")
            .ok_or_else(|| ConfigError::MissingField("selected_network".into()))?;
        Ok(NetworkName::new(name)?)
    }

    /// `full_node.port`, the default port for peer connections.
    pub fn full_node_port(&self) -> Result<u16, ConfigError> {
        self.port_at("full_node.port")
            .ok_or_else(|| ConfigError::MissingField("full_node.port".into()))
    }

    // ── Writes ─────────────────────────────────────────────────────────

    /// Check that `value` could be written at `path` without changing the
    /// document's structure.
    ///
    /// Every parent segment must resolve to an existing mapping or sequence.
    /// An existing leaf keeps its kind unless it is null.
    pub fn check(
        &self,
        path: &FieldPath,
        value: &Value,
        policy: LeafPolicy,
    ) -> Result<(), ConfigError> {
        let parent = path
            .parent()
            .iter()
            .try_fold(&self.root, |value, segment| child(value, segment))
            .ok_or_else(|| ConfigError::UnknownPath(path.to_string()))?;

        let existing = match parent {
            Value::Mapping(map) => map.get(path.leaf().key().as_str()),
            Value::Sequence(seq) => {
                let index = path
                    .leaf()
                    .index()
                    .ok_or_else(|| ConfigError::UnknownPath(path.to_string()))?;
                Some(
                    seq.get(index)
                        .ok_or_else(|| ConfigError::UnknownPath(path.to_string()))?,
                )
            }
            _ => return Err(ConfigError::UnknownPath(path.to_string())),
        };

        match existing {
            None if policy == LeafPolicy::MustExist => {
                Err(ConfigError::UnknownPath(path.to_string()))
            }
            None => Ok(()),
            Some(existing) => {
                let found = ValueKind::of(existing);
                let expected = ValueKind::of(value);
                if found == ValueKind::Null || expected == ValueKind::Null || found == expected {
                    Ok(())
                } else {
                    Err(ConfigError::KindMismatch {
                        path: path.to_string(),
                        expected: expected.name(),
                        found: found.name(),
                    })
                }
            }
        }
    }

    /// Write `value` at `path`, creating the leaf key if needed.
    pub fn set(&mut self, path: &FieldPath, value: Value) -> Result<(), ConfigError> {
        self.check(path, &value, LeafPolicy::MayCreate)?;

        let mut parent = &mut self.root;
        for segment in path.parent() {
            parent = child_mut(parent, segment)
                .ok_or_else(|| ConfigError::UnknownPath(path.to_string()))?;
        }

        match parent {
            Value::Mapping(map) => {
                map.insert(Value::String(path.leaf().key()), value);
            }
            Value::Sequence(seq) => {
                let slot = path
                    .leaf()
                    .index()
                    .and_then(|index| seq.get_mut(index))
                    .ok_or_else(|| ConfigError::UnknownPath(path.to_string()))?;
                *slot = value;
            }
            _ => return Err(ConfigError::UnknownPath(path.to_string())),
        }
        Ok(())
    }

    /// Validate every update first, then apply them all. On error the
    /// document is unchanged.
    pub fn set_all(&mut self, updates: &[(FieldPath, Value)]) -> Result<(), ConfigError> {
        for (path, value) in updates {
            self.check(path, value, LeafPolicy::MayCreate)?;
        }
        for (path, value) in updates {
            self.set(path, value.clone())?;
        }
        Ok(())
    }

    /// Convert an operator-supplied string into a value of the same kind as
    /// the existing value at `path` (which must exist).
    pub fn coerce(&self, path: &FieldPath, raw: &str) -> Result<Value, ConfigError> {
        let existing = self
            .get(path)
            .ok_or_else(|| ConfigError::UnknownPath(path.to_string()))?;
        let invalid = |reason: String| ConfigError::InvalidValue {
            path: path.to_string(),
            reason,
        };

        match existing {
            Value::String(_) => Ok(Value::String(raw.to_string())),
            Value::Bool(_) => raw
                .trim()
                .parse::<bool>()
                .map(Value::Bool)
                .map_err(|_| invalid(format!("{raw:?} is not true or false"))),
            Value::Number(_) => {
                let parsed: Value =
                    serde_yaml::from_str(raw).map_err(|e| invalid(e.to_string()))?;
                match parsed {
                    Value::Number(_) => Ok(parsed),
                    _ => Err(invalid(format!("{raw:?} is not a number"))),
                }
            }
            Value::Null => Ok(serde_yaml::from_str::<Value>(raw)
                .unwrap_or_else(|_| Value::String(raw.to_string()))),
            Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => {
                let parsed: Value =
                    serde_yaml::from_str(raw).map_err(|e| invalid(e.to_string()))?;
                if ValueKind::of(&parsed) != ValueKind::of(existing) {
                    return Err(invalid(format!(
                        "expected a {}",
                        ValueKind::of(existing).name()
                    )));
                }
                Ok(parsed)
            }
        }
    }

    /// Mutable access to the mapping at `raw`, creating it inside an existing
    /// parent mapping when absent.
    pub(crate) fn mapping_mut(&mut self, raw: &str) -> Result<&mut Mapping, ConfigError> {
        let path = FieldPath::parse(raw)?;
        if self.get(&path).map(|v| v.is_null()).unwrap_or(true) {
            self.set(&path, Value::Mapping(Mapping::new()))?;
        }

        let mut value = &mut self.root;
        for segment in path.segments() {
            value = child_mut(value, segment).ok_or_else(|| ConfigError::UnknownPath(raw.into()))?;
        }
        match value {
            Value::Mapping(map) => Ok(map),
            other => Err(ConfigError::KindMismatch {
                path: raw.to_string(),
                expected: ValueKind::Mapping.name(),
                found: ValueKind::of(other).name(),
            }),
        }
    }
}

fn child<'a>(value: &'a Value, segment: &Segment) -> Option<&'a Value> {
    match value {
        Value::Mapping(map) => map.get(segment.key().as_str()),
        Value::Sequence(seq) => segment.index().and_then(|index| seq.get(index)),
        _ => None,
    }
}

fn child_mut<'a>(value: &'a mut Value, segment: &Segment) -> Option<&'a mut Value> {
    match value {
        Value::Mapping(map) => map.get_mut(segment.key().as_str()),
        Value::Sequence(seq) => segment.index().and_then(move |index| seq.get_mut(index)),
        _ => None,
    }
}

//! Manifest documents as emitted by `conda env export`.
//!
//! A manifest is kept as an insertion-ordered YAML mapping so that a
//! normalized export lists its keys exactly as the package manager wrote
//! them. Nothing is sorted on the way back out.
//!
//! Output goes through a YAML 1.1 aware emitter: conda reads manifests with
//! YAML 1.1 rules, so strings such as `yes`, `on` or `null` must stay quoted
//! or they come back as booleans and nulls.

use serde_yaml::{Mapping, Value};
use thiserror::Error;
use tracing::debug;
use yaml_rust2::yaml::Hash;
use yaml_rust2::{Yaml, YamlEmitter};

/// Top-level key holding the machine-local install path of an environment
pub const PREFIX_KEY: &str = "prefix";

/// Key holding the environment's name
pub const NAME_KEY: &str = "name";

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to parse manifest: {0}")]
    Parse(#[source] serde_yaml::Error),

    #[error("Manifest must be a mapping at the top level, found {found}")]
    NotAMapping { found: &'static str },

    #[error("Manifest contains an unsupported tagged value: {tag}")]
    UnsupportedTag { tag: String },

    #[error("Failed to serialize manifest: {message}")]
    Serialize { message: String },
}

pub type ManifestResult<T> = Result<T, ManifestError>;

/// An environment manifest with its top-level keys in original order
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    entries: Mapping,
}

impl Manifest {
    /// Parse exported manifest text.
    ///
    /// The document must be a mapping. Empty output parses as null and is
    /// rejected like any other non-mapping document.
    pub fn parse(text: &str) -> ManifestResult<Self> {
        let value: Value = serde_yaml::from_str(text).map_err(ManifestError::Parse)?;
        match value {
            Value::Mapping(entries) => Ok(Self { entries }),
            other => Err(ManifestError::NotAMapping {
                found: kind_of(&other),
            }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The `name` field, when present and a string
    pub fn name(&self) -> Option<&str> {
        self.get(NAME_KEY).and_then(Value::as_str)
    }

    /// Top-level string keys in document order. Non-string keys are skipped.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().filter_map(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove a top-level key. Entries after it keep their relative order.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Drop the non-portable `prefix` field, if any
    pub fn strip_prefix(&mut self) -> Option<Value> {
        let removed = self.remove(PREFIX_KEY);
        if let Some(prefix) = &removed {
            debug!("Removed prefix {:?} from manifest", prefix.as_str());
        }
        removed
    }

    /// Serialize back to YAML, keys in their current order
    pub fn to_yaml(&self) -> ManifestResult<String> {
        let document = mapping_to_yaml(&self.entries)?;

        let mut out = String::new();
        YamlEmitter::new(&mut out)
            .dump(&document)
            .map_err(|e| ManifestError::Serialize {
                message: e.to_string(),
            })?;

        // Drop the emitter's `---` document marker; end with exactly one newline
        let mut text = out.strip_prefix("---").unwrap_or(&out).trim().to_string();
        text.push('\n');
        Ok(text)
    }
}

fn mapping_to_yaml(mapping: &Mapping) -> ManifestResult<Yaml> {
    let mut hash = Hash::new();
    for (key, value) in mapping {
        hash.insert(to_yaml_node(key)?, to_yaml_node(value)?);
    }
    Ok(Yaml::Hash(hash))
}

fn to_yaml_node(value: &Value) -> ManifestResult<Yaml> {
    Ok(match value {
        Value::Null => Yaml::Null,
        Value::Bool(b) => Yaml::Boolean(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Yaml::Integer(i),
            // Floats and out-of-range integers keep their textual form
            None => Yaml::Real(n.to_string()),
        },
        Value::String(s) => Yaml::String(s.clone()),
        Value::Sequence(items) => Yaml::Array(
            items
                .iter()
                .map(to_yaml_node)
                .collect::<ManifestResult<Vec<_>>>()?,
        ),
        Value::Mapping(mapping) => mapping_to_yaml(mapping)?,
        Value::Tagged(tagged) => {
            return Err(ManifestError::UnsupportedTag {
                tag: tagged.tag.to_string(),
            })
        }
    })
}

/// Parse exported text, strip `prefix`, and re-serialize it.
pub fn normalize(text: &str) -> ManifestResult<String> {
    let mut manifest = Manifest::parse(text)?;
    manifest.strip_prefix();
    manifest.to_yaml()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

//! Option schema and option bags
//!
//! Every block type declares the options it understands on an
//! [`OptionsResolver`]: default values, required keys, allowed values, allowed
//! value kinds and normalizers. A resolved type layers the resolvers of its
//! whole ancestry (and of each level's extensions) into one merged schema,
//! which then validates the caller's [`Options`] bag before any block is built.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::error::BlockError;
use super::Data;

/// Ordered bag of option values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options(IndexMap<String, Data>);

impl Options {
    /// Create an empty option bag
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Build an option bag from a JSON object
    ///
    /// # Errors
    /// `UnexpectedType` when the value is not an object (`null` yields an empty bag).
    pub fn from_json(value: Data) -> Result<Self, BlockError> {
        match value {
            Data::Object(map) => Ok(map.into_iter().collect()),
            Data::Null => Ok(Self::new()),
            other => Err(BlockError::unexpected_type("object", &other)),
        }
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Data>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Insert a value, returning the previous one
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Data>) -> Option<Data> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Data> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Data> {
        self.0.shift_remove(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Data)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Overlay `other` on top of this bag; keys of `other` win
    pub fn merge(&mut self, other: Options) {
        self.0.extend(other.0);
    }

    /// String value of an option, `None` when absent, null or not a string
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Data::as_str)
    }

    /// Boolean value of an option
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Data::as_bool)
    }

    /// Integer value of an option
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Data::as_i64)
    }

    /// Value of an option, or `Null` when absent
    pub fn value(&self, name: &str) -> Data {
        self.get(name).cloned().unwrap_or(Data::Null)
    }

    /// Convert into a JSON object
    pub fn into_json(self) -> Data {
        Data::Object(self.0.into_iter().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, Data)> for Options {
    fn from_iter<I: IntoIterator<Item = (K, Data)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Kind of a JSON value, used to restrict option values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// Kind of the given value
    pub fn of(value: &Data) -> Self {
        match value {
            Data::Null => ValueKind::Null,
            Data::Bool(_) => ValueKind::Bool,
            Data::Number(_) => ValueKind::Number,
            Data::String(_) => ValueKind::String,
            Data::Array(_) => ValueKind::Array,
            Data::Object(_) => ValueKind::Object,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalizer run after merging; receives the merged bag and the option's value
pub type Normalizer = Arc<dyn Fn(&Options, Data) -> Result<Data, BlockError> + Send + Sync>;

/// Declaration of a single option
#[derive(Clone)]
pub struct OptionDefinition {
    /// Option name
    pub name: String,
    /// Default value, if any
    pub default: Option<Data>,
    /// Whether the caller must supply a value when there is no default
    pub required: bool,
    /// Allowed values (exact match)
    pub allowed_values: Option<Vec<Data>>,
    /// Allowed value kinds
    pub allowed_kinds: Option<Vec<ValueKind>>,
    normalizer: Option<Normalizer>,
}

impl OptionDefinition {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            default: None,
            required: false,
            allowed_values: None,
            allowed_kinds: None,
            normalizer: None,
        }
    }

    /// Whether a value must be supplied by the caller
    pub fn is_missing(&self) -> bool {
        self.required && self.default.is_none()
    }

    fn check(&self, value: &Data) -> Result<(), BlockError> {
        if let Some(kinds) = &self.allowed_kinds {
            let kind = ValueKind::of(value);
            if !kinds.contains(&kind) {
                let expected: Vec<&str> = kinds.iter().map(ValueKind::as_str).collect();
                return Err(BlockError::InvalidOption {
                    option: self.name.clone(),
                    reason: format!("expected {}, {} given", expected.join(" or "), kind),
                });
            }
        }
        if let Some(allowed) = &self.allowed_values {
            if !allowed.contains(value) {
                let allowed: Vec<String> = allowed.iter().map(|v| v.to_string()).collect();
                return Err(BlockError::InvalidOption {
                    option: self.name.clone(),
                    reason: format!("{} is not one of [{}]", value, allowed.join(", ")),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Debug for OptionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionDefinition")
            .field("name", &self.name)
            .field("default", &self.default)
            .field("required", &self.required)
            .field("allowed_values", &self.allowed_values)
            .field("allowed_kinds", &self.allowed_kinds)
            .field("normalizer", &self.normalizer.is_some())
            .finish()
    }
}

/// Option schema
///
/// Later declarations override earlier ones for the same option but keep the
/// option's original position, so the schema of a type is its parent's schema
/// with the type's own declarations layered on top.
///
/// Calling a restriction method (`set_allowed_values`, `set_allowed_kinds`,
/// `set_normalizer`) on an undeclared option declares it without a default.
#[derive(Debug, Clone, Default)]
pub struct OptionsResolver {
    defined: IndexMap<String, OptionDefinition>,
}

impl OptionsResolver {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, name: &str) -> &mut OptionDefinition {
        self.defined
            .entry(name.to_string())
            .or_insert_with(|| OptionDefinition::new(name))
    }

    /// Declare an option with a default value, or override an existing default
    pub fn set_default(&mut self, name: &str, value: impl Into<Data>) -> &mut Self {
        self.entry(name).default = Some(value.into());
        self
    }

    /// Declare several options with default values
    pub fn set_defaults<I, K>(&mut self, defaults: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, Data)>,
        K: AsRef<str>,
    {
        for (name, value) in defaults {
            self.set_default(name.as_ref(), value);
        }
        self
    }

    /// Declare a required option
    pub fn set_required(&mut self, name: &str) -> &mut Self {
        self.entry(name).required = true;
        self
    }

    /// Declare an optional option without a default
    pub fn set_defined(&mut self, name: &str) -> &mut Self {
        self.entry(name);
        self
    }

    /// Restrict an option to a fixed set of values
    pub fn set_allowed_values(&mut self, name: &str, values: Vec<Data>) -> &mut Self {
        self.entry(name).allowed_values = Some(values);
        self
    }

    /// Restrict an option to the given value kinds
    pub fn set_allowed_kinds(&mut self, name: &str, kinds: &[ValueKind]) -> &mut Self {
        self.entry(name).allowed_kinds = Some(kinds.to_vec());
        self
    }

    /// Attach a normalizer to an option
    pub fn set_normalizer<F>(&mut self, name: &str, normalizer: F) -> &mut Self
    where
        F: Fn(&Options, Data) -> Result<Data, BlockError> + Send + Sync + 'static,
    {
        self.entry(name).normalizer = Some(Arc::new(normalizer));
        self
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.defined.contains_key(name)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.defined.get(name).is_some_and(|d| d.required)
    }

    /// Get an option declaration
    pub fn definition(&self, name: &str) -> Option<&OptionDefinition> {
        self.defined.get(name)
    }

    /// Default value of an option
    pub fn default_value(&self, name: &str) -> Option<&Data> {
        self.defined.get(name).and_then(|d| d.default.as_ref())
    }

    /// Names of all declared options, in declaration order
    pub fn defined_options(&self) -> impl Iterator<Item = &str> {
        self.defined.keys().map(String::as_str)
    }

    /// Validate a caller-supplied bag and merge it with the defaults
    ///
    /// # Errors
    /// * `UnknownOption` for a key the schema does not declare
    /// * `MissingOption` for a required option with neither value nor default
    /// * `InvalidOption` for a value outside the allowed kinds or values, or
    ///   any error raised by a normalizer
    pub fn resolve(&self, options: Options) -> Result<Options, BlockError> {
        for name in options.keys() {
            if !self.defined.contains_key(name) {
                let mut known: Vec<&str> = self.defined_options().collect();
                known.sort_unstable();
                return Err(BlockError::UnknownOption {
                    option: name.to_string(),
                    known: known.join("\", \""),
                });
            }
        }

        let mut supplied = options;
        let mut resolved = Options::new();
        for (name, def) in &self.defined {
            let value = match supplied.remove(name) {
                Some(value) => value,
                None => match &def.default {
                    Some(default) => default.clone(),
                    None if def.required => {
                        return Err(BlockError::MissingOption {
                            option: name.clone(),
                        })
                    }
                    None => continue,
                },
            };
            def.check(&value)?;
            resolved.insert(name.clone(), value);
        }

        for (name, def) in &self.defined {
            if let Some(normalizer) = &def.normalizer {
                let value = resolved.value(name);
                let normalized = normalizer(&resolved, value)?;
                resolved.insert(name.clone(), normalized);
            }
        }

        Ok(resolved)
    }
}

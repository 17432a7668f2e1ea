//! Property paths
//!
//! A property path addresses a value inside nested data: `street`,
//! `address.street`, `[0]`, `items[2].name`. Both element forms work on objects
//! and arrays alike; an array element is addressed by its decimal index.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::BlockError;
use super::Data;

/// One step of a property path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathElement {
    /// `.name` (or a leading `name`)
    Property(String),
    /// `[key]`
    Index(String),
}

impl PathElement {
    pub fn key(&self) -> &str {
        match self {
            PathElement::Property(key) | PathElement::Index(key) => key,
        }
    }
}

/// Parsed property path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PropertyPath {
    elements: Vec<PathElement>,
}

impl PropertyPath {
    /// Parse a property path
    ///
    /// # Errors
    /// `InvalidArgument` for an empty path or unbalanced brackets.
    pub fn parse(path: &str) -> Result<Self, BlockError> {
        let invalid = |reason: &str| {
            BlockError::InvalidArgument(format!("Invalid property path \"{path}\": {reason}"))
        };

        let mut elements = Vec::new();
        let mut rest = path;
        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix('[') {
                let end = after.find(']').ok_or_else(|| invalid("unclosed '['"))?;
                let key = &after[..end];
                if key.is_empty() {
                    return Err(invalid("empty index"));
                }
                elements.push(PathElement::Index(key.to_string()));
                rest = &after[end + 1..];
            } else {
                let body = if elements.is_empty() {
                    rest
                } else {
                    rest.strip_prefix('.')
                        .ok_or_else(|| invalid("expected '.' or '['"))?
                };
                let end = body.find(['.', '[']).unwrap_or(body.len());
                let key = &body[..end];
                if key.is_empty() || key.contains(']') {
                    return Err(invalid("empty or malformed property"));
                }
                elements.push(PathElement::Property(key.to_string()));
                rest = &body[end..];
            }
        }

        if elements.is_empty() {
            return Err(invalid("path is empty"));
        }
        Ok(Self { elements })
    }

    /// Single-index path `[key]`
    pub fn index(key: impl Into<String>) -> Self {
        Self {
            elements: vec![PathElement::Index(key.into())],
        }
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Read the value at this path; `None` when any step is missing
    pub fn get_value<'a>(&self, data: &'a Data) -> Option<&'a Data> {
        self.elements
            .iter()
            .try_fold(data, |current, element| step(current, element.key()))
    }

    /// Write a value at this path, creating intermediate containers
    ///
    /// A `null` step becomes an array when the next key is the index `[0]` and
    /// an object otherwise. Arrays only grow by appending at their end: writing
    /// past the end turns the array into an object keyed by index, so no
    /// `null` padding is ever allocated.
    ///
    /// # Errors
    /// `UnexpectedType` when a step hits a scalar, or a non-numeric key hits an array.
    pub fn set_value(&self, data: &mut Data, value: Data) -> Result<(), BlockError> {
        let mut current = data;
        for element in &self.elements {
            current = step_mut(current, element)?;
        }
        *current = value;
        Ok(())
    }
}

fn step<'a>(current: &'a Data, key: &str) -> Option<&'a Data> {
    match current {
        Data::Object(map) => map.get(key),
        Data::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn step_mut<'a>(current: &'a mut Data, element: &PathElement) -> Result<&'a mut Data, BlockError> {
    let key = element.key();
    let index = key.parse::<usize>().ok();
    if current.is_null() {
        *current = match (element, index) {
            (PathElement::Index(_), Some(0)) => Data::Array(Vec::new()),
            _ => Data::Object(Default::default()),
        };
    }

    // an index past the end never pads; the array becomes an object keyed by index
    let gap = matches!(&*current, Data::Array(items) if index.is_some_and(|i| i > items.len()));
    if gap {
        if let Data::Array(items) = std::mem::take(current) {
            *current = Data::Object(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, value)| (i.to_string(), value))
                    .collect(),
            );
        }
    }

    match current {
        Data::Object(map) => Ok(map.entry(key.to_string()).or_insert(Data::Null)),
        Data::Array(items) => {
            let index = index.ok_or_else(|| BlockError::unexpected_type("object", &Data::Array(Vec::new())))?;
            if index == items.len() {
                items.push(Data::Null);
            }
            items
                .get_mut(index)
                .ok_or_else(|| BlockError::unexpected_type("object", &Data::Array(Vec::new())))
        }
        other => Err(BlockError::unexpected_type("object or array", other)),
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.elements.iter().enumerate() {
            match element {
                PathElement::Property(key) if i == 0 => write!(f, "{key}")?,
                PathElement::Property(key) => write!(f, ".{key}")?,
                PathElement::Index(key) => write!(f, "[{key}]")?,
            }
        }
        Ok(())
    }
}

impl FromStr for PropertyPath {
    type Err = BlockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PropertyPath {
    type Error = BlockError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PropertyPath> for String {
    fn from(path: PropertyPath) -> Self {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_and_display() {
        for path in ["street", "address.street", "[0]", "items[2].name", "[a][b]"] {
            assert_eq!(PropertyPath::parse(path).unwrap().to_string(), path);
        }
        assert_eq!(PropertyPath::index("3").to_string(), "[3]");
    }

    #[test]
    fn test_parse_rejects_malformed_paths() {
        for path in ["", "[0", "a..b", "[]", "a]b", "[0]x"] {
            assert!(PropertyPath::parse(path).is_err(), "{path} should be rejected");
        }
    }

    #[test]
    fn test_get_value_on_objects_and_arrays() {
        let data = json!({"address": {"street": "Main"}, "tags": ["a", "b"], "1": "one"});
        let get = |p: &str| PropertyPath::parse(p).unwrap().get_value(&data).cloned();

        assert_eq!(get("address.street"), Some(json!("Main")));
        assert_eq!(get("tags[1]"), Some(json!("b")));
        assert_eq!(get("[1]"), Some(json!("one")));
        assert_eq!(get("tags[5]"), None);
        assert_eq!(get("address.street.number"), None);
    }

    #[test]
    fn test_set_value_creates_containers() {
        let mut data = Data::Null;
        PropertyPath::parse("address.street").unwrap().set_value(&mut data, json!("Main")).unwrap();
        PropertyPath::parse("tags[0]").unwrap().set_value(&mut data, json!("a")).unwrap();
        PropertyPath::parse("tags[1]").unwrap().set_value(&mut data, json!("b")).unwrap();
        assert_eq!(data, json!({"address": {"street": "Main"}, "tags": ["a", "b"]}));
    }

    /// Indexes past the end switch to an object instead of padding
    #[test]
    fn test_set_value_never_pads_arrays() {
        let mut data = Data::Null;
        PropertyPath::parse("[3]").unwrap().set_value(&mut data, json!("d")).unwrap();
        assert_eq!(data, json!({"3": "d"}));

        let mut data = json!(["a"]);
        PropertyPath::parse("[100000000000]").unwrap().set_value(&mut data, json!("x")).unwrap();
        assert_eq!(data, json!({"0": "a", "100000000000": "x"}));

        let mut data = json!(["a", "b"]);
        PropertyPath::parse("[1]").unwrap().set_value(&mut data, json!("B")).unwrap();
        PropertyPath::parse("[2]").unwrap().set_value(&mut data, json!("c")).unwrap();
        assert_eq!(data, json!(["a", "B", "c"]));
    }

    #[test]
    fn test_set_value_on_scalar_fails() {
        let mut data = json!("flat");
        let err = PropertyPath::parse("a").unwrap().set_value(&mut data, json!(1)).unwrap_err();
        assert!(matches!(err, BlockError::UnexpectedType { .. }));
    }
}

//! Integer ↔ string

use crate::core::transformer::{DataTransformer, TransformationFailed};
use crate::core::Data;

/// Normalized integers ↔ view strings
///
/// `null` is shown as `""`; an empty or blank submission binds to `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerToStringTransformer;

impl DataTransformer for IntegerToStringTransformer {
    fn transform(&self, value: Data) -> Result<Data, TransformationFailed> {
        match value {
            Data::Null => Ok(Data::String(String::new())),
            Data::Number(n) if n.is_i64() || n.is_u64() => Ok(Data::String(n.to_string())),
            Data::Number(n) => match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                    Ok(Data::String((f as i64).to_string()))
                }
                _ => Err(TransformationFailed::new(format!("{n} is not an integer"))),
            },
            other => Err(TransformationFailed::expected("integer", &other)),
        }
    }

    fn reverse_transform(&self, value: Data) -> Result<Data, TransformationFailed> {
        match value {
            Data::Null => Ok(Data::Null),
            Data::String(s) if s.trim().is_empty() => Ok(Data::Null),
            Data::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Data::from)
                .map_err(|_| TransformationFailed::new(format!("\"{s}\" is not a valid integer"))),
            other => Err(TransformationFailed::expected("string", &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transform() {
        let t = IntegerToStringTransformer;
        assert_eq!(t.transform(json!(42)).unwrap(), json!("42"));
        assert_eq!(t.transform(json!(-7)).unwrap(), json!("-7"));
        assert_eq!(t.transform(json!(3.0)).unwrap(), json!("3"));
        assert_eq!(t.transform(Data::Null).unwrap(), json!(""));
        assert!(t.transform(json!(1.5)).is_err());
        assert!(t.transform(json!("42")).is_err());
    }

    #[test]
    fn test_reverse_transform() {
        let t = IntegerToStringTransformer;
        assert_eq!(t.reverse_transform(json!("42")).unwrap(), json!(42));
        assert_eq!(t.reverse_transform(json!(" 12 ")).unwrap(), json!(12));
        assert_eq!(t.reverse_transform(json!("")).unwrap(), Data::Null);
        assert!(t.reverse_transform(json!("abc")).is_err());
        assert!(t.reverse_transform(json!(true)).is_err());
    }
}

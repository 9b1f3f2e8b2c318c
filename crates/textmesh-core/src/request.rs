//! Generation request validation

use crate::error::{Result, TextMeshError};
use serde_json::Value;

/// Extrusion depth used when the request does not specify one
pub const DEFAULT_DEPTH: f32 = 0.4;

/// Default upper bound on the number of characters in `text`
pub const DEFAULT_MAX_TEXT_CHARS: usize = 256;

const INVALID_TEXT: &str = "Missing or invalid \"text\" in request body";

/// A validated request to turn `text` into an extruded 3D label
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub text: String,
    pub depth: f32,
    pub animate: bool,
}

impl GenerationRequest {
    /// Build a request with default depth and animation
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            depth: DEFAULT_DEPTH,
            animate: true,
        }
    }

    /// Validate a JSON request body.
    ///
    /// `text` must be a non-empty string of at most `max_text_chars`
    /// characters. `depth` (if present) must be a finite number greater than
    /// zero and `animate` (if present) must be a boolean. `null` counts as
    /// absent for the optional fields.
    pub fn from_json(body: &Value, max_text_chars: usize) -> Result<Self> {
        let obj = body
            .as_object()
            .ok_or_else(|| TextMeshError::Validation(INVALID_TEXT.to_string()))?;

        let text = match obj.get("text") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => return Err(TextMeshError::Validation(INVALID_TEXT.to_string())),
        };

        if text.chars().count() > max_text_chars {
            return Err(TextMeshError::Validation(format!(
                "\"text\" must be at most {} characters",
                max_text_chars
            )));
        }

        let depth = match obj.get("depth") {
            None | Some(Value::Null) => DEFAULT_DEPTH,
            // checked after narrowing so values outside f32 range are rejected
            Some(v) => match v.as_f64().map(|d| d as f32) {
                Some(d) if d.is_finite() && d > 0.0 => d,
                _ => {
                    return Err(TextMeshError::Validation(
                        "\"depth\" must be a positive number".to_string(),
                    ))
                }
            },
        };

        let animate = match obj.get("animate") {
            None | Some(Value::Null) => true,
            Some(Value::Bool(b)) => *b,
            Some(_) => {
                return Err(TextMeshError::Validation(
                    "\"animate\" must be a boolean".to_string(),
                ))
            }
        };

        Ok(Self {
            text,
            depth,
            animate,
        })
    }

}

/// Scale factor for a label, a pure function of its character count
pub fn text_scale(text: &str) -> f32 {
    let len = text.chars().count() as f32;
    1.0 / (len / 10.0 + 1.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(v: Value) -> Result<GenerationRequest> {
        GenerationRequest::from_json(&v, DEFAULT_MAX_TEXT_CHARS)
    }

    #[test]
    fn test_defaults_applied() {
        let req = parse(json!({"text": "Hi"})).unwrap();
        assert_eq!(req.text, "Hi");
        assert_eq!(req.depth, DEFAULT_DEPTH);
        assert!(req.animate);
    }

    #[test]
    fn test_explicit_fields() {
        let req = parse(json!({"text": "Hello", "depth": 1.5, "animate": false})).unwrap();
        assert_eq!(req.depth, 1.5);
        assert!(!req.animate);
    }

    #[test]
    fn test_null_optional_fields_use_defaults() {
        let req = parse(json!({"text": "Hi", "depth": null, "animate": null})).unwrap();
        assert_eq!(req.depth, DEFAULT_DEPTH);
        assert!(req.animate);
    }

    #[test]
    fn test_missing_or_bad_text_rejected() {
        for body in [
            json!({}),
            json!({"text": ""}),
            json!({"text": 42}),
            json!({"text": null}),
            json!({"text": ["a"]}),
            json!("just a string"),
            json!(null),
        ] {
            let err = parse(body).unwrap_err();
            assert!(err.is_client_error());
        }
    }

    #[test]
    fn test_bad_depth_rejected() {
        assert!(parse(json!({"text": "a", "depth": 0})).is_err());
        assert!(parse(json!({"text": "a", "depth": -1.0})).is_err());
        assert!(parse(json!({"text": "a", "depth": "deep"})).is_err());
    }

    #[test]
    fn test_depth_outside_f32_range_rejected() {
        for depth in [1e300, 1e-60] {
            let err = parse(json!({"text": "a", "depth": depth})).unwrap_err();
            assert!(matches!(err, TextMeshError::Validation(ref m) if m.contains("depth")));
        }
    }

    #[test]
    fn test_bad_animate_rejected() {
        assert!(parse(json!({"text": "a", "animate": "yes"})).is_err());
        assert!(parse(json!({"text": "a", "animate": 1})).is_err());
    }

    #[test]
    fn test_text_length_limit() {
        let long = "x".repeat(11);
        assert!(GenerationRequest::from_json(&json!({"text": long}), 10).is_err());
        let ok = "x".repeat(10);
        assert!(GenerationRequest::from_json(&json!({"text": ok}), 10).is_ok());
    }

    #[test]
    fn test_scale_formula() {
        assert!((text_scale("") - 1.0).abs() < 1e-6);
        // len 10 -> 1/sqrt(2)
        assert!((text_scale("abcdefghij") - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
        // counts characters, not bytes
        assert_eq!(text_scale("héllo"), text_scale("hello"));
    }

    #[test]
    fn test_scale_non_increasing() {
        let mut prev = f32::INFINITY;
        for n in 0..100 {
            let s = text_scale(&"a".repeat(n));
            assert!(s <= prev);
            prev = s;
        }
    }
}

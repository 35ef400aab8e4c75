//! Schema validation helpers.
//!
//! Validates a `serde_json::Value` configuration against a [`Schema`] before
//! any API call is made.
//!
//! # Example
//!
//! ```
//! use quicknode_provider::schema::{Attribute, Schema};
//! use quicknode_provider::validation::validate;
//! use serde_json::json;
//!
//! let schema = Schema::v0()
//!     .with_attribute("chain", Attribute::required_string())
//!     .with_attribute("limit", Attribute::optional_int64());
//!
//! assert!(validate(&schema, &json!({"chain": "eth", "limit": 10})).is_empty());
//!
//! let diagnostics = validate(&schema, &json!({"chain": "eth", "limit": "ten"}));
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].attribute, Some("limit".to_string()));
//! ```

use crate::schema::{Attribute, AttributeType, Block, BlockNestingMode, Diagnostic, NestedBlock, Schema};
use serde_json::Value;

/// Validate a JSON value against a schema.
///
/// Returns a list of diagnostics for any validation errors found.
/// An empty list means the value is valid.
///
/// # Validation Rules
///
/// - Required attributes must be present and non-null
/// - Optional attributes may be absent or null
/// - Computed-only attributes are skipped (the provider sets these)
/// - Attribute types must match the schema
/// - Nested blocks are validated recursively with min/max item constraints
pub fn validate(schema: &Schema, value: &Value) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    validate_block(&schema.block, value, "", &mut diagnostics);
    diagnostics
}

/// Validate a JSON value against a schema, returning Ok if valid or Err with diagnostics.
pub fn validate_result(schema: &Schema, value: &Value) -> Result<(), Vec<Diagnostic>> {
    let diagnostics = validate(schema, value);
    if diagnostics.is_empty() {
        Ok(())
    } else {
        Err(diagnostics)
    }
}

/// Check if a JSON value is valid against a schema.
pub fn is_valid(schema: &Schema, value: &Value) -> bool {
    validate(schema, value).is_empty()
}

fn validate_block(block: &Block, value: &Value, path: &str, diagnostics: &mut Vec<Diagnostic>) {
    let obj = match value {
        Value::Object(map) => map,
        Value::Null => return,
        _ => {
            let diag = Diagnostic::error("Expected object")
                .with_detail(format!("Got {}", value_type_name(value)));
            diagnostics.push(if path.is_empty() {
                diag
            } else {
                diag.with_attribute(path)
            });
            return;
        },
    };

    for (name, attr) in &block.attributes {
        validate_attribute(attr, obj.get(name), &join_path(path, name), diagnostics);
    }

    for (name, nested) in &block.blocks {
        validate_nested_block(nested, obj.get(name), &join_path(path, name), diagnostics);
    }
}

fn validate_attribute(
    attr: &Attribute,
    value: Option<&Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if attr.flags.is_computed_only() {
        return;
    }

    match value {
        None | Some(Value::Null) => {
            if attr.flags.required {
                diagnostics.push(
                    Diagnostic::error(format!("Missing required attribute '{}'", path))
                        .with_detail("This attribute is required and must be provided")
                        .with_attribute(path),
                );
            }
        },
        Some(v) => validate_attribute_type(&attr.attr_type, v, path, diagnostics),
    }
}

fn validate_attribute_type(
    attr_type: &AttributeType,
    value: &Value,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match attr_type {
        AttributeType::String => {
            if !value.is_string() {
                diagnostics.push(type_error(path, "string", value));
            }
        },
        AttributeType::Int64 => {
            if !is_int64(value) {
                diagnostics.push(type_error(path, "int64", value));
            }
        },
        AttributeType::Bool => {
            if !value.is_boolean() {
                diagnostics.push(type_error(path, "bool", value));
            }
        },
        AttributeType::List(element_type) => match value.as_array() {
            Some(arr) => {
                for (i, elem) in arr.iter().enumerate() {
                    let elem_path = format!("{}.{}", path, i);
                    validate_attribute_type(element_type, elem, &elem_path, diagnostics);
                }
            },
            None => diagnostics.push(type_error(path, "list", value)),
        },
    }
}

fn validate_nested_block(
    nested: &NestedBlock,
    value: Option<&Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match (nested.nesting_mode, value) {
        (_, None | Some(Value::Null)) => {
            if nested.min_items > 0 {
                diagnostics.push(
                    Diagnostic::error(format!(
                        "Block '{}' requires at least {} item(s)",
                        path, nested.min_items
                    ))
                    .with_attribute(path),
                );
            }
        },
        (BlockNestingMode::Single, Some(v)) => {
            validate_block(&nested.block, v, path, diagnostics);
        },
        (BlockNestingMode::List, Some(Value::Array(items))) => {
            let len = items.len() as u32;
            if len < nested.min_items {
                diagnostics.push(
                    Diagnostic::error(format!(
                        "Block '{}' requires at least {} item(s), got {}",
                        path, nested.min_items, len
                    ))
                    .with_attribute(path),
                );
            }
            // 0 means unlimited
            if nested.max_items > 0 && len > nested.max_items {
                diagnostics.push(
                    Diagnostic::error(format!(
                        "Block '{}' allows at most {} item(s), got {}",
                        path, nested.max_items, len
                    ))
                    .with_attribute(path),
                );
            }
            for (i, item) in items.iter().enumerate() {
                validate_block(&nested.block, item, &format!("{}.{}", path, i), diagnostics);
            }
        },
        (BlockNestingMode::List, Some(v)) => {
            diagnostics.push(
                Diagnostic::error(format!("Expected list for block '{}'", path))
                    .with_detail(format!("Got {}", value_type_name(v)))
                    .with_attribute(path),
            );
        },
    }
}

fn join_path(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", base, name)
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_int64(value: &Value) -> bool {
    match value {
        Value::Number(n) if n.is_i64() => true,
        Value::Number(n) => n
            .as_f64()
            .is_some_and(|f| f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64),
        _ => false,
    }
}

fn type_error(path: &str, expected: &str, got: &Value) -> Diagnostic {
    Diagnostic::error(format!("Invalid type for attribute '{}'", path))
        .with_detail(format!("Expected {}, got {}", expected, value_type_name(got)))
        .with_attribute(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Attribute, AttributeFlags, Block, NestedBlock, Schema};
    use serde_json::json;

    fn endpoint_like_schema() -> Schema {
        Schema::v0()
            .with_attribute("id", Attribute::computed_string())
            .with_attribute("chain", Attribute::required_string().with_force_new())
            .with_attribute("label", Attribute::optional_string().computed())
            .with_block(
                "security_options",
                NestedBlock::single(
                    Block::new()
                        .with_attribute("tokens", Attribute::defaulted_bool(true))
                        .with_attribute("cors", Attribute::defaulted_bool(true)),
                ),
            )
    }

    #[test]
    fn test_validate_required_string() {
        let schema = endpoint_like_schema();

        assert!(validate(&schema, &json!({"chain": "eth"})).is_empty());

        let diagnostics = validate(&schema, &json!({}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute, Some("chain".to_string()));

        let diagnostics = validate(&schema, &json!({"chain": null}));
        assert_eq!(diagnostics.len(), 1);

        let diagnostics = validate(&schema, &json!({"chain": 1}));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("Invalid type"));
    }

    #[test]
    fn test_computed_only_attribute_skipped() {
        let schema = endpoint_like_schema();
        assert!(validate(&schema, &json!({"chain": "eth", "id": 123})).is_empty());
    }

    #[test]
    fn test_optional_computed_attribute_type_checked() {
        let schema = endpoint_like_schema();
        let diagnostics = validate(&schema, &json!({"chain": "eth", "label": false}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute, Some("label".to_string()));
    }

    #[test]
    fn test_validate_int64() {
        let schema = Schema::v0().with_attribute("limit", Attribute::optional_int64());

        assert!(validate(&schema, &json!({"limit": 10})).is_empty());
        assert!(validate(&schema, &json!({"limit": 10.0})).is_empty());
        assert_eq!(validate(&schema, &json!({"limit": 10.5})).len(), 1);
        assert_eq!(validate(&schema, &json!({"limit": "10"})).len(), 1);
    }

    #[test]
    fn test_validate_nested_single_block() {
        let schema = endpoint_like_schema();

        let ok = json!({"chain": "eth", "security_options": {"tokens": false}});
        assert!(validate(&schema, &ok).is_empty());

        let bad = json!({"chain": "eth", "security_options": {"cors": "enabled"}});
        let diagnostics = validate(&schema, &bad);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].attribute,
            Some("security_options.cors".to_string())
        );

        let not_object = json!({"chain": "eth", "security_options": true});
        let diagnostics = validate(&schema, &not_object);
        assert!(diagnostics[0].summary.contains("Expected object"));
    }

    #[test]
    fn test_validate_list_attribute() {
        let schema = Schema::v0().with_attribute(
            "tags",
            Attribute::new(
                AttributeType::list(AttributeType::String),
                AttributeFlags::optional(),
            ),
        );

        assert!(validate(&schema, &json!({"tags": ["prod", "eu"]})).is_empty());

        let diagnostics = validate(&schema, &json!({"tags": ["prod", 1]}));
        assert_eq!(diagnostics[0].attribute, Some("tags.1".to_string()));

        assert_eq!(validate(&schema, &json!({"tags": "prod"})).len(), 1);
    }

    #[test]
    fn test_validate_list_block_constraints() {
        let schema = Schema::v0().with_block(
            "ips",
            NestedBlock::list(Block::new().with_attribute("ip", Attribute::required_string()))
                .with_min_items(1)
                .with_max_items(2),
        );

        assert!(validate(&schema, &json!({"ips": [{"ip": "10.0.0.1"}]})).is_empty());

        let diagnostics = validate(&schema, &json!({"ips": []}));
        assert!(diagnostics[0].summary.contains("at least 1"));

        let too_many = json!({"ips": [{"ip": "a"}, {"ip": "b"}, {"ip": "c"}]});
        assert!(validate(&schema, &too_many)[0].summary.contains("at most 2"));

        let diagnostics = validate(&schema, &json!({"ips": [{"ip": 1}]}));
        assert_eq!(diagnostics[0].attribute, Some("ips.0.ip".to_string()));

        let diagnostics = validate(&schema, &json!({"ips": {"ip": "a"}}));
        assert!(diagnostics[0].summary.contains("Expected list"));
    }

    #[test]
    fn test_absent_computed_block_is_valid() {
        let schema = Schema::v0().with_block(
            "chains",
            NestedBlock::list(Block::new().with_attribute("slug", Attribute::required_string()))
                .computed(),
        );
        assert!(validate(&schema, &json!({})).is_empty());
    }

    #[test]
    fn test_helpers() {
        let schema = endpoint_like_schema();
        assert!(is_valid(&schema, &json!({"chain": "eth"})));
        assert!(!is_valid(&schema, &json!({})));
        assert!(validate_result(&schema, &json!({"chain": "eth"})).is_ok());
        assert_eq!(validate_result(&schema, &json!({})).unwrap_err().len(), 1);
    }

    #[test]
    fn test_validate_root_not_object() {
        let schema = endpoint_like_schema();
        let diagnostics = validate(&schema, &json!("not an object"));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].attribute.is_none());
    }
}

//! Decomposition of a `_wm` configuration into named settings
//!
//! The expected shape is
//!
//! ```js
//! _wm: new ig.Config({
//!     attributes: {
//!         flag: { _type: "Boolean", _optional: true },
//!         values: { _type: "Array", _sub: "Number" },
//!     },
//! }),
//! ```
//!
//! Any deviation from it is a fatal assertion; only unknown tags are soft.

use crate::common::{
    is_property_path, named_children, node_text, property_key, string_literal_value,
    unparenthesize,
};
use crate::heuristics::{self, Resolved, SelectSource, TypeDescriptor};
use stepdefs_core::catalog::OptionType;
use stepdefs_core::error::{ensure, Error, Result};
use tree_sitter::Node;

const TYPE_KEY: &str = "_type";
const OPTIONAL_KEY: &str = "_optional";
const DEFAULT_KEY: &str = "_default";
const SELECT_KEY: &str = "_select";
const SUB_KEY: &str = "_sub";

/// One decomposed setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    pub name: String,
    pub option: OptionType,
    /// The tag when no heuristic rule matched it
    pub unrecognized: Option<String>,
}

/// Splits the constructor call of a `_wm` field into settings
pub fn decompose_config(
    value: Node,
    source: &str,
    default_implies_optional: bool,
) -> Result<Vec<Setting>> {
    let value = unparenthesize(value);
    ensure(value.kind() == "new_expression", || {
        format!(
            "_wm initializer is a {} instead of a constructor call",
            value.kind()
        )
    })?;

    let arguments = value
        .child_by_field_name("arguments")
        .ok_or_else(|| Error::assertion("_wm constructor call has no arguments"))?;
    let body = named_children(arguments)
        .into_iter()
        .next()
        .ok_or_else(|| Error::assertion("_wm constructor call has no arguments"))?;
    ensure(body.kind() == "object", || {
        format!("_wm constructor argument is a {}", body.kind())
    })?;

    let attributes = named_children(body)
        .into_iter()
        .filter(|prop| prop.kind() == "pair")
        .filter_map(|pair| pair.child_by_field_name("value"))
        .find(|value| value.kind() == "object")
        .ok_or_else(|| Error::assertion("_wm configuration has no option table"))?;

    named_children(attributes)
        .into_iter()
        .map(|attribute| decompose_attribute(attribute, source, default_implies_optional))
        .collect()
}

fn decompose_attribute(
    attribute: Node,
    source: &str,
    default_implies_optional: bool,
) -> Result<Setting> {
    ensure(attribute.kind() == "pair", || {
        format!("option table entry is a {}", attribute.kind())
    })?;
    let key = attribute
        .child_by_field_name("key")
        .ok_or_else(|| Error::assertion("option without a key"))?;
    let name = property_key(key, source)?;

    let descriptor = attribute
        .child_by_field_name("value")
        .ok_or_else(|| Error::assertion(format!("option {name} without a descriptor")))?;
    ensure(descriptor.kind() == "object", || {
        format!("descriptor of option {name} is a {}", descriptor.kind())
    })?;

    let is_optional = match find_prop(descriptor, OPTIONAL_KEY, source)? {
        Some(flag) => flag.kind() == "true",
        None => default_implies_optional && find_prop(descriptor, DEFAULT_KEY, source)?.is_some(),
    };

    let type_descriptor = read_descriptor(descriptor, source)?;
    let resolved = heuristics::resolve(&type_descriptor);
    let unrecognized = match &resolved {
        Resolved::Unrecognized(tag) => Some(tag.clone()),
        Resolved::Type(_) => None,
    };

    Ok(Setting {
        name,
        option: OptionType::optional(resolved.type_or_unknown(), is_optional),
        unrecognized,
    })
}

/// Reads `_type` and the composite keys of a descriptor object
fn read_descriptor(descriptor: Node, source: &str) -> Result<TypeDescriptor> {
    let type_node = find_prop(descriptor, TYPE_KEY, source)?
        .ok_or_else(|| Error::assertion("option descriptor without _type"))?;
    let tag = string_literal_value(type_node, source).ok_or_else(|| {
        Error::assertion(format!(
            "_type is a {} instead of a string literal",
            type_node.kind()
        ))
    })?;

    let mut result = TypeDescriptor::tag(tag);
    if let Some(select) = find_prop(descriptor, SELECT_KEY, source)? {
        result = result.with_select(select_source(select, source)?);
    }
    if let Some(sub) = find_prop(descriptor, SUB_KEY, source)? {
        result = result.with_sub(sub_descriptor(sub, source)?);
    }
    Ok(result)
}

/// Element descriptor of an array option: a bare tag or a nested descriptor
fn sub_descriptor(sub: Node, source: &str) -> Result<TypeDescriptor> {
    if let Some(tag) = string_literal_value(sub, source) {
        return Ok(TypeDescriptor::tag(tag));
    }
    ensure(sub.kind() == "object", || {
        format!("_sub is a {} instead of a tag or descriptor", sub.kind())
    })?;
    read_descriptor(sub, source)
}

fn select_source(select: Node, source: &str) -> Result<SelectSource> {
    let select = unparenthesize(select);
    Ok(match select.kind() {
        "string" => SelectSource::StringLiteral,
        "member_expression" if is_property_path(select) => {
            SelectSource::PropertyPath(node_text(select, source)?.to_string())
        }
        _ => SelectSource::Opaque,
    })
}

/// Value of the `key` property of an object literal
fn find_prop<'t>(object: Node<'t>, key: &str, source: &str) -> Result<Option<Node<'t>>> {
    for prop in named_children(object) {
        let Some(key_node) = prop.child_by_field_name("key") else {
            continue;
        };
        if property_key(key_node, source)? != key {
            continue;
        }
        ensure(prop.kind() == "pair", || {
            format!("descriptor key {key} is a {}", prop.kind())
        })?;
        return Ok(prop.child_by_field_name("value"));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::{find_kind, parse};
    use pretty_assertions::assert_eq;

    fn decompose(source: &str) -> Result<Vec<Setting>> {
        let tree = parse(source);
        let value = find_kind(tree.root_node(), "new_expression").expect("constructor call");
        decompose_config(value, source, true)
    }

    fn settings(source: &str) -> Vec<(String, String, bool)> {
        decompose(source)
            .expect("well-formed configuration")
            .into_iter()
            .map(|s| (s.name, s.option.ty, s.option.is_optional))
            .collect()
    }

    #[test]
    fn test_boolean_and_array_options() {
        let source = r#"x = new ig.Config({
            attributes: {
                enabled: { _type: "Boolean", _optional: true },
                values: { _type: "Array", _sub: "Number" }
            }
        });"#;

        assert_eq!(
            settings(source),
            vec![
                ("enabled".to_string(), "boolean".to_string(), true),
                ("values".to_string(), "number[]".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_default_implies_optional_unless_explicit() {
        let source = r#"x = new ig.Config({
            attributes: {
                speed: { _type: "Number", _default: 1 },
                name: { _type: "String", _optional: false, _default: "" }
            }
        });"#;

        assert_eq!(
            settings(source),
            vec![
                ("speed".to_string(), "number".to_string(), true),
                ("name".to_string(), "string".to_string(), false),
            ]
        );

        let tree = parse(source);
        let value = find_kind(tree.root_node(), "new_expression").unwrap();
        let strict = decompose_config(value, source, false).unwrap();
        assert!(!strict[0].option.is_optional);
    }

    #[test]
    fn test_select_and_nested_array_options() {
        let source = r#"x = new ig.EffectConfig({
            _info: "demo",
            attributes: {
                kind: { _type: "Select", _select: sc.ATTACK_TYPE },
                mode: { _type: "Select", _select: "modes" },
                list: { _type: "Select", _select: ["a", "b"] },
                points: { _type: "Array", _sub: { _type: "Vec2" } }
            }
        });"#;

        assert_eq!(
            settings(source),
            vec![
                (
                    "kind".to_string(),
                    "keyof typeof sc.ATTACK_TYPE".to_string(),
                    false
                ),
                ("mode".to_string(), "string".to_string(), false),
                ("list".to_string(), "unknown".to_string(), false),
                ("points".to_string(), "Vec2[]".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_unrecognized_tag_is_soft() {
        let source = r#"x = new ig.Config({ attributes: { odd: { _type: "Mystery" } } });"#;
        let result = decompose(source).expect("unknown tags do not abort");
        assert_eq!(result[0].option.ty, "unknown");
        assert_eq!(result[0].unrecognized.as_deref(), Some("Mystery"));
    }

    #[test]
    fn test_missing_type_is_fatal() {
        let source = r#"x = new ig.Config({ attributes: { odd: { _info: "no type" } } });"#;
        let err = decompose(source).unwrap_err();
        assert!(err.is_fatal_shape());
        assert!(err.to_string().contains("_type"));
    }

    #[test]
    fn test_non_constructor_is_fatal() {
        let source = "x = { _wm: null };";
        let tree = parse(source);
        let value = find_kind(tree.root_node(), "null").unwrap();
        assert!(decompose_config(value, source, true).is_err());
    }

    #[test]
    fn test_missing_option_table_is_fatal() {
        let source = r#"x = new ig.Config({ _info: "nothing" });"#;
        assert!(decompose(source).is_err());
    }
}

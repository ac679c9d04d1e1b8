//! Member classification: field vs. method, and the type rules for each

pub mod fields;
pub mod methods;
pub mod settings;

use crate::common::{is_function_value, node_to_text, property_key, unparenthesize};
use stepdefs_core::error::{Error, Result};
use tree_sitter::Node;

pub use fields::{this_assignments, ExpressionClassifier, SettingsScope, ThisAssignment};
pub use methods::method_signature;
pub use settings::{decompose_config, Setting};

/// Name of the per-instance configuration field
pub const CONFIG_FIELD: &str = "_wm";

/// Name of the constructor method whose body refines field types
pub const INIT_METHOD: &str = "init";

/// What an object literal member turned out to be
#[derive(Debug, Clone, Copy)]
pub enum MemberShape<'t> {
    /// A function-valued member; the node carries parameters and body
    Method(Node<'t>),
    /// A value member; shorthand members have no initializer node
    Field(Option<Node<'t>>),
    /// An object literal value, which is never a class
    NestedObject,
}

/// A named member of the object passed to `Base.extend`
#[derive(Debug, Clone)]
pub struct ObjectMember<'t> {
    pub name: String,
    pub shape: MemberShape<'t>,
}

/// True for nodes that are members of an object literal
pub fn is_object_member(node: Node) -> bool {
    match node.kind() {
        "pair" | "shorthand_property_identifier" | "spread_element" => true,
        "method_definition" => node.parent().is_some_and(|p| p.kind() == "object"),
        _ => false,
    }
}

/// Splits an object literal member into its name and shape
///
/// Returns `None` for spread elements, which have no name.
pub fn object_member<'t>(node: Node<'t>, source: &str) -> Result<Option<ObjectMember<'t>>> {
    let (name, shape) = match node.kind() {
        "method_definition" => {
            let name = node
                .child_by_field_name("name")
                .ok_or_else(|| Error::assertion("method without a name"))?;
            (property_key(name, source)?, MemberShape::Method(node))
        }
        "pair" => {
            let key = node
                .child_by_field_name("key")
                .ok_or_else(|| Error::assertion("object member without a key"))?;
            let value = node
                .child_by_field_name("value")
                .ok_or_else(|| Error::assertion("object member without a value"))?;
            let value = unparenthesize(value);
            let shape = if value.kind() == "object" {
                MemberShape::NestedObject
            } else if is_function_value(value) {
                MemberShape::Method(value)
            } else {
                MemberShape::Field(Some(value))
            };
            (property_key(key, source)?, shape)
        }
        "shorthand_property_identifier" => (node_to_text(node, source)?, MemberShape::Field(None)),
        "spread_element" => return Ok(None),
        other => {
            return Err(Error::assertion(format!(
                "{other} is not an object literal member"
            )))
        }
    };
    Ok(Some(ObjectMember { name, shape }))
}

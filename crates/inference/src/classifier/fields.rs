//! Field types from initializer expressions
//!
//! Used for object literal field values and for `this.x = ...` assignments in
//! an `init` method. Inside `init`, reads of the settings parameter pick up
//! the type of the matching decomposed setting.

use crate::common::{named_children, node_text, unparenthesize};
use crate::heuristics;
use std::collections::BTreeMap;
use stepdefs_core::catalog::{FieldType, OptionType};
use tree_sitter::Node;

/// Settings visible to an `init` body, keyed by the parameter that carries them
#[derive(Debug, Clone, Copy)]
pub struct SettingsScope<'a> {
    pub param: &'a str,
    pub settings: &'a BTreeMap<String, OptionType>,
}

/// Pattern-matches expression shapes to type expressions
#[derive(Debug, Clone, Copy)]
pub struct ExpressionClassifier<'a> {
    source: &'a str,
    settings: Option<SettingsScope<'a>>,
}

impl<'a> ExpressionClassifier<'a> {
    /// Classifier without access to settings
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            settings: None,
        }
    }

    pub fn with_settings(source: &'a str, settings: SettingsScope<'a>) -> Self {
        Self {
            source,
            settings: Some(settings),
        }
    }

    /// Type of `expr`, or `None` when no rule recognizes its shape
    pub fn classify(&self, expr: Node) -> Option<FieldType> {
        let expr = unparenthesize(expr);
        match expr.kind() {
            "new_expression" => {
                let constructor = expr.child_by_field_name("constructor")?;
                if !matches!(constructor.kind(), "identifier" | "member_expression") {
                    return None;
                }
                Some(FieldType::new(self.text(constructor)?))
            }
            "call_expression" => {
                let callee = self.text(expr.child_by_field_name("function")?)?;
                heuristics::loader_type(callee).map(FieldType::new)
            }
            "subscript_expression" => self.enum_lookup(expr),
            "member_expression" => self
                .setting_read(expr)
                .map(|setting| FieldType::new(setting.ty.clone())),
            "binary_expression" => self.binary(expr),
            "ternary_expression" => self.guarded(expr),
            _ => None,
        }
    }

    fn text(&self, node: Node) -> Option<&'a str> {
        node_text(node, self.source).ok()
    }

    /// `sc.ATTACK_TYPE[settings.type]` is typed as the enum itself
    fn enum_lookup(&self, expr: Node) -> Option<FieldType> {
        let object = expr.child_by_field_name("object")?;
        if !crate::common::is_property_path(object) {
            return None;
        }
        let path = self.text(object)?;
        let last = path.rsplit('.').next()?;
        let screaming = last
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
            && last.chars().any(|c| c.is_ascii_uppercase());
        screaming.then(|| FieldType::new(path))
    }

    /// `settings.name` where `name` is a decomposed setting
    fn setting_read(&self, expr: Node) -> Option<&'a OptionType> {
        let scope = self.settings?;
        let expr = unparenthesize(expr);
        if expr.kind() != "member_expression" {
            return None;
        }
        let object = expr.child_by_field_name("object")?;
        if object.kind() != "identifier" || self.text(object)? != scope.param {
            return None;
        }
        let property = self.text(expr.child_by_field_name("property")?)?;
        scope.settings.get(property)
    }

    fn binary(&self, expr: Node) -> Option<FieldType> {
        let operator = expr.child_by_field_name("operator")?.kind();
        let left = expr.child_by_field_name("left")?;
        let right = expr.child_by_field_name("right")?;

        match operator {
            "||" | "??" => {
                let setting = self.setting_read(left)?;
                if unparenthesize(right).kind() == "null" {
                    Some(FieldType::new(nullable(&setting.ty)))
                } else {
                    Some(FieldType::new(setting.ty.clone()))
                }
            }
            "==" | "===" | "!=" | "!==" => {
                if self.setting_read(left).is_some() || self.setting_read(right).is_some() {
                    Some(FieldType::new("boolean"))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// `settings.x ? settings.x : null` and friends
    fn guarded(&self, expr: Node) -> Option<FieldType> {
        let consequence = expr.child_by_field_name("consequence")?;
        let alternative = expr.child_by_field_name("alternative")?;
        let setting = self.setting_read(consequence)?;
        if unparenthesize(alternative).kind() == "null" {
            Some(FieldType::new(nullable(&setting.ty)))
        } else {
            Some(FieldType::new(setting.ty.clone()))
        }
    }
}

fn nullable(ty: &str) -> String {
    if ty.ends_with(" | null") {
        ty.to_string()
    } else {
        format!("{ty} | null")
    }
}

/// A `this.<field> = <expr>` statement at the top level of an `init` body
#[derive(Debug, Clone, Copy)]
pub struct ThisAssignment<'t> {
    pub field: Node<'t>,
    pub value: Node<'t>,
}

/// Top-level `this.x = ...` statements of a function body
pub fn this_assignments(body: Node) -> Vec<ThisAssignment> {
    named_children(body)
        .into_iter()
        .filter(|stmt| stmt.kind() == "expression_statement")
        .filter_map(|stmt| named_children(stmt).into_iter().next())
        .filter(|expr| expr.kind() == "assignment_expression")
        .filter_map(|assignment| {
            let left = assignment.child_by_field_name("left")?;
            let value = assignment.child_by_field_name("right")?;
            if left.kind() != "member_expression" {
                return None;
            }
            let object = left.child_by_field_name("object")?;
            let field = left.child_by_field_name("property")?;
            (object.kind() == "this" && field.kind() == "property_identifier")
                .then_some(ThisAssignment { field, value })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::{find_kind, parse};
    use pretty_assertions::assert_eq;

    fn settings() -> BTreeMap<String, OptionType> {
        BTreeMap::from([
            ("amount".to_string(), OptionType::new("number")),
            ("name".to_string(), OptionType::optional("string", true)),
            ("target".to_string(), OptionType::new("ig.Event.VarExpression")),
        ])
    }

    /// Classifies the right-hand side of every `this.x = ...` in `init`
    fn classify_init(body: &str) -> Vec<(String, Option<FieldType>)> {
        let source = format!("x = {{ init(settings) {{ {body} }} }};");
        let tree = parse(&source);
        let block = find_kind(tree.root_node(), "statement_block").unwrap();
        let settings = settings();
        let classifier = ExpressionClassifier::with_settings(
            &source,
            SettingsScope {
                param: "settings",
                settings: &settings,
            },
        );
        this_assignments(block)
            .into_iter()
            .map(|a| {
                (
                    node_text(a.field, &source).unwrap().to_string(),
                    classifier.classify(a.value),
                )
            })
            .collect()
    }

    fn ty(name: &str) -> Option<FieldType> {
        Some(FieldType::new(name))
    }

    #[test]
    fn test_defaulted_setting_read() {
        assert_eq!(
            classify_init("this.amount = settings.amount || 0;"),
            vec![("amount".to_string(), ty("number"))]
        );
    }

    #[test]
    fn test_direct_setting_read_takes_only_the_type() {
        // `name` is an optional setting; the field itself is not
        assert_eq!(
            classify_init("this.name = settings.name;"),
            vec![("name".to_string(), Some(FieldType::new("string")))]
        );
    }

    #[test]
    fn test_null_default_and_guard_are_nullable() {
        assert_eq!(
            classify_init(
                "this.a = settings.target || null; this.b = settings.name ? settings.name : null;"
            ),
            vec![
                ("a".to_string(), ty("ig.Event.VarExpression | null")),
                ("b".to_string(), ty("string | null")),
            ]
        );
    }

    #[test]
    fn test_equality_guard_is_boolean() {
        assert_eq!(
            classify_init(r#"this.isAll = settings.name == "ALL";"#),
            vec![("isAll".to_string(), ty("boolean"))]
        );
    }

    #[test]
    fn test_constructor_loader_and_enum_shapes() {
        assert_eq!(
            classify_init(
                r#"this.timer = new sc.Timer(2);
                this.pos = ig.Event.getVec3(settings.target);
                this.kind = sc.ATTACK_TYPE[settings.name];
                this.label = ig.lang.get("sc.gui.label");"#
            ),
            vec![
                ("timer".to_string(), ty("sc.Timer")),
                ("pos".to_string(), ty("Vec3")),
                ("kind".to_string(), ty("sc.ATTACK_TYPE")),
                ("label".to_string(), ty("string")),
            ]
        );
    }

    #[test]
    fn test_unmatched_shapes_yield_nothing() {
        assert_eq!(
            classify_init(
                "this.a = settings.missing || 1; this.b = 3 + 4; this.c = list[0]; this.d = other.amount;"
            ),
            vec![
                ("a".to_string(), None),
                ("b".to_string(), None),
                ("c".to_string(), None),
                ("d".to_string(), None),
            ]
        );
    }

    #[test]
    fn test_only_simple_this_assignments_are_collected() {
        let fields: Vec<String> = classify_init(
            "var local = 1; this.a.b = 2; that.c = 3; if (x) { this.d = 4; } this.e = 5;",
        )
        .into_iter()
        .map(|(name, _)| name)
        .collect();
        assert_eq!(fields, vec!["e".to_string()]);
    }

    #[test]
    fn test_without_settings_scope() {
        let source = "x = { amount: settings.amount, timer: new sc.Timer(1) };";
        let tree = parse(source);
        let classifier = ExpressionClassifier::new(source);

        let new_expr = find_kind(tree.root_node(), "new_expression").unwrap();
        assert_eq!(classifier.classify(new_expr), ty("sc.Timer"));

        let read = find_kind(tree.root_node(), "member_expression").unwrap();
        assert_eq!(classifier.classify(read), None);
    }
}

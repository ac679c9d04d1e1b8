//! Member phase: class definitions, their members and `init` refinement

use super::{PendingInit, Scope, Walker};
use crate::classifier::methods::parameter_names;
use crate::classifier::{
    decompose_config, is_object_member, method_signature, object_member, this_assignments,
    ExpressionClassifier, MemberShape, SettingsScope, CONFIG_FIELD, INIT_METHOD,
};
use crate::common::{named_children, node_text, node_to_text, unparenthesize};
use stepdefs_core::catalog::{BaseFamily, FieldType, UNKNOWN_TYPE};
use stepdefs_core::error::{Error, Result};
use tracing::{debug, warn};
use tree_sitter::Node;

impl<'c, 't> Walker<'c, 't> {
    pub(super) fn visit(&mut self, node: Node<'t>, module: &str, mut scope: Scope) -> Result<()> {
        if node.kind() == "assignment_expression" {
            if let Some((name, base)) = self.class_definition(node)? {
                if let Some(family) = BaseFamily::from_path(&base) {
                    debug!(module = %module, class = %name, family = %family, "Recognized class");
                    self.diagnostics.classes_recognized += 1;
                    scope.family = Some(family);
                }
                scope.namespace.push_back(name);
            }
        } else if let Some(family) = scope.family.filter(|_| is_object_member(node)) {
            return self.visit_member(node, module, &scope, family);
        } else if matches!(
            node.kind(),
            "function_expression" | "arrow_function" | "generator_function"
        ) {
            return Ok(());
        }

        for child in named_children(node) {
            self.visit(child, module, scope.clone())?;
        }
        Ok(())
    }

    /// `<path> = <Base>.extend(...)`, as the assigned path and the base expression
    fn class_definition(&self, node: Node<'t>) -> Result<Option<(String, String)>> {
        let (Some(left), Some(right)) = (
            node.child_by_field_name("left"),
            node.child_by_field_name("right"),
        ) else {
            return Ok(None);
        };
        let right = unparenthesize(right);
        if right.kind() != "call_expression" || right.child_by_field_name("arguments").is_none() {
            return Ok(None);
        }
        let Some(callee) = right.child_by_field_name("function") else {
            return Ok(None);
        };
        if callee.kind() != "member_expression" {
            return Ok(None);
        }
        let (Some(base), Some(property)) = (
            callee.child_by_field_name("object"),
            callee.child_by_field_name("property"),
        ) else {
            return Ok(None);
        };
        if node_text(property, self.source)? != "extend" {
            return Ok(None);
        }

        Ok(Some((
            node_to_text(left, self.source)?,
            node_to_text(base, self.source)?,
        )))
    }

    fn visit_member(
        &mut self,
        node: Node<'t>,
        module: &str,
        scope: &Scope,
        family: BaseFamily,
    ) -> Result<()> {
        let path = scope.member_path();
        let Some(member) = object_member(node, self.source)? else {
            warn!(module = %module, path = %path, "Skipping spread element in class body");
            return Ok(());
        };

        if let MemberShape::NestedObject = member.shape {
            self.diagnostics.nested_objects += 1;
            return Ok(());
        }
        if self.catalog.contains(module, &path) {
            self.diagnostics.known_path_members += 1;
            return Ok(());
        }
        self.extension.entry(module, &path, family);

        match member.shape {
            MemberShape::Method(function) => {
                self.visit_method(module, &path, family, &member.name, function)
            }
            MemberShape::Field(value) => {
                self.visit_field(module, &path, family, &member.name, value)
            }
            MemberShape::NestedObject => Ok(()),
        }
    }

    fn visit_method(
        &mut self,
        module: &str,
        path: &str,
        family: BaseFamily,
        name: &str,
        function: Node<'t>,
    ) -> Result<()> {
        // `this` inside an arrow function is not the instance
        if name == INIT_METHOD
            && self.config.init_field_inference
            && function.kind() != "arrow_function"
        {
            self.pending_inits.push(PendingInit {
                module: module.to_string(),
                path: path.to_string(),
                family,
                method: function,
            });
        }

        if self.resolver.find_function(&family.path(), name)?.is_some() {
            self.diagnostics.inherited_members += 1;
            return Ok(());
        }

        let signature = method_signature(function, self.source)?;
        debug!(path = %path, method = %name, return_type = %signature.return_type, "Inferred method");
        self.extension
            .entry(module, path, family)
            .functions
            .entry(name.to_string())
            .or_insert(signature);
        Ok(())
    }

    fn visit_field(
        &mut self,
        module: &str,
        path: &str,
        family: BaseFamily,
        name: &str,
        value: Option<Node<'t>>,
    ) -> Result<()> {
        if self.resolver.find_field(&family.path(), name)?.is_some() {
            self.diagnostics.inherited_members += 1;
            return Ok(());
        }

        let ty = if name == CONFIG_FIELD {
            FieldType::new(family.config_type())
        } else {
            value
                .and_then(|v| ExpressionClassifier::new(self.source).classify(v))
                .unwrap_or_else(FieldType::unknown)
        };
        debug!(path = %path, field = %name, ty = %ty.ty, "Inferred field");
        self.extension
            .entry(module, path, family)
            .fields
            .entry(name.to_string())
            .or_insert(ty);

        if name == CONFIG_FIELD {
            let value = value.ok_or_else(|| {
                Error::assertion(format!("{CONFIG_FIELD} of {path} has no initializer"))
            })?;
            self.record_settings(module, path, family, value)?;
        }
        Ok(())
    }

    fn record_settings(
        &mut self,
        module: &str,
        path: &str,
        family: BaseFamily,
        value: Node<'t>,
    ) -> Result<()> {
        let settings = decompose_config(value, self.source, self.config.default_implies_optional)?;
        for setting in settings {
            if let Some(tag) = &setting.unrecognized {
                warn!(path = %path, setting = %setting.name, tag = %tag, "Unrecognized option type");
                self.diagnostics
                    .record_unrecognized_tag(path, &setting.name, tag);
            }
            self.extension
                .entry(module, path, family)
                .insert_setting(setting.name, setting.option);
        }
        Ok(())
    }

    /// Refines field types from the `init` bodies queued while visiting a module
    pub(super) fn refine_pending_inits(&mut self) -> Result<()> {
        for pending in std::mem::take(&mut self.pending_inits) {
            self.refine_from_init(pending)?;
        }
        Ok(())
    }

    fn refine_from_init(&mut self, pending: PendingInit<'t>) -> Result<()> {
        let PendingInit {
            module,
            path,
            family,
            method,
        } = pending;
        let Some(body) = method
            .child_by_field_name("body")
            .filter(|body| body.kind() == "statement_block")
        else {
            return Ok(());
        };

        let param = parameter_names(method, self.source)?.into_iter().next();
        let settings = self
            .extension
            .get(&module, &path)
            .and_then(|list| list.settings.clone())
            .unwrap_or_default();
        let classifier = match &param {
            Some(param) => ExpressionClassifier::with_settings(
                self.source,
                SettingsScope {
                    param,
                    settings: &settings,
                },
            ),
            None => ExpressionClassifier::new(self.source),
        };

        for assignment in this_assignments(body) {
            let field = node_text(assignment.field, self.source)?;
            let ty = match classifier.classify(assignment.value) {
                Some(ty) if !mentions_unknown(&ty.ty) => ty,
                _ => {
                    debug!(path = %path, field = %field, "No rule for init assignment");
                    self.diagnostics.unmatched_init_assignments += 1;
                    continue;
                }
            };

            if self.resolver.find_field(&family.path(), field)?.is_some() {
                self.diagnostics.inherited_members += 1;
                continue;
            }

            let list = self.extension.entry(&module, &path, family);
            if list.fields.get(field).is_some_and(|known| !known.is_unknown()) {
                continue;
            }
            debug!(path = %path, field = %field, ty = %ty.ty, "Inferred field from init");
            list.fields.insert(field.to_string(), ty);
            self.diagnostics.init_fields += 1;
        }
        Ok(())
    }
}

/// True when `unknown` appears as a word anywhere in a type expression
fn mentions_unknown(ty: &str) -> bool {
    ty.split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
        .any(|word| word == UNKNOWN_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mentions_unknown() {
        assert!(mentions_unknown("unknown"));
        assert!(mentions_unknown("unknown[]"));
        assert!(mentions_unknown("(string | unknown)[]"));
        assert!(!mentions_unknown("sc.UnknownThing"));
        assert!(!mentions_unknown("number | null"));
    }
}

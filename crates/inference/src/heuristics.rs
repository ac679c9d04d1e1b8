//! Mapping from raw option type tags to declaration type expressions
//!
//! Option descriptors in a `_wm` configuration carry a `_type` tag such as
//! `"Boolean"` or `"VarName"`. Most tags map directly to a type; `Select` and
//! `Array` are composite and look at further descriptor keys.

use stepdefs_core::UNKNOWN_TYPE;

/// Tag of an enumeration-like option whose choices come from `_select`
pub const SELECT_TAG: &str = "Select";

/// Tag of a list option whose element type comes from `_sub`
pub const ARRAY_TAG: &str = "Array";

const TYPE_TAGS: &[(&str, &str)] = &[
    ("Boolean", "boolean"),
    ("Number", "number"),
    ("Integer", "number"),
    ("String", "string"),
    ("VarName", "string"),
    ("EnemySearch", "string"),
    ("Vec3", "Vec3"),
    ("Offset", "Vec3"),
    ("Vec2", "Vec2"),
    ("Face", "Vec2"),
    ("LangLabel", "ig.LangLabel.Data"),
    ("StringExpression", "ig.Event.StringExpression"),
    ("NumberExpression", "ig.Event.NumberExpression"),
    ("BooleanExpression", "ig.Event.BooleanExpression"),
    ("Vec2Expression", "ig.Event.Vec2Expression"),
    ("Vec3Expression", "ig.Event.Vec3Expression"),
    ("NumberVary", "ig.Event.NumberVary"),
    ("VarCondition", "string"),
    ("Quest", "sc.QuestModel.QuestId"),
    ("TaskIndex", "sc.QuestModel.QuestId"),
    ("QuestNameSelect", "sc.QuestModel.QuestId"),
    ("DropSelect", "ig.Database.DropKey"),
    ("Image", "string"),
    ("EffectSelect", "string"),
    ("CollabLabelFilter", "string[]"),
    ("AttackInfo", "sc.AttackInfo.AttackSettings"),
    ("Effect", "ig.EffectHandle.Settings"),
    ("ProxyRef", "sc.ProxyTools.PrepareSrcProxySetting"),
    ("EnemyState", "string"),
    ("Reaction", "string"),
    ("Item", "sc.ItemID"),
    ("Color", "ig.RGBColorData | string"),
    ("EnemyType", "string"),
    ("Timer", "string"),
    ("QuestResetSelect", "string"),
    ("GuiState", "ig.GuiHook.State"),
    ("NumberArray", "number[]"),
    ("WalkAnimConfig", "string | ig.ActorEntity.WalkAnims"),
];

/// Call prefixes whose result type is known
const LOADER_PREFIXES: &[(&str, &str)] = &[
    ("ig.Event.getVec3", "Vec3"),
    ("ig.Event.getVec2", "Vec2"),
    ("ig.lang.get", "string"),
    ("ig.LangLabel.getText", "string"),
    ("ig.game.getEntityByName", "ig.Entity"),
    ("sc.ProxyTools.prepareSrc", "sc.ProxyTools.PrepareSrcProxySetting"),
];

/// Where the choices of a `Select` option come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectSource {
    /// A bare identifier, object literal or array literal
    Opaque,
    /// A string literal naming the choice set
    StringLiteral,
    /// A dotted path to an object whose keys are the choices
    PropertyPath(String),
}

/// A parsed option descriptor, reduced to what type resolution needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub tag: String,
    pub select: Option<SelectSource>,
    pub sub: Option<Box<TypeDescriptor>>,
}

impl TypeDescriptor {
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            select: None,
            sub: None,
        }
    }

    pub fn with_select(mut self, source: SelectSource) -> Self {
        self.select = Some(source);
        self
    }

    pub fn with_sub(mut self, sub: TypeDescriptor) -> Self {
        self.sub = Some(Box::new(sub));
        self
    }
}

/// Outcome of resolving a descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Type(String),
    /// No rule matched this tag
    Unrecognized(String),
}

impl Resolved {
    pub fn type_or_unknown(&self) -> &str {
        match self {
            Self::Type(ty) => ty,
            Self::Unrecognized(_) => UNKNOWN_TYPE,
        }
    }
}

/// Type mapped directly from a tag, if the tag has a direct rule
pub fn direct_type(tag: &str) -> Option<&'static str> {
    TYPE_TAGS
        .iter()
        .find(|(known, _)| *known == tag)
        .map(|(_, ty)| *ty)
}

/// Type of a `Select` option with the given choice source
pub fn select_type(source: &SelectSource) -> String {
    match source {
        SelectSource::Opaque => UNKNOWN_TYPE.to_string(),
        SelectSource::StringLiteral => "string".to_string(),
        SelectSource::PropertyPath(path) => format!("keyof typeof {path}"),
    }
}

/// Appends an array suffix, parenthesising unions
pub fn array_of(element: &str) -> String {
    if element.contains('|') {
        format!("({element})[]")
    } else {
        format!("{element}[]")
    }
}

/// Type produced by a call whose callee text starts with a known loader prefix
pub fn loader_type(callee: &str) -> Option<&'static str> {
    LOADER_PREFIXES
        .iter()
        .find(|(prefix, _)| callee.starts_with(prefix))
        .map(|(_, ty)| *ty)
}

/// Resolves a descriptor to a type expression
pub fn resolve(descriptor: &TypeDescriptor) -> Resolved {
    match descriptor.tag.as_str() {
        SELECT_TAG => match &descriptor.select {
            Some(source) => Resolved::Type(select_type(source)),
            None => Resolved::Unrecognized(descriptor.tag.clone()),
        },
        ARRAY_TAG => match &descriptor.sub {
            Some(sub) => match resolve(sub) {
                Resolved::Type(element) => Resolved::Type(array_of(&element)),
                Resolved::Unrecognized(tag) => Resolved::Unrecognized(tag),
            },
            None => Resolved::Type(array_of(UNKNOWN_TYPE)),
        },
        tag => match direct_type(tag) {
            Some(ty) => Resolved::Type(ty.to_string()),
            None => Resolved::Unrecognized(tag.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_direct_tags() {
        assert_eq!(direct_type("Boolean"), Some("boolean"));
        assert_eq!(direct_type("Integer"), Some("number"));
        assert_eq!(direct_type("Offset"), Some("Vec3"));
        assert_eq!(direct_type("Color"), Some("ig.RGBColorData | string"));
        assert_eq!(direct_type("Mystery"), None);
    }

    #[test]
    fn test_resolve_direct_and_unknown() {
        assert_eq!(
            resolve(&TypeDescriptor::tag("LangLabel")),
            Resolved::Type("ig.LangLabel.Data".to_string())
        );
        let missing = resolve(&TypeDescriptor::tag("Mystery"));
        assert_eq!(missing, Resolved::Unrecognized("Mystery".to_string()));
        assert_eq!(missing.type_or_unknown(), "unknown");
    }

    #[test]
    fn test_select_sources() {
        let select = |source| resolve(&TypeDescriptor::tag(SELECT_TAG).with_select(source));

        assert_eq!(
            select(SelectSource::Opaque),
            Resolved::Type("unknown".to_string())
        );
        assert_eq!(
            select(SelectSource::StringLiteral),
            Resolved::Type("string".to_string())
        );
        assert_eq!(
            select(SelectSource::PropertyPath("sc.ATTACK_TYPE".to_string())),
            Resolved::Type("keyof typeof sc.ATTACK_TYPE".to_string())
        );
        assert_eq!(
            resolve(&TypeDescriptor::tag(SELECT_TAG)),
            Resolved::Unrecognized("Select".to_string())
        );
    }

    #[test]
    fn test_array_elements() {
        let numbers = TypeDescriptor::tag(ARRAY_TAG).with_sub(TypeDescriptor::tag("Number"));
        assert_eq!(resolve(&numbers), Resolved::Type("number[]".to_string()));

        let colors = TypeDescriptor::tag(ARRAY_TAG).with_sub(TypeDescriptor::tag("Color"));
        assert_eq!(
            resolve(&colors),
            Resolved::Type("(ig.RGBColorData | string)[]".to_string())
        );

        let nested = TypeDescriptor::tag(ARRAY_TAG).with_sub(
            TypeDescriptor::tag(ARRAY_TAG).with_sub(TypeDescriptor::tag("Vec2")),
        );
        assert_eq!(resolve(&nested), Resolved::Type("Vec2[][]".to_string()));

        assert_eq!(
            resolve(&TypeDescriptor::tag(ARRAY_TAG)),
            Resolved::Type("unknown[]".to_string())
        );

        let broken = TypeDescriptor::tag(ARRAY_TAG).with_sub(TypeDescriptor::tag("Mystery"));
        assert_eq!(
            resolve(&broken),
            Resolved::Unrecognized("Mystery".to_string())
        );
    }

    #[test]
    fn test_loader_prefixes() {
        assert_eq!(loader_type("ig.Event.getVec3"), Some("Vec3"));
        assert_eq!(loader_type("ig.lang.get"), Some("string"));
        assert_eq!(loader_type("ig.Event.getExpressionValue"), None);
        assert_eq!(loader_type("Math.floor"), None);
    }
}

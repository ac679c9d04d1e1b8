//! Known-type catalog and the additive extension produced by inference
//!
//! The catalog maps a module name to the member paths it declares, and each
//! member path (`ig.EVENT_STEP.SET_MSG`) to its [`MemberList`]. It is read-only
//! for the whole run; newly inferred members go into a [`CatalogExtension`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::{Display, EnumIter, EnumString};

/// Type expression used whenever nothing better is known
pub const UNKNOWN_TYPE: &str = "unknown";

/// Return type of a method whose body only contains bare `return`s
pub const VOID_TYPE: &str = "void";

/// Parents that never carry member information and are skipped by lookups
pub const IGNORED_PARENTS: [&str; 2] = ["ig.Class", "ig.Config"];

/// member path -> member list
pub type PathMap = BTreeMap<String, MemberList>;

/// module name -> member path -> member list
pub type ModuleMap = BTreeMap<String, PathMap>;

/// The three root classes a definition must extend to be eligible for inference
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter,
)]
pub enum BaseFamily {
    #[strum(serialize = "ig.EventStepBase")]
    EventStep,
    #[strum(serialize = "ig.ActionStepBase")]
    ActionStep,
    #[strum(serialize = "ig.EffectStepBase")]
    EffectStep,
}

impl BaseFamily {
    /// Parses a base expression such as `ig.EventStepBase`
    pub fn from_path(path: &str) -> Option<Self> {
        path.parse().ok()
    }

    /// Catalog path of the base class
    pub fn path(self) -> String {
        self.to_string()
    }

    /// Type of the per-instance `_wm` configuration object
    pub fn config_type(self) -> &'static str {
        match self {
            Self::EffectStep => "ig.EffectConfig",
            Self::EventStep | Self::ActionStep => "ig.Config",
        }
    }
}

/// Type of a field or of one configuration option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldType {
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub is_optional: bool,
}

impl FieldType {
    pub fn new(ty: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            is_optional: false,
        }
    }

    pub fn optional(ty: impl Into<String>, is_optional: bool) -> Self {
        Self {
            ty: ty.into(),
            is_optional,
        }
    }

    pub fn unknown() -> Self {
        Self::new(UNKNOWN_TYPE)
    }

    pub fn is_unknown(&self) -> bool {
        self.ty == UNKNOWN_TYPE
    }
}

/// One named entry of a configuration object passed to a constructor
pub type OptionType = FieldType;

/// A single function argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionArg {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub is_optional: bool,
}

impl FunctionArg {
    /// The implicit receiver every inferred signature starts with
    pub fn receiver() -> Self {
        Self {
            name: "this".to_string(),
            ty: "this".to_string(),
            is_optional: false,
        }
    }

    /// A parameter whose type could not be inferred
    pub fn unknown(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: UNKNOWN_TYPE.to_string(),
            is_optional: false,
        }
    }
}

/// Signature of a method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionSig {
    pub return_type: String,
    #[serde(default)]
    pub args: Vec<FunctionArg>,
}

/// Everything known about one member path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberList {
    #[serde(default)]
    pub fields: BTreeMap<String, FieldType>,
    #[serde(default)]
    pub functions: BTreeMap<String, FunctionSig>,
    #[serde(default)]
    pub parents: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<BTreeMap<String, OptionType>>,
}

impl MemberList {
    /// A member list with no members whose only parent is `parent`
    pub fn with_parent(parent: impl Into<String>) -> Self {
        Self {
            parents: vec![parent.into()],
            ..Default::default()
        }
    }

    /// Adds a setting, creating the settings map on first use
    pub fn insert_setting(&mut self, name: impl Into<String>, option: OptionType) {
        self.settings
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), option);
    }

    pub fn setting(&self, name: &str) -> Option<&OptionType> {
        self.settings.as_ref()?.get(name)
    }

    pub fn is_effect(&self) -> bool {
        let effect = BaseFamily::EffectStep.path();
        self.parents.iter().any(|p| *p == effect)
    }
}

/// Read-only catalog of curated type information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ModuleMap", into = "ModuleMap")]
pub struct Catalog {
    modules: ModuleMap,
    owners: BTreeMap<String, String>,
}

impl From<ModuleMap> for Catalog {
    fn from(modules: ModuleMap) -> Self {
        let owners = modules
            .iter()
            .flat_map(|(module, paths)| {
                paths
                    .keys()
                    .map(move |path| (path.clone(), module.clone()))
            })
            .collect();
        Self { modules, owners }
    }
}

impl From<Catalog> for ModuleMap {
    fn from(catalog: Catalog) -> Self {
        catalog.modules
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a catalog from its JSON representation
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Member list declared by `module` for `path`
    pub fn get(&self, module: &str, path: &str) -> Option<&MemberList> {
        self.modules.get(module)?.get(path)
    }

    pub fn contains(&self, module: &str, path: &str) -> bool {
        self.get(module, path).is_some()
    }

    /// Module that declares `path`
    pub fn module_of(&self, path: &str) -> Option<&str> {
        self.owners.get(path).map(String::as_str)
    }

    /// Member list for `path`, wherever it is declared
    pub fn member(&self, path: &str) -> Option<&MemberList> {
        let module = self.module_of(path)?;
        self.get(module, path)
    }

    /// Adds or replaces one member list
    pub fn insert(&mut self, module: impl Into<String>, path: impl Into<String>, list: MemberList) {
        let module = module.into();
        let path = path.into();
        self.owners.insert(path.clone(), module.clone());
        self.modules.entry(module).or_default().insert(path, list);
    }

    pub fn modules(&self) -> impl Iterator<Item = (&String, &PathMap)> {
        self.modules.iter()
    }

    /// Number of member paths across all modules
    pub fn len(&self) -> usize {
        self.modules.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Newly discovered member paths produced by one inference run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogExtension {
    modules: ModuleMap,
}

impl CatalogExtension {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches the entry for `path`, creating it with `family` as its sole parent
    pub fn entry(&mut self, module: &str, path: &str, family: BaseFamily) -> &mut MemberList {
        let list = self
            .modules
            .entry(module.to_string())
            .or_default()
            .entry(path.to_string())
            .or_default();
        if list.parents.is_empty() {
            list.parents.push(family.path());
        }
        list
    }

    pub fn get(&self, module: &str, path: &str) -> Option<&MemberList> {
        self.modules.get(module)?.get(path)
    }

    pub fn contains(&self, module: &str, path: &str) -> bool {
        self.get(module, path).is_some()
    }

    pub fn modules(&self) -> impl Iterator<Item = (&String, &PathMap)> {
        self.modules.iter()
    }

    /// Number of member paths across all modules
    pub fn len(&self) -> usize {
        self.modules.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies every entry into `catalog`, leaving existing entries untouched
    pub fn merge_into(&self, catalog: &mut Catalog) {
        for (module, paths) in &self.modules {
            for (path, list) in paths {
                if !catalog.contains(module, path) {
                    catalog.insert(module.clone(), path.clone(), list.clone());
                }
            }
        }
    }
}

//! Declaration module rendering and writing

use pretty_assertions::assert_eq;
use stepdefs::writer::{render_module, write_extension, WriteSummary};
use stepdefs_core::catalog::{
    BaseFamily, CatalogExtension, FieldType, FunctionArg, FunctionSig, MemberList, PathMap,
};
use tempfile::TempDir;

fn event_step() -> MemberList {
    let mut list = MemberList::with_parent("ig.EventStepBase");
    list.fields
        .insert("_wm".to_string(), FieldType::new("ig.Config"));
    list.functions.insert(
        "run".to_string(),
        FunctionSig {
            return_type: "void".to_string(),
            args: vec![FunctionArg::receiver(), FunctionArg::unknown("a")],
        },
    );
    list.insert_setting("flag", FieldType::new("boolean"));
    list
}

#[test]
fn test_render_single_step() {
    let mut entries = PathMap::new();
    entries.insert("ig.EVENT_STEP.X".to_string(), event_step());

    let expected = concat!(
        "// header\n",
        "\n",
        "export {};\n",
        "\n",
        "declare global {\n",
        "  namespace ig {\n",
        "    namespace EVENT_STEP {\n",
        "      namespace X {\n",
        "        interface Settings {\n",
        "          flag: boolean;\n",
        "        }\n",
        "      }\n",
        "      interface X extends ig.EventStepBase {\n",
        "        _wm: ig.Config;\n",
        "        \n",
        "        run(this: this, a: unknown): void;\n",
        "      }\n",
        "      interface X_CONSTRUCTOR extends ImpactClass<X> {\n",
        "          new (settings: ig.EVENT_STEP.X.Settings): X;\n",
        "      }\n",
        "      var X: X_CONSTRUCTOR;\n",
        "    }\n",
        "  }\n",
        "}",
    );
    assert_eq!(render_module("// header", &entries).unwrap(), expected);
}

#[test]
fn test_render_groups_namespaces_and_effect_constructor() {
    let mut effect = MemberList::with_parent("ig.EffectStepBase");
    effect
        .fields
        .insert("label".to_string(), FieldType::optional("string", true));

    let mut action = MemberList::with_parent("ig.ActionStepBase");
    action.functions.insert(
        "start".to_string(),
        FunctionSig {
            return_type: "unknown".to_string(),
            args: vec![FunctionArg::receiver()],
        },
    );

    let mut entries = PathMap::new();
    entries.insert("ig.ACTION_STEP.A".to_string(), action.clone());
    entries.insert("ig.ACTION_STEP.B".to_string(), action);
    entries.insert("ig.EFFECT_ENTRY.C".to_string(), effect);

    let text = render_module("", &entries).unwrap();

    assert_eq!(text.matches("    namespace ACTION_STEP {").count(), 1);
    assert_eq!(text.matches("    namespace EFFECT_ENTRY {").count(), 1);
    assert!(text.contains("        start(this: this): unknown;\n"));
    assert!(text.contains("        label?: string;\n"));
    assert!(text.contains(
        "          new (sheet: ig.EffectSheet, settings: ig.EFFECT_ENTRY.C.Settings): C;\n"
    ));
    assert!(text.contains("          new (settings: ig.ACTION_STEP.A.Settings): A;\n"));
    // Whitespace-only line between steps, none after the last
    assert!(text.contains("      var A: A_CONSTRUCTOR;\n      \n      namespace B {"));
    assert!(!text.contains("\n\n      namespace"));
    assert!(text.ends_with("      var C: C_CONSTRUCTOR;\n    }\n  }\n}"));
}

#[tokio::test]
async fn test_write_extension_headers_and_counts() {
    let out = TempDir::new().unwrap();
    let ultimate = TempDir::new().unwrap();
    let modules = ultimate.path().join("modules");
    std::fs::create_dir_all(&modules).unwrap();
    std::fs::write(
        modules.join("game.feature.a.d.ts"),
        "// Module a\n// more notes\n\nexport {};\ndeclare global {}\n",
    )
    .unwrap();
    std::fs::write(modules.join("game.feature.b.d.ts"), "\n// Only prose\n").unwrap();

    let mut extension = CatalogExtension::new();
    for module in ["game.feature.a", "game.feature.b", "game.feature.c"] {
        extension.entry(module, "ig.EVENT_STEP.X", BaseFamily::EventStep);
    }

    let out_dir = out.path().join("nested").join("out");
    let summary = write_extension(&extension, &out_dir, ultimate.path(), 2)
        .await
        .unwrap();

    assert_eq!(
        summary,
        WriteSummary {
            with_declarations: 1,
            without_declarations: 2,
        }
    );
    assert_eq!(summary.modules_written(), 3);

    let a = std::fs::read_to_string(out_dir.join("game.feature.a.d.ts")).unwrap();
    assert!(a.starts_with("// Module a\n// more notes\n\nexport {};"));
    let b = std::fs::read_to_string(out_dir.join("game.feature.b.d.ts")).unwrap();
    assert!(b.starts_with("// Only prose\n\nexport {};"));
    let c = std::fs::read_to_string(out_dir.join("game.feature.c.d.ts")).unwrap();
    assert!(c.starts_with("\n\nexport {};"));
}

#[tokio::test]
async fn test_write_extension_fails_on_bad_path() {
    let out = TempDir::new().unwrap();
    let mut extension = CatalogExtension::new();
    extension.entry("game.feature.a", "ig.TOO.MANY.SEGMENTS", BaseFamily::EventStep);

    let err = write_extension(&extension, out.path(), out.path(), 4)
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("three segments"));
}

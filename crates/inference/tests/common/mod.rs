//! Shared fixtures for inference integration tests

#![allow(dead_code)]

use stepdefs_core::catalog::Catalog;
use stepdefs_core::config::InferenceConfig;
use stepdefs_inference::{InferenceEngine, InferenceOutput};

/// Curated entries for the step base families
pub const BASE_CATALOG: &str = r#"{
    "impact.base.event": {
        "ig.EventStepBase": {
            "fields": { "_nextStep": { "type": "ig.EventStepBase" } },
            "functions": {
                "start": { "returnType": "void", "args": [{ "name": "this", "type": "this" }] }
            },
            "parents": ["ig.Class"]
        }
    },
    "impact.base.action": {
        "ig.ActionStepBase": {
            "fields": { "_nextStep": { "type": "ig.ActionStepBase" } },
            "functions": {
                "run": { "returnType": "boolean", "args": [{ "name": "this", "type": "this" }] }
            },
            "parents": ["ig.Class"]
        }
    }
}"#;

/// A single event step with a configuration and one method
pub const EVENT_STEP_SCRIPT: &str = r#"
ig.module("game.feature.x")
    .requires("impact.base.event")
    .defines(function () {
        ig.EVENT_STEP.X = ig.EventStepBase.extend({
            _wm: new ig.Config({ attributes: { flag: { _type: "Boolean" } } }),
            run(a) {
                return;
            }
        });
    });
"#;

/// An action step whose field types are only visible in `init`
pub const ACTION_STEP_SCRIPT: &str = r#"
ig.module("game.feature.combat.steps")
    .requires("impact.base.action", "game.feature.combat.model")
    .defines(function () {
        ig.ACTION_STEP.DEAL_DAMAGE = ig.ActionStepBase.extend({
            amount: 0,
            timer: null,
            _nextStep: null,
            _wm: new ig.Config({
                attributes: {
                    amount: { _type: "Number", _default: 1 },
                    target: { _type: "Select", _select: sc.COMBAT_TARGET },
                    label: { _type: "LangLabel", _optional: true },
                    odd: { _type: "Mystery" }
                }
            }),
            init: function (settings) {
                this.amount = settings.amount || 0;
                this.target = sc.COMBAT_TARGET[settings.target];
                this.timer = new sc.Timer(1);
                this.label = settings.label;
                this.mystery = computeIt(settings);
            },
            start: function (target) {
                if (!target) return;
                target.hit(this.amount);
            },
            getDamage: function () {
                return this.amount;
            }
        });

        sc.CombatHelper = ig.Class.extend({
            helper: function () {}
        });
    });
"#;

pub fn base_catalog() -> Catalog {
    Catalog::from_json(BASE_CATALOG).expect("fixture catalog is valid")
}

pub fn infer(catalog: &Catalog, source: &str) -> InferenceOutput {
    infer_with(catalog, source, InferenceConfig::default())
}

pub fn infer_with(catalog: &Catalog, source: &str, config: InferenceConfig) -> InferenceOutput {
    InferenceEngine::new(catalog, config)
        .infer_source(source)
        .expect("inference should succeed")
}

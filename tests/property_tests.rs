//! Property-based tests for flag resolution and plan derivation.
//!
//! These tests use proptest to verify the branch-selection invariants
//! hold across arbitrary flag values, not just the handful of literals
//! the unit tests cover.

use std::collections::HashMap;

use proptest::prelude::*;

use gantry::core::config::schema::PipelineConfig;
use gantry::core::flags::{EnvFlags, CHECK_DOCS, CHECK_FORMATTING};
use gantry::engine::plan::{Plan, PlanStep};
use gantry::engine::planner::build_plan;

/// Strategy for plausible environment values, including the truthy "1",
/// common almost-truthy spellings, and arbitrary short strings.
fn env_value() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("1".to_string())),
        Just(Some("0".to_string())),
        Just(Some("true".to_string())),
        Just(Some("yes".to_string())),
        Just(Some(String::new())),
        proptest::string::string_regex("[ -~]{0,8}")
            .unwrap()
            .prop_map(Some),
    ]
}

fn flags_from(docs: &Option<String>, formatting: &Option<String>) -> EnvFlags {
    let mut env = HashMap::new();
    if let Some(v) = docs {
        env.insert(CHECK_DOCS.to_string(), v.clone());
    }
    if let Some(v) = formatting {
        env.insert(CHECK_FORMATTING.to_string(), v.clone());
    }
    EnvFlags::from_lookup(|name| env.get(name).cloned())
}

fn config() -> PipelineConfig {
    PipelineConfig {
        package: Some("pkg".to_string()),
        ..Default::default()
    }
}

fn has_docs_steps(plan: &Plan) -> bool {
    plan.steps
        .iter()
        .any(|s| s.description().contains("changelog"))
}

fn has_test_steps(plan: &Plan) -> bool {
    plan.steps
        .iter()
        .any(|s| s.description().contains("test suite"))
}

proptest! {
    /// Exactly one of the two branches is planned, never both, never
    /// neither, regardless of the flag values.
    #[test]
    fn exactly_one_branch_is_planned(docs in env_value(), formatting in env_value()) {
        let flags = flags_from(&docs, &formatting);
        let plan = build_plan(&flags, &config()).unwrap();

        prop_assert_ne!(has_docs_steps(&plan), has_test_steps(&plan));
    }

    /// The docs branch is selected iff the flag value is exactly "1".
    #[test]
    fn docs_branch_iff_literal_one(docs in env_value(), formatting in env_value()) {
        let flags = flags_from(&docs, &formatting);
        let plan = build_plan(&flags, &config()).unwrap();

        let expect_docs = docs.as_deref() == Some("1");
        prop_assert_eq!(has_docs_steps(&plan), expect_docs);
        prop_assert_eq!(plan.command == "docs", expect_docs);
    }

    /// The formatting check appears iff the test branch is taken and the
    /// formatting flag is exactly "1", and then always before the suite.
    #[test]
    fn formatting_step_placement(docs in env_value(), formatting in env_value()) {
        let flags = flags_from(&docs, &formatting);
        let plan = build_plan(&flags, &config()).unwrap();

        let descs: Vec<String> = plan.steps.iter().map(|s| s.description()).collect();
        let fmt = descs.iter().position(|d| d == "check formatting");

        let expect_fmt = docs.as_deref() != Some("1") && formatting.as_deref() == Some("1");
        prop_assert_eq!(fmt.is_some(), expect_fmt);

        if let Some(fmt) = fmt {
            let tests = descs.iter().position(|d| d.contains("test suite")).unwrap();
            prop_assert!(fmt < tests);
        }
    }

    /// The common prefix is identical for both branches.
    #[test]
    fn common_prefix_is_stable(docs in env_value(), formatting in env_value()) {
        let flags = flags_from(&docs, &formatting);
        let plan = build_plan(&flags, &config()).unwrap();

        prop_assert_eq!(&plan.steps[0], &PlanStep::PrintRevision);
        prop_assert_eq!(&plan.steps[1], &PlanStep::PrintInterpreterInfo);
        prop_assert_eq!(plan.steps[2].description(), "upgrade packaging tools");
        prop_assert_eq!(plan.steps[3].description(), "build source distribution");
        prop_assert_eq!(
            plan.steps[4].description(),
            "install package from source distribution"
        );
    }

    /// Same inputs, same plan, same digest.
    #[test]
    fn plans_and_digests_are_deterministic(docs in env_value(), formatting in env_value()) {
        let flags = flags_from(&docs, &formatting);
        let a = build_plan(&flags, &config()).unwrap();
        let b = build_plan(&flags, &config()).unwrap();

        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.digest(), b.digest());
    }
}

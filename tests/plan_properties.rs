//! Property tests for the plan contract, the resolver and the fast path

use std::sync::Arc;

use desk_agent::capability::{builtin, ids};
use desk_agent::core::config::AgentConfig;
use desk_agent::core::types::{Language, Params, Platform, Resource};
use desk_agent::matcher::{PatternMatcher, FAST_PATH_CONFIDENCE};
use desk_agent::plan::{Condition, Plan, Step};
use desk_agent::platform::{PlatformResolver, StaticProbe};
use desk_agent::session::SessionSnapshot;
use proptest::prelude::*;
use serde_json::json;

fn arb_language() -> impl Strategy<Value = Language> {
    prop_oneof![Just(Language::English), Just(Language::Arabic)]
}

fn arb_params() -> impl Strategy<Value = Params> {
    prop::collection::btree_map(
        "[a-z_]{1,8}",
        prop_oneof![
            "[a-zA-Z0-9 ]{0,12}".prop_map(|s| json!(s)),
            (-1000i64..1000).prop_map(|n| json!(n)),
            any::<bool>().prop_map(|b| json!(b)),
        ],
        0..4,
    )
}

fn arb_condition(earlier: usize) -> impl Strategy<Value = Option<Condition>> {
    let step = 1..=earlier.max(1);
    prop_oneof![
        Just(None),
        step.clone().prop_map(|s| Some(Condition::StepSucceeded { step: s })),
        step.prop_map(|s| Some(Condition::Not {
            condition: Box::new(Condition::StepFailed { step: s })
        })),
        "[a-z_]{1,10}".prop_map(|slot| Some(Condition::SlotPresent { slot })),
    ]
}

fn arb_steps() -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec(
        (
            prop::sample::select(vec![ids::CALCULATE, ids::OPEN_URL, ids::TYPE_TEXT, ids::GET_TIME]),
            arb_params(),
            0u8..=100,
            "[a-z ]{0,16}",
            arb_condition(3),
        ),
        1..5,
    )
    .prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (cap, params, confidence, description, condition))| {
                let mut step = Step::new(i + 1, cap, params)
                    .with_confidence(f32::from(confidence) / 100.0)
                    .with_description(description);
                step.condition = condition;
                step
            })
            .collect()
    })
}

fn arb_plan() -> impl Strategy<Value = Plan> {
    (
        arb_steps(),
        arb_language(),
        prop::collection::vec((arb_steps(), arb_language()), 0..3),
    )
        .prop_map(|(steps, language, alternatives)| {
            alternatives
                .into_iter()
                .fold(Plan::new(steps, language).unwrap(), |plan, (steps, lang)| {
                    plan.with_alternative(Plan::new(steps, lang).unwrap())
                })
        })
}

proptest! {
    /// Serializing a plan and parsing it back yields the same plan
    #[test]
    fn prop_plan_json_round_trip(plan in arb_plan()) {
        let json = plan.to_json().unwrap();
        let parsed = Plan::from_json(&json).unwrap();
        prop_assert_eq!(parsed, plan);
    }

    /// Alternatives come out best-first and keep declared order on ties
    #[test]
    fn prop_alternatives_ranked_by_confidence(plan in arb_plan()) {
        let ranked = plan.ranked_alternatives();
        prop_assert_eq!(ranked.len(), plan.alternatives().len());
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].overall_confidence() >= pair[1].overall_confidence());
        }
    }

    /// Resolving the same capability twice gives the same implementation
    #[test]
    fn prop_resolve_is_idempotent(
        id in prop::sample::select(vec![
            ids::TAKE_SCREENSHOT, ids::OPEN_URL, ids::CALCULATE,
            ids::GET_WEATHER, ids::TYPE_TEXT, ids::CLOSE_APPLICATION,
        ]),
        host in prop_oneof![Just(Platform::Mac), Just(Platform::Linux), Just(Platform::Windows)],
        no_display in any::<bool>(),
        no_network in any::<bool>(),
    ) {
        let config = AgentConfig::default();
        let mut probe = StaticProbe::all_available();
        if no_display {
            probe = probe.without(Resource::Display);
        }
        if no_network {
            probe = probe.without(Resource::Network);
        }
        let resolver = PlatformResolver::new(
            Arc::new(builtin::registry(&config).unwrap()),
            host,
            Arc::new(probe),
        );

        let first = resolver.resolve(id).unwrap();
        let second = resolver.resolve(id).unwrap();
        prop_assert!(Arc::ptr_eq(&first.implementation, &second.implementation));
        prop_assert_eq!(first.tag, second.tag);
        prop_assert_eq!(first.degraded, second.degraded);
    }

    /// Fast-path plans are single-step, near-certain and carry no alternatives
    #[test]
    fn prop_fast_path_plan_shape(
        text in prop::sample::select(vec![
            "take a screenshot",
            "what time is it",
            "open firefox",
            "type hello world",
            "press enter",
            "search for rust async traits",
            "calculate 4 * 8",
            "خذ لقطة شاشة",
            "كم الساعة",
            "افتح كروم",
        ]),
        padding in "[ ]{0,3}",
    ) {
        let matcher = PatternMatcher::new(Language::English).unwrap();
        let input = format!("{}{}{}", padding, text, padding);
        let m = matcher.match_command(&input, None, &SessionSnapshot::default()).unwrap();
        prop_assert_eq!(m.plan.steps().len(), 1);
        prop_assert!(m.plan.alternatives().is_empty());
        prop_assert!(m.plan.steps()[0].confidence >= 0.9);
        prop_assert_eq!(m.plan.steps()[0].confidence, FAST_PATH_CONFIDENCE);
    }

    /// Arbitrary non-Arabic text never produces an Arabic plan without a hint
    #[test]
    fn prop_fast_path_language_follows_script(text in "[a-z ]{1,30}") {
        let matcher = PatternMatcher::new(Language::English).unwrap();
        if let Some(m) = matcher.match_command(&text, None, &SessionSnapshot::default()) {
            prop_assert_eq!(m.plan.language(), Language::English);
        }
    }
}

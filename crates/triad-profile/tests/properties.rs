//! Property tests over ids, dynamics, matching, compatibility, role
//! resolution and exemplar ranking.

use proptest::prelude::*;
use triad_profile::*;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn engine() -> ProfileEngine {
    ProfileEngine::canonical(EngineConfig::default()).unwrap()
}

fn arb_trigram() -> impl Strategy<Value = u8> {
    1u8..=8
}

fn arb_archetype() -> impl Strategy<Value = u8> {
    1u8..=64
}

/// A user vector with small, possibly negative components.
fn arb_vector() -> impl Strategy<Value = UserVector> {
    prop::array::uniform8(-5.0f64..10.0).prop_map(UserVector::from_array)
}

/// A tag drawn from dimension names, trigram keywords and noise.
fn arb_tag() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("creativity"),
        Just("harmony"),
        Just("exploration"),
        Just("earth"),
        Just("leadership"),
        Just("caution"),
        Just("patience"),
        Just("diplomacy"),
        Just("energy"),
        Just("unknown"),
    ]
    .prop_map(String::from)
}

fn arb_answer() -> impl Strategy<Value = Answer> {
    (
        prop_oneof![
            Just(AnswerCategory::Worldview),
            Just(AnswerCategory::ScenarioInner),
            Just(AnswerCategory::ScenarioOuter),
        ],
        prop::collection::vec((arb_tag(), 0.0f64..5.0), 0..3),
        prop::collection::vec((arb_tag(), 0.0f64..5.0), 0..2),
        prop::collection::vec((arb_tag(), 0.0f64..5.0), 0..2),
    )
        .prop_map(|(category, tags, inner, outer)| {
            let mut answer = Answer::new("q", category);
            for (tag, weight) in tags {
                answer = answer.with_tag(tag, weight);
            }
            for (tag, weight) in inner {
                answer = answer.with_inner_tag(tag, weight);
            }
            for (tag, weight) in outer {
                answer = answer.with_outer_tag(tag, weight);
            }
            answer
        })
}

fn arb_answer_set() -> impl Strategy<Value = AnswerSet> {
    prop::collection::vec(arb_answer(), 0..8).prop_map(AnswerSet::new)
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// id and (upper, lower) convert into each other exactly.
    #[test]
    fn archetype_id_round_trip(upper in arb_trigram(), lower in arb_trigram()) {
        let u = TrigramId::new(upper).unwrap();
        let l = TrigramId::new(lower).unwrap();
        let id = ArchetypeId::from_trigrams(u, l);
        prop_assert_eq!(id.get(), (upper - 1) * 8 + lower);
        prop_assert_eq!(id.trigrams(), (u, l));
    }

    /// Canonical dynamics stay on the 0-10 scale and repeat bit for bit.
    #[test]
    fn dynamics_bounded_and_deterministic(upper in arb_trigram(), lower in arb_trigram()) {
        let engine = engine();
        let a = engine.compute_dynamics(upper, lower, None).unwrap();
        let b = engine.compute_dynamics(upper, lower, None).unwrap();
        prop_assert!(a.value.is_in_range());
        prop_assert_eq!(a.provenance, Provenance::Canonical);
        for property in TraitProperty::ALL {
            prop_assert_eq!(a.value.get(property).to_bits(), b.value.get(property).to_bits());
        }
    }

    /// Any invalid id with context is estimated, never canonical.
    #[test]
    fn estimated_dynamics_are_marked(invalid in 9u8..=255, valid in arb_trigram(), vector in arb_vector()) {
        let engine = engine();
        let context = FallbackContext::UserVector(vector);
        let r = engine.compute_dynamics(invalid, valid, Some(&context)).unwrap();
        prop_assert_eq!(r.provenance, Provenance::Estimated);
        prop_assert!(r.confidence < 1.0);
        prop_assert!(r.value.is_in_range());
    }

    /// Ranking is non-increasing with ascending ids on ties.
    #[test]
    fn ranking_is_sorted(vector in arb_vector()) {
        let engine = engine();
        let ranked = rank_archetypes(&vector, engine.table()).unwrap();
        prop_assert_eq!(ranked.len(), 64);
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].similarity >= pair[1].similarity);
            if pair[0].similarity == pair[1].similarity {
                prop_assert!(pair[0].id < pair[1].id);
            }
        }
    }

    /// Compatibility does not depend on argument order.
    #[test]
    fn compatibility_is_symmetric(a in arb_archetype(), b in arb_archetype()) {
        let engine = engine();
        let ab = engine.evaluate_compatibility(a, b).unwrap();
        let ba = engine.evaluate_compatibility(b, a).unwrap();
        prop_assert!(ab.scores.is_in_range());
        prop_assert_eq!(ab, ba);
    }

    /// Interface and SafeMode never share the Engine's archetype.
    #[test]
    fn roles_exclude_engine(answers in arb_answer_set()) {
        let engine = engine();
        let profile = engine.analyze(&answers).unwrap();
        prop_assert_ne!(profile.interface.archetype, profile.engine.archetype);
        prop_assert_ne!(profile.safe_mode.archetype, profile.engine.archetype);
        prop_assert!((0.0..=1.0).contains(&profile.effectiveness));
        prop_assert!((0.0..=1.0).contains(&profile.confidence));
    }

    /// Exemplar hits are at most three, all strictly above the threshold,
    /// sorted by similarity.
    #[test]
    fn exemplar_matches_are_bounded(e in arb_archetype(), i in arb_archetype(), s in arb_archetype()) {
        let engine = engine();
        let triple = RoleTriple::new(
            ArchetypeId::new(e).unwrap(),
            ArchetypeId::new(i).unwrap(),
            ArchetypeId::new(s).unwrap(),
        );
        let matches = engine.exemplars().find_matches(&triple, &ExemplarConfig::default());
        prop_assert!(matches.len() <= 3);
        prop_assert!(matches.iter().all(|m| m.similarity > 0.6));
        for pair in matches.windows(2) {
            prop_assert!(pair[0].similarity >= pair[1].similarity);
        }
    }
}

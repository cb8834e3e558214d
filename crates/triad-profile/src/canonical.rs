use std::collections::{BTreeMap, BTreeSet};

use crate::exemplar::ExemplarRecord;
use crate::table::{Archetype, Trigram};
use crate::types::{ArchetypeId, Dimension, TraitScores, TrigramId};

struct TrigramData {
    name: &'static str,
    /// innovation, stability, cooperation, independence, intuition,
    /// resilience, adaptability, protection, support_seeking, introspection
    properties: [f64; 10],
    keywords: [&'static str; 5],
}

/// Base trigram data in id order (1 Heaven .. 8 Earth).
const TRIGRAMS: [TrigramData; 8] = [
    TrigramData {
        name: "Heaven",
        properties: [9.0, 7.0, 4.0, 9.0, 6.0, 8.0, 5.0, 6.0, 2.0, 5.0],
        keywords: ["creativity", "leadership", "initiative", "strength", "vision"],
    },
    TrigramData {
        name: "Lake",
        properties: [6.0, 4.0, 9.0, 4.0, 6.0, 5.0, 7.0, 3.0, 8.0, 4.0],
        keywords: ["harmony", "joy", "communication", "openness", "persuasion"],
    },
    TrigramData {
        name: "Fire",
        properties: [8.0, 4.0, 6.0, 6.0, 8.0, 5.0, 7.0, 4.0, 5.0, 6.0],
        keywords: ["expression", "clarity", "passion", "insight", "visibility"],
    },
    TrigramData {
        name: "Thunder",
        properties: [9.0, 3.0, 4.0, 8.0, 7.0, 7.0, 6.0, 5.0, 3.0, 3.0],
        keywords: ["action", "innovation", "decisiveness", "energy", "challenge"],
    },
    TrigramData {
        name: "Wind",
        properties: [6.0, 5.0, 8.0, 4.0, 7.0, 6.0, 9.0, 4.0, 6.0, 6.0],
        keywords: ["adaptability", "diplomacy", "flexibility", "influence", "cooperation"],
    },
    TrigramData {
        name: "Water",
        properties: [5.0, 5.0, 4.0, 6.0, 9.0, 9.0, 7.0, 7.0, 4.0, 8.0],
        keywords: ["exploration", "analysis", "caution", "depth", "endurance"],
    },
    TrigramData {
        name: "Mountain",
        properties: [3.0, 9.0, 4.0, 7.0, 6.0, 7.0, 3.0, 9.0, 3.0, 9.0],
        keywords: ["stability", "patience", "reflection", "boundaries", "withdrawal"],
    },
    TrigramData {
        name: "Earth",
        properties: [3.0, 8.0, 9.0, 2.0, 6.0, 7.0, 6.0, 6.0, 8.0, 6.0],
        keywords: ["receptivity", "support", "nurturing", "collaboration", "acceptance"],
    },
];

/// The eight built-in trigrams.
pub fn canonical_trigrams() -> Vec<Trigram> {
    TrigramId::all()
        .zip(TRIGRAMS.iter())
        .map(|(id, data)| Trigram {
            id,
            name: data.name.to_string(),
            properties: TraitScores::from_fn(|p| data.properties[p as usize]),
            keywords: data.keywords.iter().map(|k| k.to_string()).collect(),
        })
        .collect()
}

/// The 64 built-in archetypes.
///
/// Each archetype is named "{upper} over {lower}" and inherits the keywords
/// of both trigrams plus their dimension names.
pub fn canonical_archetypes() -> Vec<Archetype> {
    derive_archetypes(&canonical_trigrams())
}

/// Build the full archetype set from a trigram set.
///
/// Produces one archetype per ordered pair of the given trigrams.
pub fn derive_archetypes(trigrams: &[Trigram]) -> Vec<Archetype> {
    let mut archetypes = Vec::with_capacity(trigrams.len() * trigrams.len());
    for upper in trigrams {
        for lower in trigrams {
            let keywords: BTreeSet<String> = [upper, lower]
                .into_iter()
                .flat_map(|t| {
                    let dimension = Dimension::ALL[t.id.index()].as_str().to_string();
                    t.keywords.iter().cloned().chain(std::iter::once(dimension))
                })
                .collect();
            archetypes.push(Archetype {
                id: ArchetypeId::from_trigrams(upper.id, lower.id),
                upper: upper.id,
                lower: lower.id,
                name: format!("{} over {}", upper.name, lower.name),
                keywords,
                hooks: BTreeMap::new(),
            });
        }
    }
    archetypes
}

/// Reference triples of well-known figures, grouped by pattern family.
pub fn canonical_exemplars() -> Vec<ExemplarRecord> {
    let record = |name: &str,
                  family: &str,
                  triple: [u8; 3],
                  description: &str,
                  traits: [&str; 3],
                  modern_application: &str| ExemplarRecord {
        name: name.to_string(),
        family: family.to_string(),
        engine: triple[0],
        interface: triple[1],
        safe_mode: triple[2],
        description: description.to_string(),
        traits: traits.iter().map(|t| t.to_string()).collect(),
        modern_application: modern_application.to_string(),
    };
    vec![
        record(
            "Leonardo da Vinci",
            "Creative genius",
            [1, 49, 33],
            "Fused art and science; creative drive with experimental, introspective observation.",
            [
                "Creativity across many fields",
                "Observation and experiment first",
                "Introverted curiosity",
            ],
            "A creator who pursues innovation while seeing to the heart of things",
        ),
        record(
            "Albert Einstein",
            "Creative genius",
            [1, 61, 52],
            "Intuitive insight and rigorous thought held together by an independent mind.",
            [
                "Intuitive insight",
                "Independent thinking",
                "Questions established concepts",
            ],
            "A leader whose ideas break existing frames and yield novel solutions",
        ),
        record(
            "Prince Shotoku",
            "Harmonious integrator",
            [11, 45, 15],
            "Integrated differing values into a balanced, long-sighted social order.",
            [
                "Embraces diversity",
                "Integrative thinking",
                "Long-term perspective",
            ],
            "A manager who unites diverse teams and keeps the whole organisation in balance",
        ),
        record(
            "Nelson Mandela",
            "Harmonious integrator",
            [11, 19, 8],
            "Moved past conflict toward reconciliation through patience and tolerance.",
            ["Tolerance", "Patience", "Integrative leadership"],
            "A leader who holds people together in hard times and finds constructive solutions",
        ),
        record(
            "Steve Jobs",
            "Transformational leader",
            [1, 43, 51],
            "Reshaped industries with a perfectionist, relentless drive for change.",
            [
                "Perfectionism",
                "Obsession with innovation",
                "Intense vision",
            ],
            "An entrepreneur who overturns industry standards and creates new value",
        ),
        record(
            "Marie Curie",
            "Explorer",
            [3, 57, 29],
            "Pioneering researcher carried by passion for science and persistence.",
            ["Passion for science", "Tenacity", "Pioneering spirit"],
            "A researcher who takes on unknown territory and opens up new knowledge",
        ),
    ]
}

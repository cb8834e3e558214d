use serde::{Deserialize, Serialize};

use crate::error::{ProfileError, ProfileResult};

/// Number of base trigrams.
pub const TRIGRAM_COUNT: usize = 8;

/// Number of archetypes (ordered trigram pairs).
pub const ARCHETYPE_COUNT: usize = TRIGRAM_COUNT * TRIGRAM_COUNT;

/// Identifier of one of the eight base trigrams (1..=8).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct TrigramId(u8);

impl TrigramId {
    pub fn new(raw: u8) -> ProfileResult<Self> {
        if (1..=TRIGRAM_COUNT as u8).contains(&raw) {
            Ok(Self(raw))
        } else {
            Err(ProfileError::InvalidTrigramId(raw))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based position in trigram order.
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    pub fn all() -> impl Iterator<Item = TrigramId> {
        (1..=TRIGRAM_COUNT as u8).map(TrigramId)
    }
}

impl TryFrom<u8> for TrigramId {
    type Error = ProfileError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<TrigramId> for u8 {
    fn from(id: TrigramId) -> Self {
        id.0
    }
}

impl std::fmt::Display for TrigramId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of one of the 64 archetypes (1..=64).
///
/// The id is bound to its trigram pair by `id = (upper - 1) * 8 + lower`;
/// [`ArchetypeId::from_trigrams`] and [`ArchetypeId::trigrams`] are exact
/// inverses of each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ArchetypeId(u8);

impl ArchetypeId {
    pub fn new(raw: u8) -> ProfileResult<Self> {
        if (1..=ARCHETYPE_COUNT as u8).contains(&raw) {
            Ok(Self(raw))
        } else {
            Err(ProfileError::InvalidArchetypeId(raw))
        }
    }

    pub fn from_trigrams(upper: TrigramId, lower: TrigramId) -> Self {
        Self((upper.get() - 1) * TRIGRAM_COUNT as u8 + lower.get())
    }

    /// Recover the (upper, lower) trigram pair.
    pub fn trigrams(self) -> (TrigramId, TrigramId) {
        let zero_based = self.0 - 1;
        let upper = zero_based / TRIGRAM_COUNT as u8 + 1;
        let lower = zero_based % TRIGRAM_COUNT as u8 + 1;
        (TrigramId(upper), TrigramId(lower))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    pub fn all() -> impl Iterator<Item = ArchetypeId> {
        (1..=ARCHETYPE_COUNT as u8).map(ArchetypeId)
    }
}

impl TryFrom<u8> for ArchetypeId {
    type Error = ProfileError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<ArchetypeId> for u8 {
    fn from(id: ArchetypeId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ArchetypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The ten named trait properties carried by trigrams and dynamics scores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitProperty {
    Innovation,
    Stability,
    Cooperation,
    Independence,
    Intuition,
    Resilience,
    Adaptability,
    Protection,
    SupportSeeking,
    Introspection,
}

impl TraitProperty {
    pub const ALL: [TraitProperty; 10] = [
        TraitProperty::Innovation,
        TraitProperty::Stability,
        TraitProperty::Cooperation,
        TraitProperty::Independence,
        TraitProperty::Intuition,
        TraitProperty::Resilience,
        TraitProperty::Adaptability,
        TraitProperty::Protection,
        TraitProperty::SupportSeeking,
        TraitProperty::Introspection,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TraitProperty::Innovation => "innovation",
            TraitProperty::Stability => "stability",
            TraitProperty::Cooperation => "cooperation",
            TraitProperty::Independence => "independence",
            TraitProperty::Intuition => "intuition",
            TraitProperty::Resilience => "resilience",
            TraitProperty::Adaptability => "adaptability",
            TraitProperty::Protection => "protection",
            TraitProperty::SupportSeeking => "support_seeking",
            TraitProperty::Introspection => "introspection",
        }
    }
}

/// Ten named trait scalars on the 0–10 scale.
///
/// Used both for trigram base properties and for derived archetype
/// dynamics (see [`DynamicsScore`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TraitScores {
    pub innovation: f64,
    pub stability: f64,
    pub cooperation: f64,
    pub independence: f64,
    pub intuition: f64,
    pub resilience: f64,
    pub adaptability: f64,
    pub protection: f64,
    pub support_seeking: f64,
    pub introspection: f64,
}

/// Derived trait profile of an archetype.
pub type DynamicsScore = TraitScores;

impl TraitScores {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 10.0;

    /// Build a score set by evaluating `f` once per property.
    pub fn from_fn(mut f: impl FnMut(TraitProperty) -> f64) -> Self {
        Self {
            innovation: f(TraitProperty::Innovation),
            stability: f(TraitProperty::Stability),
            cooperation: f(TraitProperty::Cooperation),
            independence: f(TraitProperty::Independence),
            intuition: f(TraitProperty::Intuition),
            resilience: f(TraitProperty::Resilience),
            adaptability: f(TraitProperty::Adaptability),
            protection: f(TraitProperty::Protection),
            support_seeking: f(TraitProperty::SupportSeeking),
            introspection: f(TraitProperty::Introspection),
        }
    }

    /// Every property set to the same value.
    pub fn uniform(value: f64) -> Self {
        Self::from_fn(|_| value)
    }

    pub fn get(&self, property: TraitProperty) -> f64 {
        match property {
            TraitProperty::Innovation => self.innovation,
            TraitProperty::Stability => self.stability,
            TraitProperty::Cooperation => self.cooperation,
            TraitProperty::Independence => self.independence,
            TraitProperty::Intuition => self.intuition,
            TraitProperty::Resilience => self.resilience,
            TraitProperty::Adaptability => self.adaptability,
            TraitProperty::Protection => self.protection,
            TraitProperty::SupportSeeking => self.support_seeking,
            TraitProperty::Introspection => self.introspection,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (TraitProperty, f64)> + '_ {
        TraitProperty::ALL.iter().map(move |p| (*p, self.get(*p)))
    }

    /// True when every property is finite and on the 0–10 scale.
    pub fn is_in_range(&self) -> bool {
        self.iter()
            .all(|(_, v)| v.is_finite() && (Self::MIN..=Self::MAX).contains(&v))
    }
}

/// One of the eight user-vector dimensions, one per trigram.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Heaven
    Creativity,
    /// Lake
    Harmony,
    /// Fire
    Expression,
    /// Thunder
    Action,
    /// Wind
    Adaptability,
    /// Water
    Exploration,
    /// Mountain
    Stability,
    /// Earth
    Receptivity,
}

impl Dimension {
    pub const ALL: [Dimension; TRIGRAM_COUNT] = [
        Dimension::Creativity,
        Dimension::Harmony,
        Dimension::Expression,
        Dimension::Action,
        Dimension::Adaptability,
        Dimension::Exploration,
        Dimension::Stability,
        Dimension::Receptivity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Creativity => "creativity",
            Dimension::Harmony => "harmony",
            Dimension::Expression => "expression",
            Dimension::Action => "action",
            Dimension::Adaptability => "adaptability",
            Dimension::Exploration => "exploration",
            Dimension::Stability => "stability",
            Dimension::Receptivity => "receptivity",
        }
    }

    /// Name of the trigram that owns this dimension.
    pub fn trigram_name(&self) -> &'static str {
        match self {
            Dimension::Creativity => "heaven",
            Dimension::Harmony => "lake",
            Dimension::Expression => "fire",
            Dimension::Action => "thunder",
            Dimension::Adaptability => "wind",
            Dimension::Exploration => "water",
            Dimension::Stability => "mountain",
            Dimension::Receptivity => "earth",
        }
    }

    pub fn trigram(&self) -> TrigramId {
        TrigramId(self.index() as u8 + 1)
    }

    pub fn index(&self) -> usize {
        match self {
            Dimension::Creativity => 0,
            Dimension::Harmony => 1,
            Dimension::Expression => 2,
            Dimension::Action => 3,
            Dimension::Adaptability => 4,
            Dimension::Exploration => 5,
            Dimension::Stability => 6,
            Dimension::Receptivity => 7,
        }
    }

    /// Resolve a tag to a dimension by dimension name or trigram name
    /// (case-insensitive). Returns `None` for anything else.
    pub fn parse(tag: &str) -> Option<Dimension> {
        let tag = tag.trim().to_ascii_lowercase();
        Dimension::ALL
            .into_iter()
            .find(|d| d.as_str() == tag || d.trigram_name() == tag)
    }
}

/// The three analytical roles of a profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Engine,
    Interface,
    SafeMode,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Engine => "Engine",
            Role::Interface => "Interface",
            Role::SafeMode => "SafeMode",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clamp to the unit interval; NaN maps to 0.
pub(crate) fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Round to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

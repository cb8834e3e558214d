//! Questionnaire answers as consumed by the engine.

use serde::{Deserialize, Serialize};

/// Which question block an answer belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnswerCategory {
    Worldview,
    ScenarioInner,
    ScenarioOuter,
}

/// A weighted tag carried by an answer.
///
/// The tag is either a dimension name (`"creativity"`, or its trigram name
/// `"heaven"`) or a free keyword matched against archetype keyword sets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContributionTag {
    #[serde(alias = "dimension")]
    pub tag: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl ContributionTag {
    pub fn new(tag: impl Into<String>, weight: f64) -> Self {
        Self {
            tag: tag.into(),
            weight,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: String,
    #[serde(default)]
    pub selected_value: Option<String>,
    #[serde(default)]
    pub contribution_tags: Vec<ContributionTag>,
    #[serde(default)]
    pub inner_tags: Vec<ContributionTag>,
    #[serde(default)]
    pub outer_tags: Vec<ContributionTag>,
    pub category: AnswerCategory,
}

impl Answer {
    pub fn new(question_id: impl Into<String>, category: AnswerCategory) -> Self {
        Self {
            question_id: question_id.into(),
            selected_value: None,
            contribution_tags: Vec::new(),
            inner_tags: Vec::new(),
            outer_tags: Vec::new(),
            category,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>, weight: f64) -> Self {
        self.contribution_tags.push(ContributionTag::new(tag, weight));
        self
    }

    pub fn with_inner_tag(mut self, tag: impl Into<String>, weight: f64) -> Self {
        self.inner_tags.push(ContributionTag::new(tag, weight));
        self
    }

    pub fn with_outer_tag(mut self, tag: impl Into<String>, weight: f64) -> Self {
        self.outer_tags.push(ContributionTag::new(tag, weight));
        self
    }
}

/// Optional facts about the subject that feed pattern detection.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectContext {
    #[serde(default)]
    pub life_stage: Option<String>,
    #[serde(default)]
    pub goals: Vec<String>,
}

impl SubjectContext {
    /// Life stage "developing" or a "personal_growth" goal.
    pub fn has_growth_mindset(&self) -> bool {
        let developing = self
            .life_stage
            .as_deref()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case("developing"));
        developing
            || self
                .goals
                .iter()
                .any(|g| g.trim().eq_ignore_ascii_case("personal_growth"))
    }
}

/// An ordered set of answers plus optional subject context.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerSet {
    #[serde(default)]
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub context: Option<SubjectContext>,
}

impl AnswerSet {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self {
            answers,
            context: None,
        }
    }

    pub fn with_context(mut self, context: SubjectContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn from_json_str(json: &str) -> crate::error::ProfileResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn by_category(&self, category: AnswerCategory) -> impl Iterator<Item = &Answer> {
        self.answers.iter().filter(move |a| a.category == category)
    }

    /// Tags expressing outward behaviour: every answer's outer tag set plus
    /// the contribution tags of scenario-outer answers.
    pub fn outer_tags(&self) -> impl Iterator<Item = &ContributionTag> {
        self.answers.iter().flat_map(|a| {
            let scenario: &[ContributionTag] = if a.category == AnswerCategory::ScenarioOuter {
                &a.contribution_tags
            } else {
                &[]
            };
            a.outer_tags.iter().chain(scenario)
        })
    }

    /// Tags expressing inward behaviour, mirroring [`AnswerSet::outer_tags`].
    pub fn inner_tags(&self) -> impl Iterator<Item = &ContributionTag> {
        self.answers.iter().flat_map(|a| {
            let scenario: &[ContributionTag] = if a.category == AnswerCategory::ScenarioInner {
                &a.contribution_tags
            } else {
                &[]
            };
            a.inner_tags.iter().chain(scenario)
        })
    }
}

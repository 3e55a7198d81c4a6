//! crates/mh_toolkit_core/src/section.rs
//!
//! The seven navigable sections of the toolkit.

use crate::domain::UnknownLabel;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Section {
    #[default]
    Psychoeducation,
    CognitiveTechniques,
    Mindfulness,
    BehavioralActivation,
    SafetyPlan,
    QuickQuiz,
    Resources,
}

impl Section {
    /// Navigation order.
    pub const ALL: [Section; 7] = [
        Section::Psychoeducation,
        Section::CognitiveTechniques,
        Section::Mindfulness,
        Section::BehavioralActivation,
        Section::SafetyPlan,
        Section::QuickQuiz,
        Section::Resources,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Section::Psychoeducation => "Psychoeducation",
            Section::CognitiveTechniques => "Cognitive Techniques (CBT)",
            Section::Mindfulness => "Mindfulness & Relaxation",
            Section::BehavioralActivation => "Behavioral Activation",
            Section::SafetyPlan => "Safety Plan",
            Section::QuickQuiz => "Quick Quiz",
            Section::Resources => "Resources",
        }
    }

    /// URL-safe identifier.
    pub fn slug(&self) -> &'static str {
        match self {
            Section::Psychoeducation => "psychoeducation",
            Section::CognitiveTechniques => "cbt",
            Section::Mindfulness => "mindfulness",
            Section::BehavioralActivation => "behavioral-activation",
            Section::SafetyPlan => "safety-plan",
            Section::QuickQuiz => "quiz",
            Section::Resources => "resources",
        }
    }

    /// Page heading shown at the top of the section.
    pub fn heading(&self) -> &'static str {
        match self {
            Section::Psychoeducation => "Psychoeducation",
            Section::CognitiveTechniques => "CBT: Thought Record",
            Section::Mindfulness => "Mindfulness & Relaxation",
            Section::BehavioralActivation => "Behavioral Activation",
            Section::SafetyPlan => "Safety Plan (personalized)",
            Section::QuickQuiz => "Quick quiz — check understanding",
            Section::Resources => "Resources & next steps",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts either the slug or the display label.
impl FromStr for Section {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.slug() == s || section.label() == s)
            .ok_or_else(|| UnknownLabel {
                kind: "section",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seven_distinct_sections() {
        let slugs: HashSet<_> = Section::ALL.iter().map(|s| s.slug()).collect();
        let labels: HashSet<_> = Section::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(slugs.len(), 7);
        assert_eq!(labels.len(), 7);
    }

    #[test]
    fn slug_and_label_resolve_to_same_section() {
        for section in Section::ALL {
            assert_eq!(section.slug().parse::<Section>().unwrap(), section);
            assert_eq!(section.label().parse::<Section>().unwrap(), section);
        }
        assert!("settings".parse::<Section>().is_err());
    }

    #[test]
    fn first_section_is_default() {
        assert_eq!(Section::default(), Section::ALL[0]);
    }
}

//! crates/mh_toolkit_core/src/content.rs
//!
//! Static psychoeducational content and the two downloadable text exports.

use crate::domain::SafetyPlan;

pub const APP_TITLE: &str = "Mental Health Education Toolkit";
pub const APP_TAGLINE: &str =
    "Practical techniques for learning and practicing mental health skills.";
pub const FOOTER_DISCLAIMER: &str =
    "This app provides educational tools and is not a substitute for professional care.";

pub const SAFETY_PLAN_FILE_NAME: &str = "safety_plan.txt";
pub const WORKSHEET_FILE_NAME: &str = "mh_worksheet.txt";

/// A titled group of short lines.
#[derive(Debug, Clone, Copy)]
pub struct ContentBlock {
    pub heading: &'static str,
    pub lines: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct Link {
    pub title: &'static str,
    pub url: &'static str,
}

// --- Psychoeducation ---

pub const PSYCHOEDUCATION: [ContentBlock; 3] = [
    ContentBlock {
        heading: "What is mental health literacy?",
        lines: &[
            "Understanding common mental health problems and treatments.",
            "Recognizing signs and when to seek help.",
            "Learning skills to manage stress and emotions.",
        ],
    },
    ContentBlock {
        heading: "Core concepts",
        lines: &[
            "Thoughts → Emotions → Behaviors: changing one can change the others.",
            "Small, consistent practices (5–15 minutes/day) build resilience.",
        ],
    },
    ContentBlock {
        heading: "Suggested micro-practices",
        lines: &[
            "3-item gratitude note each evening",
            "5-minute mindful breathing",
            "Short behavioral experiments (try one small activity)",
        ],
    },
];

// --- Section intros ---

pub const CBT_INTRO: &str =
    "Use this form to test unhelpful thoughts and generate balanced alternatives.";
pub const THOUGHT_RECORD_SAVED: &str = "Thought record saved.";

pub const MINDFULNESS_INTRO: &str = "Short guided exercises. Use headphones if helpful.";
pub const BOX_BREATHING_TITLE: &str = "Box Breathing (4-4-4)";
pub const GROUNDING_TITLE: &str = "2-minute grounding exercise";
pub const GROUNDING_INSTRUCTIONS: &str = "Name 5 things you can see, 4 you can touch, 3 you can hear, 2 you can smell, 1 you can taste.";

pub const ACTIVATION_INTRO: &str = "Schedule small, rewarding activities to boost mood.";
pub const ACTIVITY_ADDED: &str = "Activity added.";
pub const NO_ACTIVITIES: &str = "No activities yet. Add one above.";

pub const SAFETY_PLAN_INTRO: &str = "Create a brief safety plan. If you are in immediate danger, call local emergency services.";
pub const SAFETY_PLAN_SAVED: &str = "Safety plan saved.";
pub const SAFETY_PLAN_WARNING: &str =
    "If you feel at immediate risk, contact emergency services or a crisis hotline in your area.";

pub const QUIZ_INTRO: &str = "Choose the best answer.";

// --- Resources ---

pub const RESOURCE_NOTES: [&str; 2] = [
    "If you need professional help, contact a licensed mental health provider.",
    "Crisis lines vary by country. If you are in immediate danger call emergency services.",
];

pub const RESOURCE_LINKS: [Link; 3] = [
    Link {
        title: "Mindfulness exercises - NHS UK",
        url: "https://www.nhs.uk/mental-health/feelings-symptoms-behaviours/feelings/mindfulness/",
    },
    Link {
        title: "CBT guides - Beck Institute",
        url: "https://beckinstitute.org/",
    },
    Link {
        title: "Psychoeducation overview - WHO",
        url: "https://www.who.int/mental_health",
    },
];

//=========================================================================================
// Exports
//=========================================================================================

pub const WORKSHEET: &str = "Mental Health Toolkit Worksheet\n\n\
1) Today I noticed:\n\n\
2) Thought I challenged:\n\n\
3) Activity I scheduled:\n\n\
4) Coping strategies to try:\n\n\
5) Support contacts:\n\n";

/// Renders the plain-text safety plan document.
pub fn safety_plan_text(plan: &SafetyPlan) -> String {
    format!(
        "Safety Plan\n\nWarning signs:\n{}\n\nCoping strategies:\n{}\n\nContacts & supports:\n{}\n",
        plan.warning_signs, plan.coping_strategies, plan.contacts
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safety_plan_export_orders_sections() {
        let text = safety_plan_text(&SafetyPlan {
            warning_signs: "A".into(),
            coping_strategies: "B".into(),
            contacts: "C".into(),
        });

        let warning = text.find("Warning signs:\nA").unwrap();
        let coping = text.find("Coping strategies:\nB").unwrap();
        let contacts = text.find("Contacts & supports:\nC").unwrap();
        assert!(warning < coping && coping < contacts);
        assert!(text.starts_with("Safety Plan\n\n"));
    }

    #[test]
    fn empty_plan_still_renders_template() {
        let text = safety_plan_text(&SafetyPlan::default());
        assert_eq!(
            text,
            "Safety Plan\n\nWarning signs:\n\n\nCoping strategies:\n\n\nContacts & supports:\n\n"
        );
    }

    #[test]
    fn worksheet_has_five_prompts() {
        let prompts = WORKSHEET
            .lines()
            .filter(|l| l.chars().next().is_some_and(|c| c.is_ascii_digit()))
            .count();
        assert_eq!(prompts, 5);
        assert!(WORKSHEET.starts_with("Mental Health Toolkit Worksheet\n\n1) Today I noticed:"));
        assert!(WORKSHEET.ends_with("5) Support contacts:\n\n"));
    }
}

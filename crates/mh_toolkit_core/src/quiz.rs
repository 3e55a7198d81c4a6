//! crates/mh_toolkit_core/src/quiz.rs
//!
//! The fixed "check understanding" quiz and its scoring.

/// A multiple-choice question with a 0-based answer index.
#[derive(Debug, Clone, Copy)]
pub struct QuizQuestion {
    pub prompt: &'static str,
    pub options: [&'static str; 4],
    pub answer: usize,
}

impl QuizQuestion {
    pub fn correct_option(&self) -> &'static str {
        self.options[self.answer]
    }
}

pub const QUESTIONS: [QuizQuestion; 3] = [
    QuizQuestion {
        prompt: "Which of these is a CBT technique?",
        options: [
            "Exposure to feared situations",
            "Journaling thoughts and evidence",
            "Physical exercise only",
            "Ignoring thoughts",
        ],
        answer: 1,
    },
    QuizQuestion {
        prompt: "A good mindfulness practice is:",
        options: [
            "Multitasking while breathing",
            "Judging thoughts as bad",
            "Observing sensations without reacting",
            "Forcing emotions away",
        ],
        answer: 2,
    },
    QuizQuestion {
        prompt: "Behavioral activation focuses on:",
        options: [
            "Avoiding activities to prevent stress",
            "Scheduling reinforcing activities to improve mood",
            "Only talking about feelings",
            "Immediate resolution of all problems",
        ],
        answer: 1,
    },
];

/// The scored result of one submission. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOutcome {
    pub score: usize,
    pub total: usize,
    /// Per-question correctness, in question order.
    pub correct: Vec<bool>,
    /// The revealed key, e.g. `Q1: Journaling thoughts and evidence`.
    pub answer_key: Vec<String>,
}

/// Scores a set of selections against the answer key.
///
/// Selections are matched to questions by position. Missing selections and
/// option indices that do not exist count as incorrect; extra selections are
/// ignored.
pub fn score(selections: &[usize]) -> QuizOutcome {
    let correct: Vec<bool> = QUESTIONS
        .iter()
        .enumerate()
        .map(|(i, q)| selections.get(i) == Some(&q.answer))
        .collect();

    QuizOutcome {
        score: correct.iter().filter(|c| **c).count(),
        total: QUESTIONS.len(),
        correct,
        answer_key: answer_key(),
    }
}

pub fn answer_key() -> Vec<String> {
    QUESTIONS
        .iter()
        .enumerate()
        .map(|(i, q)| format!("Q{}: {}", i + 1, q.correct_option()))
        .collect()
}

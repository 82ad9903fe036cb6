use alloc::{string::String, vec::Vec};
use serde::{Deserialize, Serialize};

/// Discriminant for the question format. Only multiple choice is generated.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    #[default]
    Multiple,
}

/// A single multiple-choice question synthesized from Wikipedia.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Question {
    #[serde(rename = "type")]
    pub kind: Kind,
    /// Prompt to be displayed to the player.
    pub question: String,
    /// Shuffled choices. Exactly one of them equals [`Question::answer`].
    pub options: Vec<String>,
    /// The correct choice.
    pub answer: String,
    /// Where the answer was sourced from, if known.
    pub source: Option<String>,
}

impl Question {
    /// Whether both questions ask the same thing with the same set of choices,
    /// regardless of the order in which the choices were shuffled.
    pub fn is_duplicate_of(&self, other: &Self) -> bool {
        if self.question != other.question || self.options.len() != other.options.len() {
            return false;
        }

        let mut left: Vec<_> = self.options.iter().collect();
        let mut right: Vec<_> = other.options.iter().collect();
        left.sort_unstable();
        right.sort_unstable();
        left == right
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct QuizResult {
    pub title: String,
    pub count: usize,
    pub questions: Vec<Question>,
}

impl QuizResult {
    pub fn new(title: String, questions: Vec<Question>) -> Self {
        Self { title, count: questions.len(), questions }
    }
}

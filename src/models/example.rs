use super::priority::Priority;
use serde::{Deserialize, Serialize};

/// A training/evaluation example: an incident description and its true priority.
///
/// Fields are private so an example cannot change after it is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledExample {
    description: String,

    #[serde(alias = "label")]
    priority: Priority,
}

impl LabeledExample {
    pub fn new(description: impl Into<String>, priority: Priority) -> Self {
        Self {
            description: description.into(),
            priority,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }
}

impl<S: Into<String>> From<(S, Priority)> for LabeledExample {
    fn from((description, priority): (S, Priority)) -> Self {
        Self::new(description, priority)
    }
}

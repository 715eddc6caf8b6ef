//! Conversation history: the ordered context replayed to the story model.

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

/// One role-tagged message in the conversation. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

/// Append-only ordered sequence of turns.
///
/// Turns are only ever added in pairs: the player's raw choice text and
/// the serialized JSON of the full scene the model produced for it. The
/// model turn carries the whole structured response, not just the prose,
/// because that is what future turns replay as context.
#[derive(Debug, Clone, Default)]
pub struct History {
    turns: Vec<Turn>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Append one completed exchange: the user's choice and the serialized
    /// scene JSON, in that order. Always exactly two entries.
    pub fn record_exchange(&mut self, choice: &str, scene_json: String) {
        self.turns.push(Turn {
            role: Role::User,
            text: choice.to_string(),
        });
        self.turns.push(Turn {
            role: Role::Model,
            text: scene_json,
        });
    }

    /// Discard everything. Used on new game and language change.
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_exchange_appends_pair_in_order() {
        let mut history = History::new();
        history.record_exchange("Open the door", r#"{"story":"..."}"#.to_string());

        assert_eq!(history.len(), 2);
        assert_eq!(history.turns()[0].role, Role::User);
        assert_eq!(history.turns()[0].text, "Open the door");
        assert_eq!(history.turns()[1].role, Role::Model);
        assert_eq!(history.turns()[1].text, r#"{"story":"..."}"#);
    }

    #[test]
    fn test_clear() {
        let mut history = History::new();
        history.record_exchange("a", "b".to_string());
        history.clear();
        assert!(history.is_empty());
    }
}

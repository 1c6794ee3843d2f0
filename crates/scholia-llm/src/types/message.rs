use serde::{Deserialize, Serialize};

/// Who produced a turn in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Caller side (prompts)
    User,

    /// Model side (replies)
    Model,
}

impl Role {
    /// Get role as the provider's wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

/// One entry of a conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub text: String,
}

impl HistoryEntry {
    /// Create user entry
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// Create model entry
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

/// Entries kept from the first exchange (user + model)
pub const FIRST_EXCHANGE_LEN: usize = 2;

/// Append an exchange, keeping only the first pair and the newest pair
pub fn push_exchange(history: &mut Vec<HistoryEntry>, user_text: &str, model_text: &str) {
    history.truncate(FIRST_EXCHANGE_LEN);
    history.push(HistoryEntry::user(user_text));
    history.push(HistoryEntry::model(model_text));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_exchange_window() {
        let mut history = Vec::new();

        push_exchange(&mut history, "u1", "m1");
        assert_eq!(history.len(), 2);

        for n in 2..=5 {
            push_exchange(&mut history, &format!("u{}", n), &format!("m{}", n));
        }

        assert_eq!(
            history,
            vec![
                HistoryEntry::user("u1"),
                HistoryEntry::model("m1"),
                HistoryEntry::user("u5"),
                HistoryEntry::model("m5"),
            ]
        );
    }
}

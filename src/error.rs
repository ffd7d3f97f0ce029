use thiserror::Error;

/// Failure to turn a chat record into something displayable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresentationError {
    #[error("chat {} has no participant other than the current user", display_chat_id(.chat_id))]
    NoCounterpartFound { chat_id: Option<i64> },
    #[error("chat {} is malformed: {reason}", display_chat_id(.chat_id))]
    MalformedChatRecord {
        chat_id: Option<i64>,
        reason: String,
    },
}

impl PresentationError {
    pub fn malformed(chat_id: Option<i64>, reason: impl Into<String>) -> Self {
        Self::MalformedChatRecord {
            chat_id,
            reason: reason.into(),
        }
    }

    pub fn chat_id(&self) -> Option<i64> {
        match self {
            Self::NoCounterpartFound { chat_id } | Self::MalformedChatRecord { chat_id, .. } => {
                *chat_id
            }
        }
    }
}

fn display_chat_id(chat_id: &Option<i64>) -> String {
    chat_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "<unknown>".to_owned())
}

use crate::error::PresentationError;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Avatar {
    /// Path relative to the media origin, e.g. `/media/avatars/1.png`.
    pub image: Option<String>,
}

/// Profile fields the chat API sends beyond these are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Participant {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub avatar: Option<Avatar>,
}

impl Participant {
    pub fn avatar_path(&self) -> Option<&str> {
        self.avatar
            .as_ref()
            .and_then(|avatar| avatar.image.as_deref())
            .filter(|path| !path.trim().is_empty())
    }
}

/// A dialog as it arrives from the chat API, before any checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub is_group: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub participants: Option<Vec<Participant>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chat {
    Direct {
        id: Option<i64>,
        participants: Vec<Participant>,
    },
    Group {
        id: Option<i64>,
        name: String,
        image: String,
        participants: Vec<Participant>,
    },
}

impl Chat {
    pub fn id(&self) -> Option<i64> {
        match self {
            Self::Direct { id, .. } | Self::Group { id, .. } => *id,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group { .. })
    }

    pub fn participants(&self) -> &[Participant] {
        match self {
            Self::Direct { participants, .. } | Self::Group { participants, .. } => participants,
        }
    }
}

impl TryFrom<ChatRecord> for Chat {
    type Error = PresentationError;

    fn try_from(record: ChatRecord) -> Result<Self, Self::Error> {
        let ChatRecord {
            id,
            is_group,
            name,
            image,
            participants,
        } = record;

        if !is_group {
            let participants = participants.ok_or_else(|| {
                PresentationError::malformed(id, "direct chat is missing participants")
            })?;
            return Ok(Self::Direct { id, participants });
        }

        let name = non_blank(name)
            .ok_or_else(|| PresentationError::malformed(id, "group chat is missing a name"))?;
        let image = non_blank(image)
            .ok_or_else(|| PresentationError::malformed(id, "group chat is missing an image"))?;

        Ok(Self::Group {
            id,
            name,
            image,
            participants: participants.unwrap_or_default(),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Decodes a JSON document holding one chat record or an array of them.
/// Each element is decoded and validated on its own, so a bad record only
/// fails itself.
pub fn decode_chats(document: Value) -> Vec<Result<Chat, PresentationError>> {
    let elements = match document {
        Value::Array(elements) => elements,
        single => vec![single],
    };
    elements.into_iter().map(decode_chat).collect()
}

fn decode_chat(element: Value) -> Result<Chat, PresentationError> {
    let chat_id = element.get("id").and_then(Value::as_i64);
    let record: ChatRecord = serde_json::from_value(element)
        .map_err(|err| PresentationError::malformed(chat_id, err.to_string()))?;
    Chat::try_from(record)
}

use crate::config::{DisplayConfig, normalize_base_url};
use crate::error::PresentationError;
use crate::model::{Chat, Participant, UserId};
use anyhow::Result;
use serde::Serialize;
use tracing::{debug, warn};

/// Returns the first participant who is not `current_user`.
pub fn find_counterpart(
    participants: &[Participant],
    current_user: UserId,
) -> Option<&Participant> {
    participants
        .iter()
        .find(|participant| participant.id != current_user)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatPresentation {
    pub id: Option<i64>,
    pub name: String,
    pub image: String,
}

/// Derives display names and images for chats. Avatar paths of direct
/// chats are joined onto `base_url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPresenter {
    base_url: String,
}

impl ChatPresenter {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
        })
    }

    pub fn from_config(config: &DisplayConfig) -> Result<Self> {
        Self::new(&config.base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn resolve_image(
        &self,
        chat: &Chat,
        current_user: UserId,
    ) -> Result<String, PresentationError> {
        match chat {
            Chat::Group { image, .. } => Ok(image.clone()),
            Chat::Direct { id, participants } => {
                let counterpart = counterpart_or_err(*id, participants, current_user)?;
                let path = counterpart.avatar_path().ok_or_else(|| {
                    PresentationError::malformed(
                        *id,
                        format!("participant {} has no avatar image", counterpart.id),
                    )
                })?;
                Ok(self.join_media_path(path))
            }
        }
    }

    pub fn resolve_name(
        &self,
        chat: &Chat,
        current_user: UserId,
    ) -> Result<String, PresentationError> {
        match chat {
            Chat::Group { name, .. } => Ok(name.clone()),
            Chat::Direct { id, participants } => {
                let counterpart = counterpart_or_err(*id, participants, current_user)?;
                Ok(format!("{} {}", counterpart.first_name, counterpart.last_name))
            }
        }
    }

    pub fn present(
        &self,
        chat: &Chat,
        current_user: UserId,
    ) -> Result<ChatPresentation, PresentationError> {
        Ok(ChatPresentation {
            id: chat.id(),
            name: self.resolve_name(chat, current_user)?,
            image: self.resolve_image(chat, current_user)?,
        })
    }

    /// Presents every chat in order; one failing chat does not affect the rest.
    pub fn present_all(
        &self,
        chats: &[Chat],
        current_user: UserId,
    ) -> Vec<Result<ChatPresentation, PresentationError>> {
        let results: Vec<_> = chats
            .iter()
            .map(|chat| {
                let result = self.present(chat, current_user);
                if let Err(err) = &result {
                    warn!(
                        chat_id = err.chat_id(),
                        user_id = %current_user,
                        error = %err,
                        "chat could not be presented"
                    );
                }
                result
            })
            .collect();

        debug!(user_id = %current_user, total = chats.len(), "presented chats");
        results
    }

    fn join_media_path(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

fn counterpart_or_err(
    chat_id: Option<i64>,
    participants: &[Participant],
    current_user: UserId,
) -> Result<&Participant, PresentationError> {
    find_counterpart(participants, current_user).ok_or_else(|| {
        debug!(
            chat_id,
            user_id = %current_user,
            participants = participants.len(),
            "direct chat has no counterpart"
        );
        PresentationError::NoCounterpartFound { chat_id }
    })
}

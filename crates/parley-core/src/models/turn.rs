use serde::{Deserialize, Serialize};

use super::image::ImagePayload;

/// One message exchanged in a conversation.
///
/// Serializes as `{ "role": ..., "content": ..., "type": ... }`, which is
/// both the stored format and the shape the chat proxy expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    role: Role,
    content: String,
    #[serde(rename = "type", default)]
    kind: TurnKind,
}

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// Whether a turn's content is plain text or an inline image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnKind {
    #[default]
    Text,
    Image,
}

impl Turn {
    pub fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            kind: TurnKind::Text,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::text(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text(Role::Assistant, content)
    }

    /// Image turns can only be built from a validated payload.
    pub fn image(role: Role, payload: ImagePayload) -> Self {
        Self {
            role,
            content: payload.into_data_uri(),
            kind: TurnKind::Image,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn kind(&self) -> TurnKind {
        self.kind
    }

    pub fn is_image(&self) -> bool {
        self.kind == TurnKind::Image
    }
}

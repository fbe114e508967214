//! Storage key conventions.
//!
//! Pure constants. These define the canonical layout of values in the
//! client's key-value store. The `_v1` suffix is part of the stored format;
//! changing the shape of a value means a new key.

/// JSON array of turns making up the in-progress conversation.
pub const CURRENT_CONVERSATION: &str = "current_conversation_v1";

/// JSON array of archived conversations, most recent first.
pub const CONVERSATIONS_HISTORY: &str = "conversations_history_v1";

pub const VOICE_SPEED: &str = "voice_speed_v1";

pub const MESSAGE_FONT_SIZE: &str = "msg_font_size_v1";

pub const THEME: &str = "theme";


/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a Telegram message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// An addressable chat in the form the platform API accepts: either a
/// numeric id or an `@handle`-style username.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChatTarget {
    Id(i64),
    Handle(String),
}

impl From<ChatId> for ChatTarget {
    fn from(id: ChatId) -> Self {
        ChatTarget::Id(id.0)
    }
}

/// Resolve a raw configuration string (`ADMIN_CHAT_ID` / `CHANNEL_ID`) into
/// an addressable chat target.
///
/// `@username` stays a handle, integers (including `-100...` channel ids)
/// become numeric ids, and any other non-empty string passes through as a
/// handle so already-idiomatic forms keep working. Total over its domain.
pub fn resolve_chat_target(raw: &str) -> Option<ChatTarget> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    if value.starts_with('@') {
        return Some(ChatTarget::Handle(value.to_string()));
    }
    match value.parse::<i64>() {
        Ok(id) => Some(ChatTarget::Id(id)),
        Err(_) => Some(ChatTarget::Handle(value.to_string())),
    }
}

/// Identity of the sender of an inbound update. Built per update, never
/// stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserInfo {
    pub id: UserId,
    pub username: Option<String>,
    pub full_name: String,
}

impl UserInfo {
    pub fn new(
        id: UserId,
        username: Option<String>,
        first_name: &str,
        last_name: Option<&str>,
    ) -> Self {
        let full_name = format!("{} {}", first_name, last_name.unwrap_or(""))
            .trim()
            .to_string();
        Self {
            id,
            username,
            full_name,
        }
    }

    /// `@handle`, or a placeholder when the account has none.
    pub fn username_label(&self) -> String {
        match &self.username {
            Some(name) => format!("@{name}"),
            None => "no username".to_string(),
        }
    }

    /// Trimmed full name when present, otherwise the username label.
    pub fn display_name(&self) -> String {
        if self.full_name.is_empty() {
            self.username_label()
        } else {
            self.full_name.clone()
        }
    }
}

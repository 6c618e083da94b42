use crate::domain::{ChatId, MessageRef, UserInfo};

/// Closed model of the inbound update surface.
///
/// The Telegram adapter converts raw framework updates into these at the
/// edge; everything past that point is framework-agnostic.
#[derive(Clone, Debug)]
pub enum IncomingUpdate {
    Command(CommandUpdate),
    Text(TextUpdate),
    WebApp(WebAppUpdate),
    Callback(CallbackUpdate),
}

#[derive(Clone, Debug)]
pub struct CommandUpdate {
    pub chat_id: ChatId,
    pub user: UserInfo,
    /// Lower-cased command name without the leading `/` or `@botname`.
    pub name: String,
}

#[derive(Clone, Debug)]
pub struct TextUpdate {
    pub chat_id: ChatId,
    pub user: UserInfo,
    pub text: String,
}

/// A structured payload sent back by the embedded web application.
#[derive(Clone, Debug)]
pub struct WebAppUpdate {
    pub chat_id: ChatId,
    pub user: UserInfo,
    /// Raw JSON document, decoded by the payload interpreter.
    pub data: String,
}

#[derive(Clone, Debug)]
pub struct CallbackUpdate {
    pub callback_id: String,
    pub user: UserInfo,
    pub data: String,
    /// The message the button was attached to, when still available.
    pub message: Option<MessageRef>,
    /// Its current text, used to guard against no-op edits.
    pub message_text: Option<String>,
}

/// Membership status of a user in a channel, as reported by the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberStatus {
    Owner,
    Administrator,
    Member,
    Restricted,
    Left,
    Banned,
}

impl MemberStatus {
    /// Statuses that count as "subscribed" for the gate.
    pub fn is_subscribed(self) -> bool {
        matches!(
            self,
            MemberStatus::Owner | MemberStatus::Administrator | MemberStatus::Member
        )
    }
}

/// Inline keyboard attached to an outbound message, one button row per
/// inner vector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    pub fn new(rows: Vec<Vec<InlineButton>>) -> Self {
        Self { rows }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InlineButton {
    /// Fires a callback query carrying `data` back to the bot.
    Callback { label: String, data: String },
    /// Opens an external link.
    Url { label: String, url: String },
    /// Launches the embedded web application.
    WebApp { label: String, url: String },
}

use async_trait::async_trait;

use crate::{
    domain::{ChatTarget, MessageRef, UserId},
    messaging::types::{InlineKeyboard, MemberStatus},
    Result,
};

/// Outbound messaging port.
///
/// Telegram is the only implementation today; the shape keeps the core
/// flows (gate, notifier, payload interpreter) testable against a mock.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    /// Send `text` in the default rich (markdown) mode.
    async fn send_markdown(&self, chat: &ChatTarget, text: &str) -> Result<MessageRef>;

    /// Send pre-escaped HTML. Used by the notifier fallback path.
    async fn send_html(&self, chat: &ChatTarget, html: &str) -> Result<MessageRef>;

    /// Send markdown text with an inline keyboard attached.
    async fn send_keyboard(
        &self,
        chat: &ChatTarget,
        text: &str,
        keyboard: InlineKeyboard,
    ) -> Result<MessageRef>;

    /// Edit an existing message's text and, optionally, its keyboard.
    async fn edit_text(
        &self,
        msg: MessageRef,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<()>;

    /// Replace only the keyboard of an existing message.
    async fn edit_keyboard(&self, msg: MessageRef, keyboard: InlineKeyboard) -> Result<()>;

    /// Upload an in-memory document with a caption.
    async fn send_document(
        &self,
        chat: &ChatTarget,
        data: Vec<u8>,
        filename: &str,
        caption: &str,
    ) -> Result<()>;

    /// Answer a callback query, optionally with a transient toast.
    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<()>;

    /// Query a user's membership status in a channel.
    async fn member_status(&self, chat: &ChatTarget, user: UserId) -> Result<MemberStatus>;
}

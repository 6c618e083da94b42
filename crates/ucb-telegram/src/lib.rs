//! Telegram adapter (teloxide).
//!
//! Implements the `ucb-core` messaging port over the Telegram Bot API.

use async_trait::async_trait;

use teloxide::{
    prelude::*,
    types::{
        ChatMemberStatus, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, ParseMode,
        Recipient, WebAppInfo,
    },
};
use tracing::warn;

pub mod handlers;
pub mod router;

use ucb_core::{
    domain::{ChatId, ChatTarget, MessageId, MessageRef, UserId},
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::{InlineButton, InlineKeyboard, MemberStatus},
    },
    Result,
};

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn recipient(chat: &ChatTarget) -> Recipient {
        match chat {
            ChatTarget::Id(id) => Recipient::Id(teloxide::types::ChatId(*id)),
            ChatTarget::Handle(handle) => Recipient::ChannelUsername(handle.clone()),
        }
    }

    fn tg_chat(msg: MessageRef) -> teloxide::types::ChatId {
        teloxide::types::ChatId(msg.chat_id.0)
    }

    fn tg_msg_id(msg: MessageRef) -> teloxide::types::MessageId {
        teloxide::types::MessageId(msg.message_id.0)
    }

    /// API-side rejections (bad chat id, unparseable markup, edits to
    /// identical content) become `BadRequest` so the core can fall back;
    /// transport-level failures stay opaque.
    fn map_err(e: teloxide::RequestError) -> Error {
        match e {
            teloxide::RequestError::Api(api) => Error::BadRequest(api.to_string()),
            other => Error::External(format!("telegram error: {other}")),
        }
    }

    fn message_ref(chat_id: teloxide::types::ChatId, msg: &Message) -> MessageRef {
        MessageRef {
            chat_id: ChatId(chat_id.0),
            message_id: MessageId(msg.id.0),
        }
    }
}

fn to_markup(keyboard: InlineKeyboard) -> InlineKeyboardMarkup {
    let rows: Vec<Vec<InlineKeyboardButton>> = keyboard
        .rows
        .into_iter()
        .map(|row| row.into_iter().filter_map(to_button).collect())
        .collect();
    InlineKeyboardMarkup::new(rows)
}

fn to_button(button: InlineButton) -> Option<InlineKeyboardButton> {
    match button {
        InlineButton::Callback { label, data } => Some(InlineKeyboardButton::callback(label, data)),
        InlineButton::Url { label, url } => match url::Url::parse(&url) {
            Ok(parsed) => Some(InlineKeyboardButton::url(label, parsed)),
            Err(e) => {
                warn!("dropping url button, invalid url {url}: {e}");
                None
            }
        },
        InlineButton::WebApp { label, url } => match url::Url::parse(&url) {
            Ok(parsed) => Some(InlineKeyboardButton::web_app(
                label,
                WebAppInfo { url: parsed },
            )),
            Err(e) => {
                warn!("dropping web app button, invalid url {url}: {e}");
                None
            }
        },
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    async fn send_markdown(&self, chat: &ChatTarget, text: &str) -> Result<MessageRef> {
        let recipient = Self::recipient(chat);
        let msg = self
            .bot
            .send_message(recipient, text.to_string())
            .parse_mode(ParseMode::Markdown)
            .await
            .map_err(Self::map_err)?;
        Ok(Self::message_ref(msg.chat.id, &msg))
    }

    async fn send_html(&self, chat: &ChatTarget, html: &str) -> Result<MessageRef> {
        let recipient = Self::recipient(chat);
        let msg = self
            .bot
            .send_message(recipient, html.to_string())
            .parse_mode(ParseMode::Html)
            .await
            .map_err(Self::map_err)?;
        Ok(Self::message_ref(msg.chat.id, &msg))
    }

    async fn send_keyboard(
        &self,
        chat: &ChatTarget,
        text: &str,
        keyboard: InlineKeyboard,
    ) -> Result<MessageRef> {
        let recipient = Self::recipient(chat);
        let msg = self
            .bot
            .send_message(recipient, text.to_string())
            .parse_mode(ParseMode::Markdown)
            .reply_markup(to_markup(keyboard))
            .await
            .map_err(Self::map_err)?;
        Ok(Self::message_ref(msg.chat.id, &msg))
    }

    async fn edit_text(
        &self,
        msg: MessageRef,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<()> {
        let request = self
            .bot
            .edit_message_text(Self::tg_chat(msg), Self::tg_msg_id(msg), text.to_string())
            .parse_mode(ParseMode::Markdown);
        match keyboard {
            Some(kb) => request.reply_markup(to_markup(kb)).await,
            None => request.await,
        }
        .map_err(Self::map_err)?;
        Ok(())
    }

    async fn edit_keyboard(&self, msg: MessageRef, keyboard: InlineKeyboard) -> Result<()> {
        self.bot
            .edit_message_reply_markup(Self::tg_chat(msg), Self::tg_msg_id(msg))
            .reply_markup(to_markup(keyboard))
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn send_document(
        &self,
        chat: &ChatTarget,
        data: Vec<u8>,
        filename: &str,
        caption: &str,
    ) -> Result<()> {
        let file = InputFile::memory(data).file_name(filename.to_string());
        self.bot
            .send_document(Self::recipient(chat), file)
            .caption(caption.to_string())
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<()> {
        let mut request = self.bot.answer_callback_query(callback_id.to_string());
        if let Some(t) = text {
            request = request.text(t.to_string());
        }
        request.await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn member_status(&self, chat: &ChatTarget, user: UserId) -> Result<MemberStatus> {
        let member = self
            .bot
            .get_chat_member(Self::recipient(chat), teloxide::types::UserId(user.0 as u64))
            .await
            .map_err(Self::map_err)?;

        Ok(match member.status() {
            ChatMemberStatus::Owner => MemberStatus::Owner,
            ChatMemberStatus::Administrator => MemberStatus::Administrator,
            ChatMemberStatus::Member => MemberStatus::Member,
            ChatMemberStatus::Restricted => MemberStatus::Restricted,
            ChatMemberStatus::Left => MemberStatus::Left,
            ChatMemberStatus::Banned => MemberStatus::Banned,
        })
    }
}

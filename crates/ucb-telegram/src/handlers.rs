//! Teloxide update conversion.
//!
//! Each endpoint converts the raw framework update into the core's
//! `IncomingUpdate` model and hands it to the application; no behavior
//! lives here.

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{MessageKind, User},
};

use ucb_core::{
    app::App,
    domain::{ChatId, MessageId, MessageRef, UserId, UserInfo},
    messaging::types::{
        CallbackUpdate, CommandUpdate, IncomingUpdate, TextUpdate, WebAppUpdate,
    },
};

pub async fn handle_message(msg: Message, app: Arc<App>) -> ResponseResult<()> {
    if let Some(update) = convert_message(&msg) {
        app.handle_update(update).await;
    }
    Ok(())
}

pub async fn handle_callback(q: CallbackQuery, app: Arc<App>) -> ResponseResult<()> {
    let update = CallbackUpdate {
        callback_id: q.id.clone(),
        user: user_info(&q.from),
        data: q.data.clone().unwrap_or_default(),
        message: q.message.as_ref().map(|m| MessageRef {
            chat_id: ChatId(m.chat.id.0),
            message_id: MessageId(m.id.0),
        }),
        message_text: q.message.as_ref().and_then(|m| m.text()).map(String::from),
    };
    app.handle_update(IncomingUpdate::Callback(update)).await;
    Ok(())
}

fn convert_message(msg: &Message) -> Option<IncomingUpdate> {
    // Updates without a sender (channel posts etc.) have no identity to
    // gate on; drop them.
    let user = user_info(msg.from()?);
    let chat_id = ChatId(msg.chat.id.0);

    if let MessageKind::WebAppData(ref data) = msg.kind {
        return Some(IncomingUpdate::WebApp(WebAppUpdate {
            chat_id,
            user,
            data: data.web_app_data.data.clone(),
        }));
    }

    match msg.text() {
        Some(text) if text.trim_start().starts_with('/') => {
            Some(IncomingUpdate::Command(CommandUpdate {
                chat_id,
                user,
                name: parse_command_name(text),
            }))
        }
        Some(text) => Some(IncomingUpdate::Text(TextUpdate {
            chat_id,
            user,
            text: text.to_string(),
        })),
        // Photos, stickers and the rest take the catch-all path.
        None => Some(IncomingUpdate::Text(TextUpdate {
            chat_id,
            user,
            text: String::new(),
        })),
    }
}

fn user_info(user: &User) -> UserInfo {
    UserInfo::new(
        UserId(user.id.0 as i64),
        user.username.clone(),
        &user.first_name,
        user.last_name.as_deref(),
    )
}

/// Telegram may send `/cmd@botname arg1 ...`; only the name matters here.
fn parse_command_name(text: &str) -> String {
    text.trim()
        .split_whitespace()
        .next()
        .unwrap_or("")
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_name_parsing() {
        assert_eq!(parse_command_name("/start"), "start");
        assert_eq!(parse_command_name("/Start@calc_bot extra args"), "start");
        assert_eq!(parse_command_name("  /check  "), "check");
    }
}

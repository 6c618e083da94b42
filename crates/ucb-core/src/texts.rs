//! Outbound message copy and keyboard layouts.
//!
//! All user-visible strings live here so the handlers stay control-flow
//! only. Rendered in Telegram's legacy markdown, the mode the web app's
//! own copy is written for.

use chrono::Utc;

use crate::{
    domain::{UserId, UserInfo},
    messaging::types::{InlineButton, InlineKeyboard},
};

/// Callback-data prefix for the subscription re-check button.
pub const CHECK_SUB_PREFIX: &str = "check_sub_";

pub fn check_sub_callback(user: UserId) -> String {
    format!("{CHECK_SUB_PREFIX}{}", user.0)
}

/// The two-button layout every denied user gets: subscribe link (when one
/// is known) plus a re-check button keyed to their own id.
pub fn subscribe_keyboard(user: UserId, subscribe_url: Option<&str>) -> InlineKeyboard {
    let mut rows = Vec::new();
    if let Some(url) = subscribe_url {
        rows.push(vec![InlineButton::Url {
            label: "📢 Subscribe to the channel".to_string(),
            url: url.to_string(),
        }]);
    }
    rows.push(vec![InlineButton::Callback {
        label: "🔄 Check subscription".to_string(),
        data: check_sub_callback(user),
    }]);
    InlineKeyboard::new(rows)
}

pub fn webapp_keyboard(url: &str) -> InlineKeyboard {
    InlineKeyboard::new(vec![vec![InlineButton::WebApp {
        label: "🧮 Open the calculator".to_string(),
        url: url.to_string(),
    }]])
}

pub fn channel_label(channel_id: Option<&str>) -> String {
    channel_id.unwrap_or("the channel").to_string()
}

pub fn timestamp_now() -> String {
    Utc::now().format("%d.%m.%Y %H:%M:%S").to_string()
}

// ---------- command replies ----------

pub fn welcome_denied(channel: &str) -> String {
    format!(
        "👋 *Welcome to the unit-economics calculator!*\n\n\
         ❌ To use the calculator you need to subscribe to {channel}.\n\n\
         📊 After subscribing you get access to:\n\
         • Margin and profitability breakdowns\n\
         • Profit at different tax rates\n\
         • Full marketplace fee accounting\n\
         • Export of your results"
    )
}

pub fn welcome_granted() -> String {
    "👋 *Welcome to the unit-economics calculator!*\n\n\
     This tool estimates the profitability of marketplace listings.\n\n\
     🎯 *How to use it:*\n\
     1. Press \"Open the calculator\"\n\
     2. Fill in your product numbers\n\
     3. Get the detailed breakdown\n\
     4. Share or export the results"
        .to_string()
}

pub fn subscribe_prompt(channel: &str) -> String {
    format!("❌ To use the bot you need to subscribe to {channel}.")
}

pub fn help_text(support: &str) -> String {
    format!(
        "🆘 *Using the calculator*\n\n\
         📋 *Inputs:* units sold, logistics, fulfilment, marketplace \
         commission, storage, advertising, purchase price, sale price, \
         buyout rate.\n\n\
         📈 *Outputs:* margin, profitability and profit at each tax rate.\n\n\
         💡 Use real numbers and recalculate whenever the marketplace \
         changes its fees.\n\n\
         📞 *Support:* {support}"
    )
}

pub fn about_text(support: &str) -> String {
    format!(
        "ℹ️ *About the unit-economics calculator*\n\n\
         A web-app calculator for marketplace sellers: all fees and taxes \
         accounted for, results shareable and exportable as JSON.\n\n\
         🚀 *Version:* 1.0.0\n\
         📞 *Contact:* {support}"
    )
}

pub fn stats_text(web_app_url: Option<&str>, time: &str) -> String {
    format!(
        "📊 *Calculator status*\n\n\
         🤖 *Bot:* up and running\n\
         🌐 *Web app:* {}\n\
         🕐 *Time:* {time}",
        web_app_url.unwrap_or("not configured")
    )
}

pub fn stats_denied() -> String {
    "❌ This command is available to the administrator only.".to_string()
}

pub fn check_report(channel: Option<&str>, user: UserId, subscribed: bool) -> String {
    let status = if subscribed {
        "✅ subscribed"
    } else {
        "❌ not subscribed"
    };
    format!(
        "Subscription check:\nChannel: {}\nUser: `{}`\nStatus: {status}",
        channel.unwrap_or("not configured"),
        user.0
    )
}

pub fn command_reminder() -> String {
    "🤖 Available commands:\n\
     /start — open the calculator\n\
     /help — help\n\
     /about — about the bot"
        .to_string()
}

// ---------- payload replies ----------

pub fn share_default_message() -> String {
    "Calculation results".to_string()
}

pub fn export_default_message() -> String {
    "Data export".to_string()
}

pub fn export_caption() -> String {
    "📎 Calculation data as JSON for further analysis".to_string()
}

pub fn export_degraded() -> String {
    "📊 Export complete! (JSON file unavailable)".to_string()
}

pub fn payload_parse_error() -> String {
    "❌ Could not process the data. Please try again.".to_string()
}

pub fn handler_error(support: &str) -> String {
    format!("❌ Something went wrong. Please contact {support}.")
}

// ---------- subscription callback ----------

pub fn callback_confirmed_text() -> String {
    "✅ Great, subscription confirmed!\n\n\
     You can use the unit-economics calculator now.\n\
     Press /start to open it."
        .to_string()
}

pub fn callback_denied_text(channel: &str) -> String {
    format!(
        "❌ Subscription not found.\n\n\
         Please subscribe to {channel} and press \"Check subscription\" again."
    )
}

pub fn toast_confirmed() -> String {
    "✅ Subscription confirmed!".to_string()
}

pub fn toast_denied() -> String {
    "❌ Subscription not found".to_string()
}

// ---------- admin notifications ----------

pub fn admin_startup(time: &str) -> String {
    format!(
        "🚀 *Calculator bot started!*\n\n\
         ✅ Up and ready for updates\n\
         🕐 Started at: {time}"
    )
}

pub fn admin_new_session(user: &UserInfo, time: &str) -> String {
    format!(
        "🆕 *New user opened the calculator!*\n\n\
         👤 *User:* {}\n\
         🆔 *ID:* `{}`\n\
         📱 *Username:* {}\n\
         🕐 *Time:* {time}",
        user.display_name(),
        user.id.0,
        user.username_label()
    )
}

pub fn admin_shared(user: &UserInfo, time: &str) -> String {
    format!(
        "📊 *User shared a calculation!*\n\n\
         👤 *User:* {}\n\
         🆔 *ID:* `{}`\n\
         🕐 *Time:* {time}\n\
         🧮 *Action:* shared calculation results",
        user.display_name(),
        user.id.0
    )
}

pub fn admin_exported(user: &UserInfo, time: &str, file_sent: bool) -> String {
    let delivery = if file_sent {
        "💾 *Data:* JSON file sent"
    } else {
        "💾 *Data:* JSON file unavailable"
    };
    format!(
        "📤 *User exported their data!*\n\n\
         👤 *User:* {}\n\
         🆔 *ID:* `{}`\n\
         🕐 *Time:* {time}\n\
         📊 *Action:* full calculation export\n\
         {delivery}",
        user.display_name(),
        user.id.0
    )
}

//! Application flows: routes each inbound update to its handler and keeps
//! every failure inside the handler boundary.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::{
    config::Config,
    domain::{ChatTarget, UserId},
    gate::GatePolicy,
    messaging::{
        port::MessagingPort,
        types::{CallbackUpdate, CommandUpdate, IncomingUpdate, WebAppUpdate},
    },
    notify::AdminNotifier,
    payload::{self, CalcPayload, CalcResult},
    texts, Result,
};

pub struct App {
    cfg: Arc<Config>,
    messenger: Arc<dyn MessagingPort>,
    gate: Arc<dyn GatePolicy>,
    notifier: AdminNotifier,
}

impl App {
    pub fn new(
        cfg: Arc<Config>,
        messenger: Arc<dyn MessagingPort>,
        gate: Arc<dyn GatePolicy>,
        notifier: AdminNotifier,
    ) -> Self {
        Self {
            cfg,
            messenger,
            gate,
            notifier,
        }
    }

    /// Route one update. Errors never escape: whatever a handler could not
    /// recover from locally becomes a single generic apology.
    pub async fn handle_update(&self, update: IncomingUpdate) {
        let reply_chat = reply_target(&update);

        let result = match update {
            IncomingUpdate::Command(cmd) => self.handle_command(cmd).await,
            IncomingUpdate::Text(msg) => self.handle_fallback(msg.chat_id.into(), msg.user.id).await,
            IncomingUpdate::WebApp(data) => self.handle_webapp(data).await,
            IncomingUpdate::Callback(query) => self.handle_callback(query).await,
        };

        if let Err(e) = result {
            error!("update handler failed: {e}");
            if let Some(chat) = reply_chat {
                let _ = self
                    .messenger
                    .send_markdown(&chat, &texts::handler_error(&self.cfg.support_contact))
                    .await;
            }
        }
    }

    async fn handle_command(&self, cmd: CommandUpdate) -> Result<()> {
        match cmd.name.as_str() {
            "start" => self.cmd_start(cmd).await,
            "help" => {
                let text = texts::help_text(&self.cfg.support_contact);
                self.gated_reply(cmd, &text).await
            }
            "about" => {
                let text = texts::about_text(&self.cfg.support_contact);
                self.gated_reply(cmd, &text).await
            }
            "stats" => self.cmd_stats(cmd).await,
            "check" => self.cmd_check(cmd).await,
            // Unknown commands take the catch-all path, like any other text.
            _ => self.handle_fallback(cmd.chat_id.into(), cmd.user.id).await,
        }
    }

    async fn cmd_start(&self, cmd: CommandUpdate) -> Result<()> {
        let chat = ChatTarget::from(cmd.chat_id);

        if !self.gate.is_member(cmd.user.id).await {
            let channel = texts::channel_label(self.cfg.channel_id.as_deref());
            return self
                .send_denied(&chat, cmd.user.id, &texts::welcome_denied(&channel))
                .await;
        }

        let welcome = texts::welcome_granted();
        match self.cfg.web_app_url.as_deref() {
            Some(url) => {
                self.messenger
                    .send_keyboard(&chat, &welcome, texts::webapp_keyboard(url))
                    .await?;
            }
            None => {
                self.messenger.send_markdown(&chat, &welcome).await?;
            }
        }

        self.notifier
            .notify(&texts::admin_new_session(&cmd.user, &texts::timestamp_now()))
            .await;
        Ok(())
    }

    /// Shared flow for /help and /about: gate, then static copy.
    async fn gated_reply(&self, cmd: CommandUpdate, text: &str) -> Result<()> {
        let chat = ChatTarget::from(cmd.chat_id);

        if !self.gate.is_member(cmd.user.id).await {
            let channel = texts::channel_label(self.cfg.channel_id.as_deref());
            return self
                .send_denied(&chat, cmd.user.id, &texts::subscribe_prompt(&channel))
                .await;
        }

        self.messenger.send_markdown(&chat, text).await?;
        Ok(())
    }

    /// /stats is identity-gated, not subscription-gated: only the sender
    /// whose id equals the configured admin id sees it.
    async fn cmd_stats(&self, cmd: CommandUpdate) -> Result<()> {
        let chat = ChatTarget::from(cmd.chat_id);
        let is_admin = self.cfg.admin_user_id() == Some(cmd.user.id);

        let text = if is_admin {
            texts::stats_text(self.cfg.web_app_url.as_deref(), &texts::timestamp_now())
        } else {
            texts::stats_denied()
        };
        self.messenger.send_markdown(&chat, &text).await?;
        Ok(())
    }

    /// /check is deliberately ungated: it exists to debug the gate and
    /// always reports the raw outcome.
    async fn cmd_check(&self, cmd: CommandUpdate) -> Result<()> {
        let chat = ChatTarget::from(cmd.chat_id);
        let subscribed = self.gate.is_member(cmd.user.id).await;
        let report = texts::check_report(self.cfg.channel_id.as_deref(), cmd.user.id, subscribed);
        self.messenger.send_markdown(&chat, &report).await?;
        Ok(())
    }

    /// Catch-all for free text, unknown commands and media.
    async fn handle_fallback(&self, chat: ChatTarget, user: UserId) -> Result<()> {
        if !self.gate.is_member(user).await {
            let channel = texts::channel_label(self.cfg.channel_id.as_deref());
            return self
                .send_denied(&chat, user, &texts::subscribe_prompt(&channel))
                .await;
        }

        self.messenger
            .send_markdown(&chat, &texts::command_reminder())
            .await?;
        Ok(())
    }

    async fn handle_webapp(&self, update: WebAppUpdate) -> Result<()> {
        let chat = ChatTarget::from(update.chat_id);

        let decoded = match payload::decode(&update.data) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!("malformed web app payload from {}: {e}", update.user.id.0);
                self.messenger
                    .send_markdown(&chat, &texts::payload_parse_error())
                    .await?;
                return Ok(());
            }
        };

        match decoded {
            CalcPayload::Share(result) => {
                let message = result
                    .message
                    .unwrap_or_else(texts::share_default_message);
                self.messenger.send_markdown(&chat, &message).await?;

                info!("calculation shared by {}", update.user.display_name());
                self.notifier
                    .notify(&texts::admin_shared(&update.user, &texts::timestamp_now()))
                    .await;
            }
            CalcPayload::Export(result) => {
                let message = result
                    .message
                    .clone()
                    .unwrap_or_else(texts::export_default_message);
                self.messenger.send_markdown(&chat, &message).await?;

                let delivered = self.send_export_file(&chat, &result).await;
                if !delivered {
                    let _ = self
                        .messenger
                        .send_markdown(&chat, &texts::export_degraded())
                        .await;
                }

                info!("data exported by {}", update.user.display_name());
                self.notifier
                    .notify(&texts::admin_exported(
                        &update.user,
                        &texts::timestamp_now(),
                        delivered,
                    ))
                    .await;
            }
            CalcPayload::Unknown => {
                warn!(
                    "unrecognized web app payload from {}, ignoring",
                    update.user.id.0
                );
            }
        }
        Ok(())
    }

    /// `true` when the export artifact reached the chat.
    async fn send_export_file(&self, chat: &ChatTarget, result: &CalcResult) -> bool {
        let bytes = match payload::export_bytes(&result.data) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("export serialization failed: {e}");
                return false;
            }
        };
        let filename = payload::export_filename(result.timestamp.as_deref());

        match self
            .messenger
            .send_document(chat, bytes, &filename, &texts::export_caption())
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!("export file send failed: {e}");
                false
            }
        }
    }

    async fn handle_callback(&self, query: CallbackUpdate) -> Result<()> {
        let Some(suffix) = query.data.strip_prefix(texts::CHECK_SUB_PREFIX) else {
            self.messenger
                .answer_callback(&query.callback_id, None)
                .await?;
            return Ok(());
        };

        // The button carries the id it was issued for; fall back to the
        // sender when the suffix does not parse.
        let user = suffix
            .parse::<i64>()
            .map(UserId)
            .unwrap_or(query.user.id);

        if self.gate.is_member(user).await {
            let confirmation = texts::callback_confirmed_text();
            if let Some(msg) = query.message {
                // Editing a message to its current text is an API error;
                // skip the edit when nothing would change.
                if query.message_text.as_deref() != Some(confirmation.as_str()) {
                    if let Err(e) = self.messenger.edit_text(msg, &confirmation, None).await {
                        debug!("confirmation edit skipped: {e}");
                    }
                }
            }
            self.messenger
                .answer_callback(&query.callback_id, Some(&texts::toast_confirmed()))
                .await?;
        } else {
            let channel = texts::channel_label(self.cfg.channel_id.as_deref());
            let denial = texts::callback_denied_text(&channel);
            let keyboard = texts::subscribe_keyboard(user, self.cfg.subscribe_url.as_deref());

            if let Some(msg) = query.message {
                let edit = if query.message_text.as_deref() == Some(denial.as_str()) {
                    // Same denial text as before: refresh only the buttons.
                    self.messenger.edit_keyboard(msg, keyboard).await
                } else {
                    self.messenger.edit_text(msg, &denial, Some(keyboard)).await
                };
                if let Err(e) = edit {
                    debug!("denial edit skipped: {e}");
                }
            }
            self.messenger
                .answer_callback(&query.callback_id, Some(&texts::toast_denied()))
                .await?;
        }
        Ok(())
    }

    /// Every denial, whatever produced it, carries the same two-button
    /// layout keyed to the denied user's own id.
    async fn send_denied(&self, chat: &ChatTarget, user: UserId, text: &str) -> Result<()> {
        self.messenger
            .send_keyboard(
                chat,
                text,
                texts::subscribe_keyboard(user, self.cfg.subscribe_url.as_deref()),
            )
            .await?;
        Ok(())
    }
}

fn reply_target(update: &IncomingUpdate) -> Option<ChatTarget> {
    match update {
        IncomingUpdate::Command(cmd) => Some(cmd.chat_id.into()),
        IncomingUpdate::Text(msg) => Some(msg.chat_id.into()),
        IncomingUpdate::WebApp(data) => Some(data.chat_id.into()),
        // A callback is answered with a toast, not a chat reply.
        IncomingUpdate::Callback(_) => None,
    }
}

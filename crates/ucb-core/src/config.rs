use std::{env, fs, path::Path, time::Duration};

use crate::{
    domain::{resolve_chat_target, ChatTarget, UserId},
    errors::Error,
    Result,
};

/// Typed configuration, read once from the environment at startup and
/// immutable for the process lifetime. Every optional field gates one
/// feature: no web-app URL means no launch button, no admin chat means no
/// notifications and no `/stats`, no channel means the gate always allows.
#[derive(Clone, Debug)]
pub struct Config {
    pub bot_token: String,
    pub web_app_url: Option<String>,
    /// Raw `ADMIN_CHAT_ID` value, resolved on demand via `admin_target`.
    pub admin_chat_id: Option<String>,
    /// Raw `CHANNEL_ID` value (`@handle` or `-100...`), shown by `/check`.
    pub channel_id: Option<String>,
    /// Where the subscribe button points; derived from an `@handle`
    /// channel unless overridden.
    pub subscribe_url: Option<String>,
    /// Contact named in help and generic error copy.
    pub support_contact: String,
    /// Zero disables caching: the gate queries live on every request.
    pub gate_cache_ttl: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let bot_token = env_str("BOT_TOKEN").unwrap_or_default();
        if bot_token.trim().is_empty() {
            return Err(Error::Config(
                "BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let web_app_url = env_str("WEB_APP_URL").and_then(non_empty);
        let admin_chat_id = env_str("ADMIN_CHAT_ID").and_then(non_empty);
        let channel_id = env_str("CHANNEL_ID").and_then(non_empty);

        let subscribe_url = env_str("SUBSCRIBE_URL")
            .and_then(non_empty)
            .or_else(|| derive_subscribe_url(channel_id.as_deref()));
        let support_contact =
            derive_support_contact(env_str("SUPPORT_CONTACT").as_deref(), channel_id.as_deref());

        let gate_cache_ttl = Duration::from_secs(env_u64("GATE_CACHE_TTL_SECS").unwrap_or(0));

        Ok(Self {
            bot_token,
            web_app_url,
            admin_chat_id,
            channel_id,
            subscribe_url,
            support_contact,
            gate_cache_ttl,
        })
    }

    pub fn admin_target(&self) -> Option<ChatTarget> {
        self.admin_chat_id.as_deref().and_then(resolve_chat_target)
    }

    pub fn channel_target(&self) -> Option<ChatTarget> {
        self.channel_id.as_deref().and_then(resolve_chat_target)
    }

    /// The admin's numeric id, when the admin is configured numerically.
    /// `/stats` compares this against the sender; an `@handle` admin can
    /// receive notifications but never matches.
    pub fn admin_user_id(&self) -> Option<UserId> {
        match self.admin_target() {
            Some(ChatTarget::Id(id)) => Some(UserId(id)),
            _ => None,
        }
    }
}

/// `https://t.me/<name>` for an `@handle` channel; numeric channels have
/// no derivable public link.
fn derive_subscribe_url(channel_id: Option<&str>) -> Option<String> {
    let channel = channel_id?.trim();
    let name = channel.strip_prefix('@')?;
    if name.is_empty() {
        return None;
    }
    Some(format!("https://t.me/{name}"))
}

fn derive_support_contact(explicit: Option<&str>, channel_id: Option<&str>) -> String {
    if let Some(contact) = explicit.map(str::trim).filter(|s| !s.is_empty()) {
        return contact.to_string();
    }
    if let Some(channel) = channel_id.map(str::trim).filter(|s| s.starts_with('@')) {
        return channel.to_string();
    }
    "support".to_string()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

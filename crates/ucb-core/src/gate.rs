//! Subscription gate: channel-membership access control.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::warn;

use crate::{
    domain::{ChatTarget, UserId},
    errors::Error,
    messaging::port::MessagingPort,
};

/// Swappable gate policy. The live gate queries the platform on every
/// call; `CachedGate` wraps any policy with a time-bounded cache.
#[async_trait]
pub trait GatePolicy: Send + Sync {
    /// `true` when the user may use the bot. Never fails: errors on the
    /// underlying query deny access.
    async fn is_member(&self, user: UserId) -> bool;
}

/// Live membership check against the configured channel.
pub struct SubscriptionGate {
    channel: Option<ChatTarget>,
    messenger: Arc<dyn MessagingPort>,
}

impl SubscriptionGate {
    pub fn new(channel: Option<ChatTarget>, messenger: Arc<dyn MessagingPort>) -> Self {
        Self { channel, messenger }
    }
}

#[async_trait]
impl GatePolicy for SubscriptionGate {
    async fn is_member(&self, user: UserId) -> bool {
        // No channel configured: the feature is disabled, everyone passes.
        let Some(channel) = &self.channel else {
            return true;
        };

        match self.messenger.member_status(channel, user).await {
            Ok(status) => status.is_subscribed(),
            Err(Error::BadRequest(e)) => {
                warn!(
                    "subscription check failed for user {}: {e}. Make sure the bot \
                     is an administrator of the channel and CHANNEL_ID is either \
                     '@username' or a '-100...' id.",
                    user.0
                );
                false
            }
            Err(e) => {
                warn!("subscription check failed for user {}: {e}", user.0);
                false
            }
        }
    }
}

/// Time-bounded per-user cache over another gate policy.
///
/// Both allow and deny outcomes are cached; a denied user re-checking via
/// the callback button within the TTL sees the cached denial, which is why
/// the default TTL is zero (cache off).
pub struct CachedGate {
    inner: Arc<dyn GatePolicy>,
    ttl: Duration,
    cache: Mutex<HashMap<i64, (Instant, bool)>>,
}

impl CachedGate {
    pub fn new(inner: Arc<dyn GatePolicy>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cache: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl GatePolicy for CachedGate {
    async fn is_member(&self, user: UserId) -> bool {
        let now = Instant::now();
        {
            let cache = self.cache.lock().await;
            if let Some((at, allowed)) = cache.get(&user.0) {
                if now.duration_since(*at) < self.ttl {
                    return *allowed;
                }
            }
        }

        let allowed = self.inner.is_member(user).await;
        self.cache.lock().await.insert(user.0, (now, allowed));
        allowed
    }
}

/// Select the gate policy from configuration.
pub fn build_gate(
    channel: Option<ChatTarget>,
    cache_ttl: Duration,
    messenger: Arc<dyn MessagingPort>,
) -> Arc<dyn GatePolicy> {
    let live = Arc::new(SubscriptionGate::new(channel, messenger));
    if cache_ttl.is_zero() {
        live
    } else {
        Arc::new(CachedGate::new(live, cache_ttl))
    }
}

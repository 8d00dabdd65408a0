//! Presence rotator - Periodically changes the bot's "Playing ..." status

use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::application::context::BotContext;
use crate::domain::traits::Session;

pub const DEFAULT_STATUSES: [&str; 3] = ["with you!", "with Krypton!", "with humans!"];

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// Recurring status update, gated on the ready signal and stopped by the
/// shutdown signal.
pub struct PresenceRotator {
    statuses: Vec<String>,
    interval: Duration,
}

impl PresenceRotator {
    pub fn new() -> Self {
        Self {
            statuses: DEFAULT_STATUSES.iter().map(|s| s.to_string()).collect(),
            interval: DEFAULT_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_statuses(mut self, statuses: Vec<String>) -> Self {
        self.statuses = statuses;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Uniformly random pick from the status list
    pub fn pick(&self) -> Option<&str> {
        self.statuses
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
    }

    pub fn spawn(self, session: Arc<dyn Session>, context: &BotContext) -> JoinHandle<()> {
        let ready = context.ready_signal();
        let shutdown = context.shutdown_signal();
        tokio::spawn(self.run(session, ready, shutdown))
    }

    pub async fn run(
        self,
        session: Arc<dyn Session>,
        mut ready: watch::Receiver<bool>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        tokio::select! {
            became_ready = signaled(&mut ready) => {
                if !became_ready {
                    return;
                }
            }
            _ = signaled(&mut shutdown) => return,
        }
        info!("Presence rotator started, every {:?}", self.interval);

        let mut ticker = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let Some(status) = self.pick().map(str::to_owned) else {
                        continue;
                    };
                    match session.set_activity(&status).await {
                        Ok(()) => debug!("Status changed to 'Playing {}'", status),
                        Err(e) => warn!("Failed to change status: {}", e),
                    }
                }
                _ = signaled(&mut shutdown) => break,
            }
        }
        info!("Presence rotator stopped");
    }
}

impl Default for PresenceRotator {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves once the flag is true; `false` if its sender went away first
async fn signaled(flag: &mut watch::Receiver<bool>) -> bool {
    flag.wait_for(|set| *set).await.is_ok()
}

//! Long-polling update loop with cursor bookkeeping and the echo policy.

use std::{sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;

use crate::{
    backoff::{Backoff, BackoffConfig},
    domain::{Update, UpdateCursor},
    echo,
    ports::{BotApi, GetUpdates, UpdateKind},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PollConfig {
    /// Max updates per `getUpdates` call.
    pub limit: u32,
    /// Server-side long-poll timeout. Zero means the call returns at once.
    pub timeout_secs: u32,
    pub allowed_updates: Vec<UpdateKind>,
    /// Pause between successful cycles.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            limit: 20,
            timeout_secs: 0,
            allowed_updates: vec![UpdateKind::Message],
            interval: Duration::from_secs(1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    /// Shutdown requested; the current cycle is finishing.
    Stopping,
    Stopped,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PollStats {
    pub cycles: u64,
    pub updates: u64,
    pub replies_sent: u64,
    pub replies_failed: u64,
    pub fetch_errors: u64,
}

/// Drives `getUpdates` until `shutdown` is cancelled.
pub struct Poller {
    api: Arc<dyn BotApi>,
    cfg: PollConfig,
    backoff: Backoff,
    cursor: UpdateCursor,
    state: LoopState,
    stats: PollStats,
    shutdown: CancellationToken,
}

impl Poller {
    pub fn new(
        api: Arc<dyn BotApi>,
        cfg: PollConfig,
        backoff: BackoffConfig,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            api,
            cfg,
            backoff: Backoff::new(backoff),
            cursor: UpdateCursor::new(),
            state: LoopState::Running,
            stats: PollStats::default(),
            shutdown,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn cursor(&self) -> UpdateCursor {
        self.cursor
    }

    pub fn stats(&self) -> PollStats {
        self.stats
    }

    /// Run cycles until shutdown. An in-flight request is never interrupted; a pending pause is.
    pub async fn run(&mut self) -> PollStats {
        tracing::info!("polling for updates");

        while self.state == LoopState::Running {
            let pause = self.cycle().await;
            self.pause(pause).await;

            if self.shutdown.is_cancelled() {
                self.state = LoopState::Stopping;
                tracing::info!(offset = ?self.cursor.offset(), "stopping update loop");
            }
        }

        self.state = LoopState::Stopped;
        tracing::info!(
            cycles = self.stats.cycles,
            updates = self.stats.updates,
            replies_sent = self.stats.replies_sent,
            replies_failed = self.stats.replies_failed,
            fetch_errors = self.stats.fetch_errors,
            "update loop stopped"
        );
        self.stats
    }

    /// One fetch/process step. Returns how long to wait before the next one.
    pub async fn cycle(&mut self) -> Duration {
        self.stats.cycles += 1;

        let req = GetUpdates {
            offset: self.cursor.offset(),
            limit: self.cfg.limit,
            timeout_secs: self.cfg.timeout_secs,
            allowed_updates: self.cfg.allowed_updates.clone(),
        };

        match self.api.get_updates(&req).await {
            Ok(batch) => {
                self.backoff.reset();
                self.process_batch(batch).await;
                self.cfg.interval
            }
            Err(e) => {
                self.stats.fetch_errors += 1;
                let delay = self
                    .backoff
                    .next_delay()
                    .max(e.retry_after().unwrap_or_default());
                if e.is_transient() {
                    tracing::warn!(
                        attempt = self.backoff.attempt(),
                        delay_ms = delay.as_millis() as u64,
                        "getUpdates failed: {e}"
                    );
                } else {
                    // Still retried: the token may be restored without restarting us.
                    tracing::error!(
                        attempt = self.backoff.attempt(),
                        delay_ms = delay.as_millis() as u64,
                        "getUpdates failed, needs attention: {e}"
                    );
                }
                delay
            }
        }
    }

    async fn process_batch(&mut self, mut batch: Vec<Update>) {
        tracing::debug!(count = batch.len(), "received updates");
        batch.sort_by_key(|u| u.update_id);

        for update in batch {
            if self.cursor.is_acknowledged(update.update_id) {
                tracing::debug!(update_id = update.update_id, "skipping stale update");
                continue;
            }
            self.stats.updates += 1;

            if let Some(msg) = &update.message {
                if let Some(reply) = echo::reply_for(msg) {
                    tracing::info!("{}", echo::describe(msg));
                    match self.api.send_message(&reply).await {
                        Ok(_) => self.stats.replies_sent += 1,
                        Err(e) => {
                            self.stats.replies_failed += 1;
                            tracing::warn!(
                                update_id = update.update_id,
                                chat_id = reply.chat_id.0,
                                "failed to send reply: {e}"
                            );
                        }
                    }
                }
            }

            self.cursor.advance_past(update.update_id);
        }
    }

    async fn pause(&self, d: Duration) {
        tokio::select! {
            _ = self.shutdown.cancelled() => {}
            _ = tokio::time::sleep(d) => {}
        }
    }
}

//! Bounded exponential backoff with jitter for failed poll cycles.

use std::time::Duration;

use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackoffConfig {
    /// Delay after the first failure; also the floor for every later delay.
    pub initial: Duration,
    pub max: Duration,
    pub factor: u32,
    /// Fraction (0.0..=1.0) of the nominal delay that may be shaved off at random.
    pub jitter_ratio: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(1),
            max: Duration::from_secs(60),
            factor: 2,
            jitter_ratio: 0.5,
        }
    }
}

/// Backoff state for consecutive failures.
#[derive(Debug)]
pub struct Backoff {
    cfg: BackoffConfig,
    attempt: u32,
}

impl Backoff {
    pub fn new(cfg: BackoffConfig) -> Self {
        Self { cfg, attempt: 0 }
    }

    /// Consecutive failures recorded since the last reset.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Nominal (un-jittered) delay for the current attempt.
    fn nominal(&self) -> Duration {
        let initial_ms = self.cfg.initial.as_millis() as u64;
        let max_ms = self.cfg.max.as_millis() as u64;
        let mult = (self.cfg.factor.max(1) as u64)
            .checked_pow(self.attempt)
            .unwrap_or(u64::MAX);
        Duration::from_millis(initial_ms.saturating_mul(mult).min(max_ms))
    }

    /// Delay before the next retry; advances the attempt counter.
    pub fn next_delay(&mut self) -> Duration {
        self.next_delay_with(&mut rand::thread_rng())
    }

    pub fn next_delay_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Duration {
        let nominal = self.nominal();
        let ratio = self.cfg.jitter_ratio.clamp(0.0, 1.0);
        let spread_ms = (nominal.as_millis() as f64 * ratio) as u64;
        let shave = if spread_ms == 0 {
            0
        } else {
            rng.gen_range(0..=spread_ms)
        };
        self.attempt = self.attempt.saturating_add(1);

        let delay = nominal.saturating_sub(Duration::from_millis(shave));
        delay.max(self.cfg.initial.min(self.cfg.max))
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }
}

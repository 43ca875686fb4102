//! Run configuration, supplied once at construction.

use chase_core::{NodeId, SimClock, Tick};

use crate::{SimError, SimResult};

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from the `[sim]` table of a TOML scenario by the
/// application crate.  Missing fields take the values of
/// [`SimConfig::default`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct SimConfig {
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Frames per simulated second.  Only the spawn interval depends on it;
    /// speeds are per tick.
    pub ticks_per_sec: u32,

    /// Total ticks to simulate.
    pub total_ticks: u64,

    /// Emit a snapshot every N ticks.  `0` disables snapshots.
    pub output_interval_ticks: u64,

    /// Pursuer and quarry collide when strictly closer than this.
    pub capture_radius: f64,

    /// Speed, in logical units per tick, given to pursuers added with
    /// [`SimBuilder::pursuer`][crate::SimBuilder::pursuer] or spawned.
    pub pursuer_speed: f64,

    /// End the run at the first capture instead of at `total_ticks`.
    pub stop_on_capture: bool,

    /// Periodic pursuer spawning; `None` disables it.
    pub spawn: Option<SpawnPolicy>,
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.ticks_per_sec)
    }

    /// Reject values the tick loop cannot run with.
    pub fn validate(&self) -> SimResult<()> {
        if self.ticks_per_sec == 0 {
            return Err(SimError::Config("ticks_per_sec must be at least 1".into()));
        }
        if !(self.pursuer_speed.is_finite() && self.pursuer_speed > 0.0) {
            return Err(SimError::Config(format!(
                "pursuer_speed must be finite and positive, got {}",
                self.pursuer_speed
            )));
        }
        if !(self.capture_radius.is_finite() && self.capture_radius >= 0.0) {
            return Err(SimError::Config(format!(
                "capture_radius must be finite and non-negative, got {}",
                self.capture_radius
            )));
        }
        if let Some(spawn) = &self.spawn {
            spawn.validate()?;
        }
        Ok(())
    }
}

impl Default for SimConfig {
    /// One simulated minute at 60 FPS with the reference car speed.
    fn default() -> Self {
        Self {
            seed:                  42,
            ticks_per_sec:         SimClock::DEFAULT_TICKS_PER_SEC,
            total_ticks:           3_600,
            output_interval_ticks: 60,
            capture_radius:        2.0,
            pursuer_speed:         0.2,
            stop_on_capture:       true,
            spawn:                 None,
        }
    }
}

// ── SpawnPolicy ───────────────────────────────────────────────────────────────

/// "Every `interval_secs` of simulated time, add one pursuer at a node drawn
/// uniformly from `candidates`."
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnPolicy {
    pub interval_secs: f64,

    /// Dense node ids pursuers may appear at.
    pub candidates: Vec<NodeId>,

    /// Stop spawning after this many.  `None` = unbounded.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_pursuers: Option<usize>,
}

impl SpawnPolicy {
    pub fn new(interval_secs: f64, candidates: Vec<NodeId>) -> Self {
        Self { interval_secs, candidates, max_pursuers: None }
    }

    pub fn max_pursuers(mut self, max: usize) -> Self {
        self.max_pursuers = Some(max);
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        if !(self.interval_secs.is_finite() && self.interval_secs > 0.0) {
            return Err(SimError::Config(format!(
                "spawn interval must be finite and positive, got {}",
                self.interval_secs
            )));
        }
        if self.candidates.is_empty() {
            return Err(SimError::Config("spawn policy has no candidate nodes".into()));
        }
        Ok(())
    }
}

//! Simulation time model.
//!
//! Time is a monotonically increasing `Tick` counter; one tick is one frame
//! of the motion model.  `SimClock` maps ticks to simulated seconds:
//!
//!   elapsed_secs = tick / ticks_per_sec
//!
//! Agent speeds are expressed per tick (logical units per frame), so the
//! clock only matters for wall-time style policies such as the pursuer
//! spawn interval.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self` (saturating at zero).
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts and simulated seconds.
///
/// `SimClock` is cheap to copy and holds no heap data.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Frames per simulated second.  Default: 60.
    pub ticks_per_sec: u32,
    /// The current tick, advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    pub const DEFAULT_TICKS_PER_SEC: u32 = 60;

    pub fn new(ticks_per_sec: u32) -> Self {
        Self {
            ticks_per_sec,
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Elapsed simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_tick.0 as f64 / self.ticks_per_sec.max(1) as f64
    }

    /// How many ticks span `secs` seconds?  Rounds up, and never returns
    /// zero for a positive duration.
    pub fn ticks_for_secs(&self, secs: f64) -> u64 {
        if secs <= 0.0 || !secs.is_finite() {
            return 0;
        }
        ((secs * self.ticks_per_sec as f64).ceil() as u64).max(1)
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TICKS_PER_SEC)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2} s)", self.current_tick, self.elapsed_secs())
    }
}

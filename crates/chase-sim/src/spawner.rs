//! Fixed-interval pursuer spawning.

use chase_core::{CoreResult, NodeId, SimClock, SimRng, Tick};

use crate::SpawnPolicy;

/// A [`SpawnPolicy`] converted to ticks, plus its own RNG stream.
///
/// The first spawn happens one full interval after tick 0, matching a
/// wall-clock timer started when the run begins.
pub struct Spawner {
    interval_ticks: u64,
    candidates:     Vec<NodeId>,
    max_pursuers:   Option<usize>,
    next_due:       Tick,
    spawned:        usize,
    rng:            SimRng,
}

impl Spawner {
    pub fn new(policy: &SpawnPolicy, clock: &SimClock, rng: SimRng) -> Self {
        let interval_ticks = clock.ticks_for_secs(policy.interval_secs).max(1);
        Self {
            interval_ticks,
            candidates:   policy.candidates.clone(),
            max_pursuers: policy.max_pursuers,
            next_due:     Tick(interval_ticks),
            spawned:      0,
            rng,
        }
    }

    #[inline]
    pub fn interval_ticks(&self) -> u64 {
        self.interval_ticks
    }

    #[inline]
    pub fn spawned(&self) -> usize {
        self.spawned
    }

    #[inline]
    pub fn next_due(&self) -> Tick {
        self.next_due
    }

    pub fn is_exhausted(&self) -> bool {
        self.max_pursuers.is_some_and(|max| self.spawned >= max)
    }

    /// Node for a new pursuer if one is due at `now`, else `None`.
    ///
    /// At most one pursuer per call; a late poll does not catch up on
    /// missed intervals.
    pub fn poll(&mut self, now: Tick) -> CoreResult<Option<NodeId>> {
        if now < self.next_due || self.is_exhausted() {
            return Ok(None);
        }
        let node = *self.rng.choose(&self.candidates)?;
        self.spawned += 1;
        self.next_due = now + self.interval_ticks;
        Ok(Some(node))
    }
}

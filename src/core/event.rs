use crate::core::Particle;
use crate::error::{Error, Result};
use ordered_float::NotNan;
use std::cmp::Ordering;

/// A particle reference inside an event: stable index into the engine's
/// particle array plus the collision count observed when the event was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Slot {
    pub index: u32,
    pub count: u64,
}

impl Slot {
    /// Snapshot particle `index` as it is now.
    #[inline]
    pub fn capture(index: usize, particles: &[Particle]) -> Self {
        Self {
            index: index as u32,
            count: particles[index].count(),
        }
    }

    #[inline]
    fn is_current(&self, particles: &[Particle]) -> bool {
        particles
            .get(self.index as usize)
            .is_some_and(|p| p.count() == self.count)
    }
}

/// What an event predicts.
///
/// Tie-breaking for deterministic ordering at equal times follows declaration
/// order: `Particles` < `VerticalWall` < `HorizontalWall` < `Redraw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// `a` and `b` touch.
    Particles { a: Slot, b: Slot },
    /// `a` reaches `x = 0` or `x = 1`.
    VerticalWall { a: Slot },
    /// `b` reaches `y = 0` or `y = 1`.
    HorizontalWall { b: Slot },
    /// Periodic presentation tick. Carries no particles.
    Redraw,
}

impl EventKind {
    #[inline]
    fn order_key(&self) -> (u8, Option<Slot>, Option<Slot>) {
        match *self {
            EventKind::Particles { a, b } => (0, Some(a), Some(b)),
            EventKind::VerticalWall { a } => (1, Some(a), None),
            EventKind::HorizontalWall { b } => (2, Some(b), None),
            EventKind::Redraw => (3, None, None),
        }
    }

    /// Slots referenced by this event, in `(a, b)` order.
    pub fn slots(&self) -> impl Iterator<Item = Slot> {
        let (_, first, second) = self.order_key();
        first.into_iter().chain(second)
    }
}

/// A scheduled event.
///
/// - `time`: absolute simulated time (finite, non-NaN).
/// - `kind`: what happens, with collision-count snapshots for invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub time: NotNan<f64>,
    pub kind: EventKind,
}

impl Event {
    /// Create a new event, validating that time is finite and non-NaN.
    pub fn new(time: f64, kind: EventKind) -> Result<Self> {
        if !time.is_finite() {
            return Err(Error::InvalidParam(format!(
                "event time must be finite, got {time}"
            )));
        }
        let time = NotNan::new(time)
            .map_err(|_| Error::InvalidParam("event time cannot be NaN".into()))?;
        Ok(Self { time, kind })
    }

    /// Redraw tick at `time`.
    pub fn redraw(time: f64) -> Result<Self> {
        Self::new(time, EventKind::Redraw)
    }

    /// Returns the raw f64 event time.
    #[inline]
    pub fn time_f64(&self) -> f64 {
        self.time.into_inner()
    }

    /// True iff no referenced particle has collided since the event was built.
    /// Redraw events are always valid.
    #[inline]
    pub fn is_valid(&self, particles: &[Particle]) -> bool {
        self.kind.slots().all(|s| s.is_current(particles))
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .cmp(&other.time)
            .then_with(|| self.kind.order_key().cmp(&other.kind.order_key()))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

use crate::core::event::Slot;
use crate::core::particle::Color;
use crate::core::{Event, EventKind, EventQueue, Particle, RandomSource};
use crate::error::{Error, Result};
use tracing::{debug, trace};

/// What a single [`Simulation::step`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Queue empty; nothing happened.
    Idle,
    /// A stale event was dropped. Clock and particles unchanged.
    Discarded,
    /// A particle-particle or particle-wall collision was resolved.
    Collision,
    /// A redraw tick fired. The presentation layer should read a snapshot.
    Redraw,
}

impl StepOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepOutcome::Idle => "idle",
            StepOutcome::Discarded => "discarded",
            StepOutcome::Collision => "collision",
            StepOutcome::Redraw => "redraw",
        }
    }
}

/// Tally of outcomes from [`Simulation::run_until_idle`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub collisions: u64,
    pub redraws: u64,
    pub discarded: u64,
}

/// Read-only copy of what the presentation layer needs from a particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleView {
    pub rx: f64,
    pub ry: f64,
    pub radius: f64,
    pub color: Color,
}

impl From<&Particle> for ParticleView {
    fn from(p: &Particle) -> Self {
        Self {
            rx: p.rx(),
            ry: p.ry(),
            radius: p.radius(),
            color: p.color(),
        }
    }
}

/// Event-driven simulation of discs in the unit square `[0, 1]²`.
///
/// The particle array is fixed at construction; events refer to particles by
/// index. Nothing is scheduled until the first [`step`](Self::step).
#[derive(Debug)]
pub struct Simulation {
    time_now: f64,
    particles: Vec<Particle>,
    pq: EventQueue<Event>,
    seeded: bool,
}

impl Simulation {
    /// Take ownership of `particles`. Their order becomes their event index.
    ///
    /// Errors: `Error::InvalidParam` if there are more particles than event
    /// slots can address.
    pub fn new(particles: Vec<Particle>) -> Result<Self> {
        if u32::try_from(particles.len()).is_err() {
            return Err(Error::InvalidParam(format!(
                "too many particles: {}",
                particles.len()
            )));
        }
        Ok(Self {
            time_now: 0.0,
            particles,
            pq: EventQueue::new(),
            seeded: false,
        })
    }

    /// `num_particles` random particles drawn from `rng` (see [`Particle::random`]).
    pub fn random<R: RandomSource + ?Sized>(num_particles: usize, rng: &mut R) -> Result<Self> {
        let particles = (0..num_particles).map(|_| Particle::random(rng)).collect();
        Self::new(particles)
    }

    /// Returns current simulation time.
    pub fn time(&self) -> f64 {
        self.time_now
    }

    /// Number of particles.
    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }

    /// Events currently queued, stale ones included.
    pub fn pending_events(&self) -> usize {
        self.pq.len()
    }

    /// Whether the first `step` has populated the queue.
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    /// Read-only view of the particles, in construction order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Per-tick copy of positions, radii and colors.
    pub fn snapshot(&self) -> Vec<ParticleView> {
        self.particles.iter().map(ParticleView::from).collect()
    }

    /// Compute total kinetic energy (diagnostic).
    pub fn kinetic_energy(&self) -> f64 {
        self.particles.iter().map(Particle::kinetic_energy).sum()
    }

    /// Process at most one event.
    ///
    /// The first call seeds the queue with every particle's predictions and a
    /// redraw tick at time 0. Each call then extracts the earliest event; a
    /// stale one is dropped and the call returns `Discarded` without trying
    /// the next. Nothing is scheduled past `time_limit`, and redraw ticks are
    /// spaced `1 / redraw_hz` apart.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `time_limit` is NaN or `redraw_hz` is not a
    ///   finite number > 0.
    /// - `Error::MathError` if a particle-particle collision is degenerate.
    pub fn step(&mut self, time_limit: f64, redraw_hz: f64) -> Result<StepOutcome> {
        if time_limit.is_nan() {
            return Err(Error::InvalidParam("time_limit cannot be NaN".into()));
        }
        if !redraw_hz.is_finite() || redraw_hz <= 0.0 {
            return Err(Error::InvalidParam(format!(
                "redraw_hz must be finite and > 0, got {redraw_hz}"
            )));
        }

        if !self.seeded {
            self.seed(time_limit)?;
        }

        if self.pq.is_empty() {
            return Ok(StepOutcome::Idle);
        }

        let ev = self.pq.extract_min()?;
        if !ev.is_valid(&self.particles) {
            trace!(time = ev.time_f64(), kind = ?ev.kind, "discarding stale event");
            return Ok(StepOutcome::Discarded);
        }

        let t_ev = ev.time_f64();
        self.drift_all(t_ev - self.time_now);
        self.time_now = t_ev;

        let outcome = match ev.kind {
            EventKind::Particles { a, b } => {
                let (pa, pb) = self.pair_mut(a.index as usize, b.index as usize)?;
                pa.bounce_off(pb)?;
                StepOutcome::Collision
            }
            EventKind::VerticalWall { a } => {
                self.particles[a.index as usize].bounce_off_vertical_wall();
                StepOutcome::Collision
            }
            EventKind::HorizontalWall { b } => {
                self.particles[b.index as usize].bounce_off_horizontal_wall();
                StepOutcome::Collision
            }
            EventKind::Redraw => {
                trace!(time = t_ev, "redraw");
                // A period below the clock's resolution would land back on t_ev
                let next = t_ev + 1.0 / redraw_hz;
                if next > t_ev {
                    self.schedule(next, time_limit, EventKind::Redraw)?;
                } else {
                    debug!(
                        time = t_ev,
                        redraw_hz,
                        "redraw period below clock resolution; not rescheduled"
                    );
                }
                StepOutcome::Redraw
            }
        };
        if outcome == StepOutcome::Collision {
            debug!(time = t_ev, kind = ?ev.kind, pending = self.pq.len(), "collision");
        }

        for slot in ev.kind.slots() {
            self.predict(slot.index as usize, time_limit)?;
        }

        Ok(outcome)
    }

    /// Call [`step`](Self::step) until the queue drains.
    ///
    /// Errors: `Error::InvalidParam` if `time_limit` is not finite, since the
    /// redraw tick would otherwise reschedule itself forever.
    pub fn run_until_idle(&mut self, time_limit: f64, redraw_hz: f64) -> Result<RunStats> {
        if !time_limit.is_finite() {
            return Err(Error::InvalidParam(
                "run_until_idle requires a finite time_limit".into(),
            ));
        }
        let mut stats = RunStats::default();
        loop {
            match self.step(time_limit, redraw_hz)? {
                StepOutcome::Idle => break,
                StepOutcome::Discarded => stats.discarded += 1,
                StepOutcome::Collision => stats.collisions += 1,
                StepOutcome::Redraw => stats.redraws += 1,
            }
        }
        debug!(
            time = self.time_now,
            collisions = stats.collisions,
            redraws = stats.redraws,
            discarded = stats.discarded,
            "queue drained"
        );
        Ok(stats)
    }

    // ============ Internal helpers ============

    fn seed(&mut self, time_limit: f64) -> Result<()> {
        for i in 0..self.particles.len() {
            self.predict(i, time_limit)?;
        }
        self.pq.insert(Event::redraw(self.time_now)?);
        self.seeded = true;
        debug!(
            particles = self.particles.len(),
            pending = self.pq.len(),
            time_limit,
            "seeded event queue"
        );
        Ok(())
    }

    /// Queue particle `i`'s collisions with every other particle and both walls.
    fn predict(&mut self, i: usize, time_limit: f64) -> Result<()> {
        let a = Slot::capture(i, &self.particles);
        for j in 0..self.particles.len() {
            if j == i {
                continue;
            }
            let dt = self.particles[i].time_to_hit(&self.particles[j]);
            let b = Slot::capture(j, &self.particles);
            self.schedule(self.time_now + dt, time_limit, EventKind::Particles { a, b })?;
        }

        let p = &self.particles[i];
        let (dtx, dty) = (p.time_to_hit_vertical_wall(), p.time_to_hit_horizontal_wall());
        self.schedule(self.time_now + dtx, time_limit, EventKind::VerticalWall { a })?;
        self.schedule(self.time_now + dty, time_limit, EventKind::HorizontalWall { b: a })?;
        Ok(())
    }

    /// Insert an event at absolute time `t` unless it lies past the horizon.
    /// Infinite times never qualify, even against an infinite horizon.
    fn schedule(&mut self, t: f64, time_limit: f64, kind: EventKind) -> Result<()> {
        if t.is_finite() && t <= time_limit {
            self.pq.insert(Event::new(t, kind)?);
        }
        Ok(())
    }

    /// Drift all particles by `dt` along straight lines.
    fn drift_all(&mut self, dt: f64) {
        if dt == 0.0 {
            return;
        }
        for p in &mut self.particles {
            p.drift(dt);
        }
    }

    fn pair_mut(&mut self, i: usize, j: usize) -> Result<(&mut Particle, &mut Particle)> {
        if i == j {
            return Err(Error::MathError(format!(
                "particle {i} cannot collide with itself"
            )));
        }
        if i < j {
            let (lo, hi) = self.particles.split_at_mut(j);
            Ok((&mut lo[i], &mut hi[0]))
        } else {
            let (lo, hi) = self.particles.split_at_mut(i);
            Ok((&mut hi[0], &mut lo[j]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn head_on() -> Result<Simulation> {
        Simulation::new(vec![
            Particle::new(0.30, 0.50, 0.01, 0.0, 0.02, 0.5, Color::BLACK)?,
            Particle::new(0.70, 0.50, -0.01, 0.0, 0.02, 0.5, Color::BLACK)?,
        ])
    }

    #[test]
    fn nothing_scheduled_before_first_step() -> Result<()> {
        let sim = head_on()?;
        assert!(!sim.is_seeded());
        assert_eq!(sim.pending_events(), 0);
        assert_eq!(sim.time(), 0.0);
        Ok(())
    }

    #[test]
    fn first_step_seeds_and_fires_initial_redraw() -> Result<()> {
        let mut sim = head_on()?;
        // Seeds: (0,1)@18, (1,0)@18, two vertical walls @68, redraw @0.
        // The redraw fires and reschedules itself at 10.
        let out = sim.step(100.0, 0.1)?;
        assert_eq!(out, StepOutcome::Redraw);
        assert!(sim.is_seeded());
        assert_eq!(sim.time(), 0.0);
        assert_eq!(sim.pending_events(), 5);
        Ok(())
    }

    #[test]
    fn processes_one_event_per_call_and_discards_stale_duplicates() -> Result<()> {
        let mut sim = head_on()?;
        assert_eq!(sim.step(100.0, 0.1)?, StepOutcome::Redraw); // t = 0
        assert_eq!(sim.step(100.0, 0.1)?, StepOutcome::Redraw); // t = 10
        assert_eq!(sim.time(), 10.0);

        assert_eq!(sim.step(100.0, 0.1)?, StepOutcome::Collision);
        assert!((sim.time() - 18.0).abs() < 1e-9);
        let ps = sim.particles();
        assert!((ps[0].vx() + 0.01).abs() < 1e-12);
        assert!((ps[1].vx() - 0.01).abs() < 1e-12);
        assert_eq!((ps[0].count(), ps[1].count()), (1, 1));
        assert!(((ps[1].rx() - ps[0].rx()) - 0.04).abs() < 1e-9);

        // Mirror prediction (1,0)@18 is now stale
        let t = sim.time();
        assert_eq!(sim.step(100.0, 0.1)?, StepOutcome::Discarded);
        assert_eq!(sim.time(), t);

        assert_eq!(sim.step(100.0, 0.1)?, StepOutcome::Redraw);
        assert_eq!(sim.time(), 20.0);
        Ok(())
    }

    #[test]
    fn horizon_excludes_late_events() -> Result<()> {
        let mut sim = head_on()?;
        // Collision at 18 and walls at 68 lie past the horizon; only redraws remain.
        let stats = sim.run_until_idle(15.0, 0.2)?;
        assert_eq!(stats.collisions, 0);
        assert_eq!(stats.redraws, 4); // t = 0, 5, 10, 15
        assert_eq!(sim.step(15.0, 0.2)?, StepOutcome::Idle);
        assert_eq!(sim.pending_events(), 0);
        Ok(())
    }

    #[test]
    fn infinite_horizon_never_schedules_infinite_times() -> Result<()> {
        let mut sim = Simulation::new(vec![Particle::new(
            0.5,
            0.5,
            0.0,
            0.0,
            0.02,
            1.0,
            Color::BLACK,
        )?])?;
        assert_eq!(sim.step(f64::INFINITY, 1.0)?, StepOutcome::Redraw);
        // Only the next redraw is pending
        assert_eq!(sim.pending_events(), 1);
        Ok(())
    }

    #[test]
    fn rejects_bad_step_arguments() -> Result<()> {
        let mut sim = head_on()?;
        assert!(sim.step(f64::NAN, 1.0).is_err());
        assert!(sim.step(10.0, 0.0).is_err());
        assert!(sim.step(10.0, f64::NAN).is_err());
        assert!(sim.step(10.0, f64::INFINITY).is_err());
        assert!(sim.run_until_idle(f64::INFINITY, 1.0).is_err());
        assert!(!sim.is_seeded());
        Ok(())
    }

    #[test]
    fn infinite_redraw_rate_rejected() -> Result<()> {
        let mut sim = Simulation::new(vec![Particle::new(
            0.5,
            0.5,
            0.0,
            0.0,
            0.02,
            1.0,
            Color::BLACK,
        )?])?;
        let err = sim.step(10.0, f64::INFINITY).unwrap_err();
        assert!(matches!(err, Error::InvalidParam(_)));
        assert!(sim.run_until_idle(10.0, f64::INFINITY).is_err());
        assert!(!sim.is_seeded());
        Ok(())
    }

    #[test]
    fn redraw_period_below_clock_resolution_is_not_rescheduled() -> Result<()> {
        let mut sim = Simulation::new(Vec::new())?;
        // Redraws at 0, 2, 4; the tick at 6 stays queued
        for _ in 0..3 {
            assert_eq!(sim.step(1e6, 0.5)?, StepOutcome::Redraw);
        }
        assert_eq!(sim.time(), 4.0);
        assert_eq!(sim.pending_events(), 1);

        // 6 + 1e-17 rounds back to 6
        assert_eq!(sim.step(1e6, 1e17)?, StepOutcome::Redraw);
        assert_eq!(sim.time(), 6.0);
        assert_eq!(sim.pending_events(), 0);
        assert_eq!(sim.step(1e6, 1e17)?, StepOutcome::Idle);

        let stats = sim.run_until_idle(1e6, 1e17)?;
        assert_eq!(stats, RunStats::default());
        assert_eq!(sim.time(), 6.0);
        Ok(())
    }

    #[test]
    fn snapshot_matches_particles() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(5);
        let sim = Simulation::random(10, &mut rng)?;
        let snap = sim.snapshot();
        assert_eq!(snap.len(), 10);
        for (v, p) in snap.iter().zip(sim.particles()) {
            assert_eq!((v.rx, v.ry, v.radius), (p.rx(), p.ry(), p.radius()));
            assert_eq!(v.color, p.color());
        }
        Ok(())
    }

    #[test]
    fn pair_mut_rejects_self_pair() -> Result<()> {
        let mut sim = head_on()?;
        assert!(sim.pair_mut(1, 1).is_err());
        let (b, a) = sim.pair_mut(1, 0)?;
        assert!(b.rx() > a.rx());
        Ok(())
    }
}

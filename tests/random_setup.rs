use collisim::core::particle::{RANDOM_MASS, RANDOM_RADIUS, RANDOM_SPEED};
use collisim::core::{Particle, RandomSource, Simulation, StepOutcome};
use collisim::error::Result;
use rand::{rngs::StdRng, SeedableRng};

/// Scripted source: returns values from a fixed list, scaled into the requested range.
struct Scripted {
    fractions: Vec<f64>,
    next: usize,
}

impl RandomSource for Scripted {
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        let f = self.fractions[self.next % self.fractions.len()];
        self.next += 1;
        min + f * (max - min)
    }
}

#[test]
fn random_particles_use_documented_ranges() {
    let mut rng = StdRng::seed_from_u64(8);
    for _ in 0..500 {
        let p = Particle::random(&mut rng);
        assert!((0.0..1.0).contains(&p.rx()) && (0.0..1.0).contains(&p.ry()));
        assert!((-RANDOM_SPEED..RANDOM_SPEED).contains(&p.vx()));
        assert!((-RANDOM_SPEED..RANDOM_SPEED).contains(&p.vy()));
        assert_eq!(p.radius(), RANDOM_RADIUS);
        assert_eq!(p.mass(), RANDOM_MASS);
        assert_eq!(p.count(), 0);
    }
}

#[test]
fn random_particle_draws_from_injected_source() {
    let mut src = Scripted {
        fractions: vec![0.25, 0.5, 0.0, 0.75],
        next: 0,
    };
    let p = Particle::random(&mut src);
    assert_eq!(p.rx(), 0.25);
    assert_eq!(p.ry(), 0.5);
    assert_eq!(p.vx(), -0.005);
    assert!((p.vy() - 0.0025).abs() < 1e-15);
}

#[test]
fn seeded_population_is_reproducible() -> Result<()> {
    let a = Simulation::random(40, &mut StdRng::seed_from_u64(3))?;
    let b = Simulation::random(40, &mut StdRng::seed_from_u64(3))?;
    assert_eq!(a.num_particles(), 40);
    assert_eq!(a.particles(), b.particles());
    Ok(())
}

#[test]
fn empty_population_only_redraws() -> Result<()> {
    let mut sim = Simulation::random(0, &mut StdRng::seed_from_u64(1))?;
    let stats = sim.run_until_idle(3.0, 1.0)?;
    assert_eq!(stats.collisions, 0);
    assert_eq!(stats.redraws, 4);
    assert_eq!(sim.step(3.0, 1.0)?, StepOutcome::Idle);
    Ok(())
}

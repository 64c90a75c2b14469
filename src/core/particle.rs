use crate::core::random::RandomSource;
use crate::error::{Error, Result};

/// Radius of particles built by [`Particle::random`].
pub const RANDOM_RADIUS: f64 = 0.02;
/// Mass of particles built by [`Particle::random`].
pub const RANDOM_MASS: f64 = 0.5;
/// Velocity components of random particles are drawn from `[-RANDOM_SPEED, RANDOM_SPEED)`.
pub const RANDOM_SPEED: f64 = 0.005;

/// Display color of a particle. Carried for the presentation layer only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A hard disc moving inside the unit square.
///
/// Fields are private: once a particle is handed to the engine it is the only
/// writer. Everything else reads through the accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    rx: f64,
    ry: f64,
    vx: f64,
    vy: f64,
    radius: f64,
    mass: f64,
    color: Color,
    count: u64,
}

impl Particle {
    /// Create a particle after validating invariants.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `radius` or `mass` is non-positive, or any
    ///   component is NaN/inf.
    pub fn new(
        rx: f64,
        ry: f64,
        vx: f64,
        vy: f64,
        radius: f64,
        mass: f64,
        color: Color,
    ) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::InvalidParam("radius must be finite and > 0".into()));
        }
        if !mass.is_finite() || mass <= 0.0 {
            return Err(Error::InvalidParam("mass must be finite and > 0".into()));
        }
        if !rx.is_finite() || !ry.is_finite() {
            return Err(Error::InvalidParam("position must be finite".into()));
        }
        if !vx.is_finite() || !vy.is_finite() {
            return Err(Error::InvalidParam("velocity must be finite".into()));
        }
        Ok(Self {
            rx,
            ry,
            vx,
            vy,
            radius,
            mass,
            color,
            count: 0,
        })
    }

    /// Random particle: position uniform in `[0, 1)²`, velocity components
    /// uniform in `[-0.005, 0.005)`, radius 0.02, mass 0.5.
    pub fn random<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        let rx = rng.uniform(0.0, 1.0);
        let ry = rng.uniform(0.0, 1.0);
        let vx = rng.uniform(-RANDOM_SPEED, RANDOM_SPEED);
        let vy = rng.uniform(-RANDOM_SPEED, RANDOM_SPEED);
        let mut channel = || rng.uniform(0.0, 256.0) as u8;
        let color = Color::rgb(channel(), channel(), channel());
        Self {
            rx,
            ry,
            vx,
            vy,
            radius: RANDOM_RADIUS,
            mass: RANDOM_MASS,
            color,
            count: 0,
        }
    }

    #[inline]
    pub fn rx(&self) -> f64 {
        self.rx
    }

    #[inline]
    pub fn ry(&self) -> f64 {
        self.ry
    }

    #[inline]
    pub fn vx(&self) -> f64 {
        self.vx
    }

    #[inline]
    pub fn vy(&self) -> f64 {
        self.vy
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Number of collisions this particle has taken part in.
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Linear extrapolation by `dt`. No bounds handling.
    #[inline]
    pub fn drift(&mut self, dt: f64) {
        self.rx += self.vx * dt;
        self.ry += self.vy * dt;
    }

    /// Time until this particle's surface touches `other`'s, or `f64::INFINITY`
    /// if they never meet on their current trajectories.
    ///
    /// Only relative position and velocity enter the formula, so
    /// `a.time_to_hit(b) == b.time_to_hit(a)` holds bit for bit.
    pub fn time_to_hit(&self, other: &Particle) -> f64 {
        let dx = other.rx - self.rx;
        let dy = other.ry - self.ry;
        let dvx = other.vx - self.vx;
        let dvy = other.vy - self.vy;
        let dvdr = dx * dvx + dy * dvy;
        if dvdr >= 0.0 {
            return f64::INFINITY;
        }
        let dvdv = dvx * dvx + dvy * dvy;
        if dvdv == 0.0 {
            return f64::INFINITY;
        }
        let drdr = dx * dx + dy * dy;
        let sigma = self.radius + other.radius;
        let d = dvdr * dvdr - dvdv * (drdr - sigma * sigma);
        if d < 0.0 {
            return f64::INFINITY;
        }
        -(dvdr + d.sqrt()) / dvdv
    }

    /// Time until the particle's edge reaches `x = 0` or `x = 1`.
    pub fn time_to_hit_vertical_wall(&self) -> f64 {
        time_to_wall(self.rx, self.vx, self.radius)
    }

    /// Time until the particle's edge reaches `y = 0` or `y = 1`.
    pub fn time_to_hit_horizontal_wall(&self) -> f64 {
        time_to_wall(self.ry, self.vy, self.radius)
    }

    /// Elastic collision with `other` along the line of centers.
    ///
    /// Assumes the two discs are in contact; overlap is not corrected.
    ///
    /// Errors:
    /// - `Error::MathError` if both centers coincide. Neither particle is
    ///   modified in that case.
    pub fn bounce_off(&mut self, other: &mut Particle) -> Result<()> {
        let dx = other.rx - self.rx;
        let dy = other.ry - self.ry;
        let dvx = other.vx - self.vx;
        let dvy = other.vy - self.vy;
        let dvdr = dx * dvx + dy * dvy;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist == 0.0 {
            return Err(Error::MathError(
                "coincident centers: line of contact undefined".into(),
            ));
        }

        // Impulse magnitude along the unit normal
        let magnitude = 2.0 * self.mass * other.mass * dvdr / ((self.mass + other.mass) * dist);
        let fx = magnitude * dx / dist;
        let fy = magnitude * dy / dist;

        self.vx += fx / self.mass;
        self.vy += fy / self.mass;
        other.vx -= fx / other.mass;
        other.vy -= fy / other.mass;

        self.bump_count();
        other.bump_count();
        Ok(())
    }

    /// Reflect off a vertical wall.
    pub fn bounce_off_vertical_wall(&mut self) {
        self.vx = -self.vx;
        self.bump_count();
    }

    /// Reflect off a horizontal wall.
    pub fn bounce_off_horizontal_wall(&mut self) {
        self.vy = -self.vy;
        self.bump_count();
    }

    /// Returns the particle's kinetic energy: 1/2 m |v|^2.
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * (self.vx * self.vx + self.vy * self.vy)
    }

    /// Linear momentum `(m vx, m vy)`.
    #[inline]
    pub fn momentum(&self) -> (f64, f64) {
        (self.mass * self.vx, self.mass * self.vy)
    }

    #[inline]
    fn bump_count(&mut self) {
        self.count = self.count.saturating_add(1);
    }
}

/// Wall contact time along one axis of the unit square.
#[inline]
fn time_to_wall(x: f64, v: f64, radius: f64) -> f64 {
    if v > 0.0 {
        (1.0 - x - radius) / v
    } else if v < 0.0 {
        (radius - x) / v
    } else {
        f64::INFINITY
    }
}

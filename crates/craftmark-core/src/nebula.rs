//! Decorative particle field drawn behind the recorder.
//!
//! Pure simulation: front ends call [`NebulaField::step`] once per frame and
//! draw each particle as a dot of its color and alpha.

use rand::Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PARTICLES: usize = 60;

const FADE_PER_FRAME: f64 = 0.001;
const RESPAWN_ALPHA: f64 = 0.5;
/// Particles at or below this size never fade.
const FADE_MIN_SIZE: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleColor {
    Cyan,
    Pink,
}

impl ParticleColor {
    pub fn hex(self) -> &'static str {
        match self {
            ParticleColor::Cyan => "#00FFD1",
            ParticleColor::Pink => "#FF2E63",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub speed_x: f64,
    pub speed_y: f64,
    pub color: ParticleColor,
    pub alpha: f64,
}

impl Particle {
    pub fn random<R: Rng>(rng: &mut R, width: f64, height: f64) -> Self {
        Self {
            x: rng.gen::<f64>() * width,
            y: rng.gen::<f64>() * height,
            size: rng.gen::<f64>() * 2.0,
            speed_x: rng.gen::<f64>() * 0.5 - 0.25,
            speed_y: rng.gen::<f64>() * 0.5 - 0.25,
            color: if rng.gen::<f64>() > 0.5 {
                ParticleColor::Cyan
            } else {
                ParticleColor::Pink
            },
            alpha: rng.gen::<f64>() * 0.5,
        }
    }

    fn update<R: Rng>(&mut self, rng: &mut R, width: f64, height: f64) {
        self.x += self.speed_x;
        self.y += self.speed_y;
        if self.size > FADE_MIN_SIZE {
            self.alpha -= FADE_PER_FRAME;
        }
        if self.alpha <= 0.0 {
            self.x = rng.gen::<f64>() * width;
            self.y = rng.gen::<f64>() * height;
            self.alpha = RESPAWN_ALPHA;
        }
        if self.x < 0.0 || self.x > width {
            self.speed_x = -self.speed_x;
        }
        if self.y < 0.0 || self.y > height {
            self.speed_y = -self.speed_y;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NebulaField {
    width: f64,
    height: f64,
    particles: Vec<Particle>,
}

impl NebulaField {
    pub fn new<R: Rng>(rng: &mut R, width: f64, height: f64, count: usize) -> Self {
        let particles = (0..count)
            .map(|_| Particle::random(rng, width, height))
            .collect();
        Self {
            width,
            height,
            particles,
        }
    }

    pub fn from_particles(width: f64, height: f64, particles: Vec<Particle>) -> Self {
        Self {
            width,
            height,
            particles,
        }
    }

    /// Advance one animation frame.
    pub fn step<R: Rng>(&mut self, rng: &mut R) {
        let (w, h) = (self.width, self.height);
        for p in &mut self.particles {
            p.update(rng, w, h);
        }
    }

    /// Track a new canvas size. Existing particles keep their positions and
    /// bounce back in over the next frames.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn mean_alpha(&self) -> f64 {
        if self.particles.is_empty() {
            return 0.0;
        }
        self.particles.iter().map(|p| p.alpha).sum::<f64>() / self.particles.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn particle(x: f64, y: f64, size: f64, alpha: f64) -> Particle {
        Particle {
            x,
            y,
            size,
            speed_x: 0.2,
            speed_y: -0.2,
            color: ParticleColor::Cyan,
            alpha,
        }
    }

    #[test]
    fn new_field_respects_ranges() {
        let mut rng = Pcg64::seed_from_u64(7);
        let field = NebulaField::new(&mut rng, 390.0, 844.0, DEFAULT_PARTICLES);
        assert_eq!(field.particles().len(), 60);
        for p in field.particles() {
            assert!((0.0..390.0).contains(&p.x));
            assert!((0.0..844.0).contains(&p.y));
            assert!((0.0..2.0).contains(&p.size));
            assert!((-0.25..0.25).contains(&p.speed_x));
            assert!((0.0..0.5).contains(&p.alpha));
        }
    }

    #[test]
    fn large_particles_fade_small_ones_do_not() {
        let mut rng = Pcg64::seed_from_u64(1);
        let mut field = NebulaField::from_particles(
            100.0,
            100.0,
            vec![particle(50.0, 50.0, 1.0, 0.3), particle(50.0, 50.0, 0.1, 0.3)],
        );
        field.step(&mut rng);
        let ps = field.particles();
        assert!((ps[0].alpha - 0.299).abs() < 1e-9);
        assert_eq!(ps[1].alpha, 0.3);
        assert!((ps[0].x - 50.2).abs() < 1e-9);
        assert!((ps[0].y - 49.8).abs() < 1e-9);
    }

    #[test]
    fn faded_particle_respawns() {
        let mut rng = Pcg64::seed_from_u64(3);
        let mut field =
            NebulaField::from_particles(100.0, 100.0, vec![particle(50.0, 50.0, 1.0, 0.0005)]);
        field.step(&mut rng);
        let p = field.particles()[0];
        assert_eq!(p.alpha, 0.5);
        assert!((0.0..100.0).contains(&p.x));
    }

    #[test]
    fn particles_bounce_off_edges() {
        let mut rng = Pcg64::seed_from_u64(5);
        let mut field =
            NebulaField::from_particles(100.0, 100.0, vec![particle(99.9, 0.1, 0.1, 0.3)]);
        field.step(&mut rng);
        let p = field.particles()[0];
        assert!(p.speed_x < 0.0);
        assert!(p.speed_y > 0.0);
    }

    #[test]
    fn shrinking_canvas_turns_particles_around() {
        let mut rng = Pcg64::seed_from_u64(9);
        let mut field =
            NebulaField::from_particles(400.0, 400.0, vec![particle(300.0, 50.0, 0.1, 0.3)]);
        field.resize(200.0, 400.0);
        assert_eq!(field.size(), (200.0, 400.0));
        field.step(&mut rng);
        assert!(field.particles()[0].speed_x < 0.0);
    }

    #[test]
    fn color_hex() {
        assert_eq!(ParticleColor::Cyan.hex(), "#00FFD1");
        assert_eq!(ParticleColor::Pink.hex(), "#FF2E63");
    }
}

use rand::Rng;

/// One expanding spark of the completion ripple.
#[derive(Debug, Clone)]
pub struct RippleParticle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
}

impl RippleParticle {
    /// Particle `i` of `count`, radiating outward from the burst center with
    /// a little angular and speed jitter.
    fn new(center_x: f64, center_y: f64, i: usize, count: usize) -> Self {
        let mut rng = rand::thread_rng();
        let angle = (i as f64 / count as f64) * std::f64::consts::TAU
            + rng.gen_range(-0.2..0.2);
        let speed = rng.gen_range(6.0..14.0);

        Self {
            x: center_x,
            y: center_y,
            vel_x: angle.cos() * speed,
            // Terminal cells are taller than wide; flatten vertical motion.
            vel_y: angle.sin() * speed * 0.5,
            symbol: ['○', '◦', '*', '·'][i % 4],
            color_index: rng.gen_range(0..5),
            age: 0.0,
            max_age: rng.gen_range(0.5..0.9),
        }
    }
}

/// The ambient ripple burst the demo screen plays on completion. Keyed by a
/// trigger counter: each increment spawns a fresh burst from the button's
/// center. Pure state plus `update(dt)`; rendering lives in the ui module.
#[derive(Debug, Default)]
pub struct RippleBurst {
    pub particles: Vec<RippleParticle>,
    bounds: (f64, f64),
}

impl RippleBurst {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        !self.particles.is_empty()
    }

    pub fn spawn(&mut self, center_x: f64, center_y: f64, width: u16, height: u16) {
        self.bounds = (width as f64, height as f64);
        let count = 24;
        for i in 0..count {
            self.particles
                .push(RippleParticle::new(center_x, center_y, i, count));
        }
    }

    /// Advance all particles by `dt` seconds, retiring the expired and the
    /// out-of-bounds.
    pub fn update(&mut self, dt: f64) {
        let (width, height) = self.bounds;
        for p in self.particles.iter_mut() {
            p.x += p.vel_x * dt;
            p.y += p.vel_y * dt;
            p.age += dt;
        }
        self.particles.retain(|p| {
            p.age < p.max_age && p.x >= 0.0 && p.x < width && p.y >= 0.0 && p.y < height
        });
    }
}

use rand::Rng;

const SPARKS_PER_IMPACT: usize = 5;
const SPARK_LIFETIME_MS: u64 = 300;
const FLOAT_LIFETIME_MS: u64 = 800;
/// How far a score popup rises before it fades out
const FLOAT_RISE: f32 = 50.0;

pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

/// Impact spark flying out from a hit
#[derive(Debug, Clone)]
pub struct Spark {
    pub x: f32,
    pub y: f32,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub born_at: u64,
}

impl Spark {
    pub fn update(&mut self, dt_ms: u64) {
        let dt = dt_ms as f32 / 1000.0;
        self.x += self.velocity_x * dt;
        self.y += self.velocity_y * dt;
    }

    /// 1.0 when fresh, 0.0 when gone
    pub fn alpha(&self, now: u64) -> f32 {
        let t = now.saturating_sub(self.born_at) as f32 / SPARK_LIFETIME_MS as f32;
        lerp(1.0, 0.0, t)
    }

    pub fn is_dead(&self, now: u64) -> bool {
        now >= self.born_at + SPARK_LIFETIME_MS
    }
}

/// "+100" popup that drifts up and fades
#[derive(Debug, Clone)]
pub struct FloatingText {
    pub text: String,
    pub x: f32,
    pub start_y: f32,
    pub born_at: u64,
}

impl FloatingText {
    fn progress(&self, now: u64) -> f32 {
        now.saturating_sub(self.born_at) as f32 / FLOAT_LIFETIME_MS as f32
    }

    pub fn y(&self, now: u64) -> f32 {
        lerp(self.start_y, self.start_y - FLOAT_RISE, self.progress(now))
    }

    pub fn alpha(&self, now: u64) -> f32 {
        lerp(1.0, 0.0, self.progress(now))
    }

    pub fn is_dead(&self, now: u64) -> bool {
        now >= self.born_at + FLOAT_LIFETIME_MS
    }
}

/// Short-lived visual effects owned by the scene
#[derive(Debug, Clone, Default)]
pub struct Effects {
    pub sparks: Vec<Spark>,
    pub floating_texts: Vec<FloatingText>,
}

impl Effects {
    pub fn spawn_sparks<R: Rng>(&mut self, rng: &mut R, x: f32, y: f32, now: u64) {
        for _ in 0..SPARKS_PER_IMPACT {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = rng.random_range(50.0..150.0);
            self.sparks.push(Spark {
                x,
                y,
                velocity_x: angle.cos() * speed,
                velocity_y: angle.sin() * speed,
                born_at: now,
            });
        }
    }

    pub fn spawn_floating_score(&mut self, x: f32, y: f32, amount: u32, now: u64) {
        self.floating_texts.push(FloatingText {
            text: format!("+{amount}"),
            x,
            start_y: y,
            born_at: now,
        });
    }

    pub fn update(&mut self, dt_ms: u64, now: u64) {
        for spark in &mut self.sparks {
            spark.update(dt_ms);
        }
        self.sparks.retain(|s| !s.is_dead(now));
        self.floating_texts.retain(|t| !t.is_dead(now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(0.0, 10.0, 2.0), 10.0);
        assert_eq!(lerp(0.0, 10.0, -1.0), 0.0);
    }

    #[test]
    fn test_sparks_burst_and_fade() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut effects = Effects::default();
        effects.spawn_sparks(&mut rng, 100.0, 100.0, 0);
        assert_eq!(effects.sparks.len(), 5);

        effects.update(16, 150);
        assert!(effects.sparks.iter().all(|s| (s.alpha(150) - 0.5).abs() < 1e-6));

        effects.update(16, 300);
        assert!(effects.sparks.is_empty());
    }

    #[test]
    fn test_floating_score_rises_and_fades() {
        let mut effects = Effects::default();
        effects.spawn_floating_score(200.0, 500.0, 100, 1000);
        let text = &effects.floating_texts[0];
        assert_eq!(text.text, "+100");
        assert_eq!(text.y(1000), 500.0);
        assert_eq!(text.y(1400), 475.0);
        assert_eq!(text.alpha(1400), 0.5);
        assert_eq!(text.y(5000), 450.0);

        effects.update(16, 1800);
        assert!(effects.floating_texts.is_empty());
    }
}

use serde::Deserialize;

use crate::constants::*;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
    /// Distance to the target below which the spring may come to rest.
    pub rest_delta: f32,
    /// Speed below which the spring may come to rest.
    pub rest_speed: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: SPRING_STIFFNESS,
            damping: SPRING_DAMPING,
            mass: SPRING_MASS,
            rest_delta: SPRING_REST_DELTA,
            rest_speed: SPRING_REST_SPEED,
        }
    }
}

impl SpringConfig {
    pub fn damping_ratio(&self) -> f32 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    fn natural_frequency(&self) -> f32 {
        (self.stiffness / self.mass).sqrt()
    }
}

#[derive(Debug, Clone)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
    settled: bool,
}

impl Spring {
    pub fn new(value: f32, config: SpringConfig) -> Self {
        Self {
            config,
            value,
            velocity: 0.0,
            target: value,
            settled: true,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    #[cfg(test)]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Retargets an in-flight animation without resetting its velocity.
    pub fn set_target(&mut self, target: f32) {
        if target != self.target {
            self.target = target;
            self.settled = false;
        }
    }

    /// Jumps to `value` and stops.
    pub fn snap_to(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
        self.settled = true;
    }

    pub fn update(&mut self, dt: f32) {
        if self.settled || dt <= 0.0 {
            return;
        }

        let (displacement, velocity) = step(&self.config, self.value - self.target, self.velocity, dt);
        self.value = self.target + displacement;
        self.velocity = velocity;

        if displacement.abs() < self.config.rest_delta && velocity.abs() < self.config.rest_speed {
            self.snap_to(self.target);
        }
    }
}

// Closed-form solution of m*x'' + c*x' + k*x = 0, exact for any t
/// Advances displacement `x0` and velocity `v0` by `t` seconds.
fn step(config: &SpringConfig, x0: f32, v0: f32, t: f32) -> (f32, f32) {
    let omega = config.natural_frequency();
    let zeta = config.damping_ratio();

    if (zeta - 1.0).abs() < 1e-4 {
        // Critically damped
        let decay = (-omega * t).exp();
        let b = v0 + omega * x0;
        let x = decay * (x0 + b * t);
        let v = decay * (v0 - omega * b * t);
        (x, v)
    } else if zeta < 1.0 {
        let omega_d = omega * (1.0 - zeta * zeta).sqrt();
        let decay = (-zeta * omega * t).exp();
        let (sin, cos) = (omega_d * t).sin_cos();
        let a = x0;
        let b = (v0 + zeta * omega * x0) / omega_d;
        let x = decay * (a * cos + b * sin);
        let v = decay * (-zeta * omega * (a * cos + b * sin) + omega_d * (b * cos - a * sin));
        (x, v)
    } else {
        let s = omega * (zeta * zeta - 1.0).sqrt();
        let r1 = -zeta * omega + s;
        let r2 = -zeta * omega - s;
        let a = (v0 - r2 * x0) / (r1 - r2);
        let b = x0 - a;
        let (e1, e2) = ((r1 * t).exp(), (r2 * t).exp());
        (a * e1 + b * e2, a * r1 * e1 + b * r2 * e2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn settle(spring: &mut Spring) -> usize {
        let mut frames = 0;
        while !spring.is_settled() && frames < 10_000 {
            spring.update(DT);
            frames += 1;
        }
        frames
    }

    #[test]
    fn default_config_is_overdamped() {
        let config = SpringConfig::default();
        assert_eq!(config.stiffness, 300.0);
        assert_eq!(config.damping, 60.0);
        assert_eq!(config.mass, 1.0);
        assert!(config.damping_ratio() > 1.0);
    }

    #[test]
    fn new_spring_is_at_rest() {
        let mut spring = Spring::new(42.0, SpringConfig::default());
        assert!(spring.is_settled());
        spring.update(DT);
        assert_eq!(spring.value(), 42.0);
    }

    #[test]
    fn overdamped_spring_approaches_without_overshoot() {
        let mut spring = Spring::new(0.0, SpringConfig::default());
        spring.set_target(960.0);

        let mut previous = 0.0;
        while !spring.is_settled() {
            spring.update(DT);
            assert!(spring.value() >= previous, "moved backwards");
            assert!(spring.value() <= 960.0, "overshot to {}", spring.value());
            previous = spring.value();
        }
        assert_eq!(spring.value(), 960.0);
        assert_eq!(spring.velocity(), 0.0);
    }

    #[test]
    fn settles_within_a_few_seconds() {
        let mut spring = Spring::new(0.0, SpringConfig::default());
        spring.set_target(1920.0);
        let frames = settle(&mut spring);
        assert!(frames < 180, "took {} frames", frames);
    }

    #[test]
    fn result_is_independent_of_frame_rate() {
        let mut coarse = Spring::new(0.0, SpringConfig::default());
        let mut fine = Spring::new(0.0, SpringConfig::default());
        coarse.set_target(500.0);
        fine.set_target(500.0);

        coarse.update(0.1);
        for _ in 0..10 {
            fine.update(0.01);
        }
        assert!((coarse.value() - fine.value()).abs() < 1e-2);
    }

    #[test]
    fn underdamped_and_critical_springs_converge() {
        for damping in [10.0, 2.0 * 300f32.sqrt()] {
            let config = SpringConfig { damping, ..SpringConfig::default() };
            let mut spring = Spring::new(0.0, config);
            spring.set_target(-300.0);
            settle(&mut spring);
            assert!(spring.is_settled(), "damping {} did not settle", damping);
            assert_eq!(spring.value(), -300.0);
        }
    }

    #[test]
    fn underdamped_spring_overshoots() {
        let config = SpringConfig { damping: 5.0, ..SpringConfig::default() };
        let mut spring = Spring::new(0.0, config);
        spring.set_target(100.0);
        let mut peak: f32 = 0.0;
        for _ in 0..120 {
            spring.update(DT);
            peak = peak.max(spring.value());
        }
        assert!(peak > 100.0);
    }

    #[test]
    fn retarget_keeps_velocity() {
        let mut spring = Spring::new(0.0, SpringConfig::default());
        spring.set_target(1000.0);
        for _ in 0..5 {
            spring.update(DT);
        }
        let velocity = spring.velocity();
        assert!(velocity > 0.0);
        spring.set_target(0.0);
        assert_eq!(spring.velocity(), velocity);
        assert!(!spring.is_settled());
    }

    proptest! {
        #[test]
        fn rapid_retargets_converge_to_last_target(
            moves in prop::collection::vec((-2000.0f32..2000.0, 0usize..20), 1..12)
        ) {
            let mut spring = Spring::new(0.0, SpringConfig::default());
            for (target, frames) in &moves {
                spring.set_target(*target);
                for _ in 0..*frames {
                    spring.update(DT);
                }
            }
            settle(&mut spring);
            let last = moves.last().map(|(target, _)| *target).unwrap();
            prop_assert!(spring.is_settled());
            prop_assert_eq!(spring.value(), last);
        }
    }
}

//! Spring driver for the settle animation
//!
//! Damped harmonic oscillator integrated in fixed sub-steps so the result
//! does not depend on the host's frame rate.

use std::time::Duration;

use crate::config::SpringConfig;

const MAX_SUBSTEP_SECS: f64 = 0.001;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringStep {
    pub value: f64,
    pub settled: bool,
}

#[derive(Clone, Debug)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    stiffness: f64,
    damping: f64,
    rest_displacement: f64,
    rest_speed: f64,
}

impl Spring {
    pub fn new(from: f64, velocity: f64, target: f64, config: &SpringConfig) -> Self {
        Self {
            position: from,
            velocity,
            target,
            stiffness: config.stiffness(),
            damping: config.damping(),
            rest_displacement: config.rest_displacement,
            rest_speed: config.rest_speed,
        }
    }

    fn at_rest(&self) -> bool {
        self.velocity.abs() <= self.rest_speed
            && (self.target - self.position).abs() <= self.rest_displacement
    }

    /// Advance by `dt`. Once at rest the position snaps to the target.
    pub fn step(&mut self, dt: Duration) -> SpringStep {
        let mut remaining = dt.as_secs_f64();
        while !self.at_rest() && remaining > 0.0 {
            let h = remaining.min(MAX_SUBSTEP_SECS);
            let accel = -self.stiffness * (self.position - self.target) - self.damping * self.velocity;
            self.velocity += accel * h;
            self.position += self.velocity * h;
            remaining -= h;
        }

        if self.at_rest() {
            self.position = self.target;
            self.velocity = 0.0;
            SpringStep {
                value: self.target,
                settled: true,
            }
        } else {
            SpringStep {
                value: self.position,
                settled: false,
            }
        }
    }
}

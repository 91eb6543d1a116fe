//! Damped spring used to smooth drag input into rotation

use serde::Deserialize;

/// Largest integration step; keeps the integrator stable at slow frame rates
const MAX_SUBSTEP: f32 = 1.0 / 120.0;
/// Bound on `damping * h / mass` and `h * sqrt(stiffness / mass)`
const STABLE_FRACTION: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpringParams {
    pub mass: f32,
    pub stiffness: f32,
    pub damping: f32,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            mass: 1.0,
            stiffness: 100.0,
            damping: 30.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Spring {
    params: SpringParams,
    max_substep: f32,
    value: f32,
    velocity: f32,
}

impl Spring {
    pub fn new(params: SpringParams) -> Self {
        let SpringParams { mass, stiffness, damping } = params;
        let by_damping = STABLE_FRACTION * mass / damping;
        let by_stiffness = STABLE_FRACTION * (mass / stiffness).sqrt();
        Self {
            params,
            max_substep: MAX_SUBSTEP.min(by_damping).min(by_stiffness),
            value: 0.0,
            velocity: 0.0,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Advance `dt` seconds toward `target`
    pub fn step(&mut self, target: f32, dt: f32) -> f32 {
        if dt <= 0.0 {
            return self.value;
        }
        let steps = (dt / self.max_substep).ceil().max(1.0) as u32;
        let h = dt / steps as f32;
        let SpringParams { mass, stiffness, damping } = self.params;
        for _ in 0..steps {
            let force = -stiffness * (self.value - target) - damping * self.velocity;
            self.velocity += force / mass * h;
            self.value += self.velocity * h;
        }
        self.value
    }
}

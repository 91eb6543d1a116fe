//! Globe rotation: idle auto-spin plus spring-smoothed pointer drags

use crate::beacon::ClockMode;
use crate::spring::{Spring, SpringParams};
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Interaction {
    Idle,
    /// Pointer held down; `origin_x` is where the drag started
    Dragging { origin_x: f32 },
}

#[derive(Clone, Debug)]
pub struct RotationState {
    phi: f32,
    theta: f32,
    spin_step: f32,
    drag_damping: f32,
    mode: ClockMode,
    interaction: Interaction,
    target: f32,
    spring: Spring,
}

impl RotationState {
    pub fn new(
        phi: f32,
        theta: f32,
        spin_step: f32,
        drag_damping: f32,
        mode: ClockMode,
        spring: SpringParams,
    ) -> Self {
        Self {
            phi: phi.rem_euclid(TAU),
            theta,
            spin_step,
            drag_damping,
            mode,
            interaction: Interaction::Idle,
            target: 0.0,
            spring: Spring::new(spring),
        }
    }

    pub fn theta(&self) -> f32 {
        self.theta
    }

    #[cfg(test)]
    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    /// Spring target the drag has accumulated so far
    #[cfg(test)]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// The phi that was last rendered, accumulator plus spring offset
    pub fn rendered_phi(&self) -> f32 {
        self.phi + self.spring.value()
    }

    pub fn pointer_down(&mut self, x: f32) {
        log::debug!("drag start at x={x}");
        self.interaction = Interaction::Dragging { origin_x: x };
    }

    /// Every move while dragging adds the displacement since the drag began
    pub fn pointer_move(&mut self, x: f32) {
        if let Interaction::Dragging { origin_x } = self.interaction {
            self.target += (x - origin_x) / self.drag_damping;
        }
    }

    pub fn pointer_up(&mut self) {
        self.release();
    }

    pub fn pointer_leave(&mut self) {
        self.release();
    }

    // The target is left alone, so the offset reached by the drag persists
    fn release(&mut self) {
        if self.interaction != Interaction::Idle {
            log::debug!("drag end, target={:.4}", self.target);
        }
        self.interaction = Interaction::Idle;
    }

    /// Advance one frame of `dt` seconds and return the phi to render with
    pub fn tick(&mut self, dt: f32) -> f32 {
        if self.interaction == Interaction::Idle {
            // Projection is periodic in phi, so wrapping keeps the step from vanishing
            self.phi = (self.phi + self.spin_step * self.mode.frames(dt)).rem_euclid(TAU);
        }
        self.spring.step(self.target, dt);
        self.rendered_phi()
    }
}

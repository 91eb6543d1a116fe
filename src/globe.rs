//! Globe host: a sphere layer, a beacon overlay and the loop that drives them
//!
//! Each frame the sphere asks the host for its rotation through the render
//! callback. The host ticks the rotation there and paints the overlay with the
//! very same phi, so the two layers never drift apart.

use crate::beacon::{BeaconClock, BeaconSet};
use crate::config::GlobeConfig;
use crate::controls::Controls;
use crate::error::GlobeResult;
use crate::render::BeaconRenderer;
use crate::rotation::RotationState;
use crate::sphere::{DotSphere, Sphere};
use crate::surface::{compose, DotCanvas};
use crate::terminal::Terminal;
use crossterm::event::{Event, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use std::time::Instant;

/// Pointer pixels per terminal column, so drag damping keeps its pixel meaning
pub const CELL_PIXELS: f32 = 8.0;

pub struct Globe<S: Sphere> {
    sphere: S,
    base: DotCanvas,
    overlay: DotCanvas,
    rotation: RotationState,
    clock: BeaconClock,
    beacons: BeaconSet,
    renderer: BeaconRenderer,
}

impl<S: Sphere> Globe<S> {
    pub fn new(config: &GlobeConfig) -> GlobeResult<Self> {
        let sphere = S::create(&config.sphere)?;
        let primary = config.beacons.primary().location;
        log::debug!(
            "globe with {} beacons, primary at ({}, {})",
            config.beacons.len(),
            primary.lat(),
            primary.lng()
        );
        Ok(Self {
            sphere,
            base: DotCanvas::new(config.background),
            overlay: DotCanvas::new(config.background),
            rotation: RotationState::new(
                config.sphere.phi,
                config.sphere.theta,
                config.spin_step,
                config.drag_damping,
                config.clock_mode,
                config.spring,
            ),
            clock: BeaconClock::new(config.clock_step, config.clock_mode),
            beacons: config.beacons.clone(),
            renderer: BeaconRenderer::new(config.ring_reference),
        })
    }

    /// Match both layers to a `cols` x `rows` terminal
    pub fn resize(&mut self, cols: u16, rows: u16) {
        log::debug!("globe resized to {cols}x{rows} cells");
        self.base.resize_cells(cols, rows);
        self.overlay.resize_cells(cols, rows);
    }

    #[cfg(test)]
    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    pub fn rotation_mut(&mut self) -> &mut RotationState {
        &mut self.rotation
    }

    #[cfg(test)]
    pub fn clock(&self) -> &BeaconClock {
        &self.clock
    }

    /// Render one frame of `dt` seconds and return the phi both layers used
    pub fn frame(&mut self, dt: f32) -> f32 {
        let Globe {
            sphere,
            base,
            overlay,
            rotation,
            clock,
            beacons,
            renderer,
        } = self;

        let mut rendered = rotation.rendered_phi();
        sphere.render(base, &mut |state| {
            let phi = rotation.tick(dt);
            state.phi = phi;
            state.theta = rotation.theta();
            renderer.draw_frame(&mut *overlay, &mut *clock, beacons, phi, state.theta, dt);
            rendered = phi;
        });
        rendered
    }

    /// Copy both layers into the terminal buffer
    pub fn compose(&self, term: &mut Terminal) {
        compose(&self.base, &self.overlay, term);
    }

    /// Map a terminal mouse event onto the drag state machine
    pub fn handle_mouse(&mut self, event: MouseEvent) {
        let x = event.column as f32 * CELL_PIXELS;
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => self.rotation.pointer_down(x),
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                self.rotation.pointer_move(x)
            }
            MouseEventKind::Up(MouseButton::Left) => self.rotation.pointer_up(),
            _ => {}
        }
    }
}

/// Run the interactive globe until the user quits
pub fn run(term: &mut Terminal, config: &GlobeConfig, time_step: f32) -> GlobeResult<()> {
    let mut globe: Globe<DotSphere> = Globe::new(config)?;
    let mut controls = Controls::new(time_step);
    let (width, height) = term.size();
    globe.resize(width, height);
    log::info!("interactive globe started at {width}x{height}");

    let mut last = Instant::now();
    loop {
        while let Some(event) = term.poll_event()? {
            match event {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if controls.handle_key(key.code, key.modifiers) {
                        log::info!("quit requested");
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => globe.handle_mouse(mouse),
                Event::FocusLost => globe.rotation_mut().pointer_leave(),
                Event::Resize(w, h) => {
                    term.resize(w, h);
                    term.clear_screen()?;
                    globe.resize(w, h);
                }
                _ => {}
            }
        }

        if controls.paused {
            term.sleep(0.1);
            last = Instant::now();
            continue;
        }

        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;

        globe.frame(dt);
        term.clear();
        globe.compose(term);
        controls.render_help(term);
        term.present()?;
        term.sleep(controls.speed);
    }
}

/// Render `frames` fixed steps off-screen and return the final buffer
pub fn render_frames(
    config: &GlobeConfig,
    cols: u16,
    rows: u16,
    frames: u32,
    time_step: f32,
) -> GlobeResult<Terminal> {
    let mut term = Terminal::headless(cols, rows);
    let mut globe: Globe<DotSphere> = Globe::new(config)?;
    globe.resize(cols, rows);
    let mut phi = 0.0;
    for _ in 0..frames.max(1) {
        phi = globe.frame(time_step);
    }
    log::debug!("rendered {frames} frames, final phi {phi:.4}");
    globe.compose(&mut term);
    Ok(term)
}

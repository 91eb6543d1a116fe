//! The base globe layer
//!
//! `Sphere` is the narrow seam between the host loop and whatever draws the
//! globe itself: create it from a config, hand it a canvas each frame along
//! with a callback that sets the frame's rotation, drop it to tear it down.
//! `DotSphere` is the braille implementation.

use crate::color::Rgb;
use crate::error::{GlobeError, GlobeResult};
use crate::geo::{GeoPoint, COASTLINES, NEW_YORK, SAN_FRANCISCO, TORONTO};
use crate::projection::{project_point, Viewport};
use crate::surface::{DotCanvas, Surface};

/// Samples per coastline segment
const COAST_STEPS: usize = 12;
/// Graticule spacing and sampling, degrees
const GRID_SPACING: usize = 30;
const GRID_SAMPLE: usize = 2;
const LIMB_SAMPLES: usize = 360;
const LAND: Rgb = Rgb::new(150, 150, 150);

/// Static dot rendered by the sphere, size relative to the globe radius
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub location: GeoPoint,
    pub size: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SphereConfig {
    pub phi: f32,
    pub theta: f32,
    pub base_color: Rgb,
    pub marker_color: Rgb,
    pub glow_color: Rgb,
    /// Light reaching the limb relative to the facing point, `[0, 1]`
    pub diffuse: f32,
    pub map_brightness: f32,
    pub markers: Vec<Marker>,
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            phi: 0.0,
            theta: 0.1,
            base_color: Rgb::from_unit([0.11, 0.11, 0.11]),
            marker_color: Rgb::from_unit([0.83, 0.64, 0.45]),
            glow_color: Rgb::from_unit([0.83, 0.64, 0.45]),
            diffuse: 0.4,
            map_brightness: 1.2,
            markers: vec![
                Marker { location: TORONTO, size: 0.08 },
                Marker { location: SAN_FRANCISCO, size: 0.025 },
                Marker { location: NEW_YORK, size: 0.025 },
            ],
        }
    }
}

/// Per-frame state the host may rewrite before the sphere draws
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereState {
    pub phi: f32,
    pub theta: f32,
    pub width: usize,
    pub height: usize,
}

pub trait Sphere: Sized {
    fn create(config: &SphereConfig) -> GlobeResult<Self>;

    /// Draw one frame onto `canvas`, calling `on_render` first so the host can
    /// set rotation for this frame.
    fn render(&mut self, canvas: &mut DotCanvas, on_render: &mut dyn FnMut(&mut SphereState));
}

pub struct DotSphere {
    config: SphereConfig,
    phi: f32,
}

impl Sphere for DotSphere {
    fn create(config: &SphereConfig) -> GlobeResult<Self> {
        if !(0.0..=1.0).contains(&config.diffuse) {
            return Err(GlobeError::InvalidValue { what: "sphere diffuse", value: config.diffuse });
        }
        if !(config.map_brightness.is_finite() && config.map_brightness >= 0.0) {
            return Err(GlobeError::InvalidValue {
                what: "sphere map_brightness",
                value: config.map_brightness,
            });
        }
        if let Some(m) = config.markers.iter().find(|m| !(m.size.is_finite() && m.size >= 0.0)) {
            return Err(GlobeError::InvalidValue { what: "marker size", value: m.size });
        }
        log::debug!("dot sphere created with {} markers", config.markers.len());
        Ok(Self {
            phi: config.phi,
            config: config.clone(),
        })
    }

    fn render(&mut self, canvas: &mut DotCanvas, on_render: &mut dyn FnMut(&mut SphereState)) {
        let mut state = SphereState {
            phi: self.phi,
            theta: self.config.theta,
            width: canvas.width(),
            height: canvas.height(),
        };
        on_render(&mut state);
        self.phi = state.phi;

        canvas.clear();
        if canvas.size().is_none() {
            return;
        }
        let view = Viewport::centered(state.width, state.height);
        self.draw_graticule(canvas, &state, view);
        self.draw_limb(canvas, view);
        self.draw_coastlines(canvas, &state, view);
        self.draw_markers(canvas, &state, view);
    }
}

impl DotSphere {
    /// Lambert-ish falloff from the facing point to the limb
    fn shade(&self, color: Rgb, depth: f32) -> Rgb {
        let d = self.config.diffuse;
        color.scale(d + (1.0 - d) * depth.clamp(0.0, 1.0))
    }

    fn plot_geo(&self, canvas: &mut DotCanvas, point: GeoPoint, state: &SphereState, view: Viewport, color: Rgb) {
        let p = project_point(point, state.phi, state.theta, view);
        if p.visible {
            canvas.plot(p.x, p.y, self.shade(color, p.depth));
        }
    }

    fn draw_graticule(&self, canvas: &mut DotCanvas, state: &SphereState, view: Viewport) {
        let grid = self.config.base_color.scale(2.5);
        for lat in (-60..=60).step_by(GRID_SPACING) {
            for lng in (-180..180).step_by(GRID_SAMPLE) {
                self.plot_geo(canvas, GeoPoint::new(lat as f32, lng as f32), state, view, grid);
            }
        }
        for lng in (-180..180).step_by(GRID_SPACING) {
            for lat in (-90..=90).step_by(GRID_SAMPLE) {
                self.plot_geo(canvas, GeoPoint::new(lat as f32, lng as f32), state, view, grid);
            }
        }
    }

    fn draw_limb(&self, canvas: &mut DotCanvas, view: Viewport) {
        let glow = self.config.glow_color.scale(0.5);
        for i in 0..LIMB_SAMPLES {
            let a = i as f32 / LIMB_SAMPLES as f32 * std::f32::consts::TAU;
            canvas.plot(view.cx + a.cos() * view.radius, view.cy + a.sin() * view.radius, glow);
        }
    }

    fn draw_coastlines(&self, canvas: &mut DotCanvas, state: &SphereState, view: Viewport) {
        let land = LAND.scale(self.config.map_brightness);
        for ring in COASTLINES {
            for pair in ring.windows(2) {
                let ((lat1, lng1), (lat2, lng2)) = (pair[0], pair[1]);
                for step in 0..COAST_STEPS {
                    let t = step as f32 / COAST_STEPS as f32;
                    let point = GeoPoint::new(lat1 + (lat2 - lat1) * t, lng1 + (lng2 - lng1) * t);
                    self.plot_geo(canvas, point, state, view, land);
                }
            }
        }
    }

    fn draw_markers(&self, canvas: &mut DotCanvas, state: &SphereState, view: Viewport) {
        for marker in &self.config.markers {
            let p = project_point(marker.location, state.phi, state.theta, view);
            if p.visible {
                let radius = (marker.size * view.radius).max(0.5);
                canvas.fill_circle(p.x, p.y, radius, self.config.marker_color, 1.0);
            }
        }
    }
}

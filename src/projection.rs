//! Geographic to screen projection shared by the sphere and the beacon overlay
//!
//! Latitude/longitude map onto a unit sphere with the longitude offset by 180
//! degrees, the sphere is spun by `phi` about the vertical axis and then tilted
//! by `theta` about the horizontal axis, and the result is projected
//! orthographically with a slight depth scale. Positive depth faces the viewer.

use crate::geo::GeoPoint;
use serde::Serialize;

/// Pseudo-perspective factor: `scale = 1 / (1 + depth * DEPTH_PERSPECTIVE)`
const DEPTH_PERSPECTIVE: f32 = 0.1;

/// A projected point in surface coordinates
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Projected {
    pub x: f32,
    pub y: f32,
    pub visible: bool,
    pub depth: f32,
}

/// Where the sphere sits on a surface
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub cx: f32,
    pub cy: f32,
    pub radius: f32,
}

impl Viewport {
    /// Fraction of the half-extent the sphere fills
    pub const FILL: f32 = 0.85;

    /// Centre the sphere on a `width` x `height` surface
    pub fn centered(width: usize, height: usize) -> Self {
        let (w, h) = (width as f32, height as f32);
        Self {
            cx: w / 2.0,
            cy: h / 2.0,
            radius: w.min(h) / 2.0 * Self::FILL,
        }
    }
}

/// Unit-sphere position of a location, in the sphere's texture convention
pub fn lat_lng_to_xyz(point: GeoPoint) -> [f32; 3] {
    let polar = (90.0 - point.lat()).to_radians();
    let azimuth = (point.lng() + 180.0).to_radians();
    [
        -polar.sin() * azimuth.cos(),
        polar.cos(),
        polar.sin() * azimuth.sin(),
    ]
}

/// Rotate by `phi` (vertical axis) then `theta` (horizontal axis) and project.
pub fn project(xyz: [f32; 3], phi: f32, theta: f32, view: Viewport) -> Projected {
    let [x, y, z] = xyz;

    let (sin_p, cos_p) = phi.sin_cos();
    let x1 = x * cos_p - z * sin_p;
    let z1 = x * sin_p + z * cos_p;

    let (sin_t, cos_t) = theta.sin_cos();
    let y1 = y * cos_t - z1 * sin_t;
    let z2 = y * sin_t + z1 * cos_t;

    let scale = 1.0 / (1.0 + z2 * DEPTH_PERSPECTIVE);

    Projected {
        x: view.cx + x1 * view.radius * scale,
        y: view.cy - y1 * view.radius * scale,
        visible: z2 > 0.0,
        depth: z2,
    }
}

/// Convenience wrapper: location straight to screen
pub fn project_point(point: GeoPoint, phi: f32, theta: f32, view: Viewport) -> Projected {
    project(lat_lng_to_xyz(point), phi, theta, view)
}

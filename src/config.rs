use crate::beacon::{BeaconSet, ClockMode};
use crate::color::Rgb;
use crate::error::{GlobeError, GlobeResult};
use crate::sphere::SphereConfig;
use crate::spring::SpringParams;

/// Everything one globe instance needs, already validated
#[derive(Clone, Debug)]
pub struct GlobeConfig {
    pub sphere: SphereConfig,
    pub beacons: BeaconSet,
    /// Auto-spin per frame while idle, radians
    pub spin_step: f32,
    /// Pointer pixels per radian of spring target
    pub drag_damping: f32,
    /// Beacon clock increment per frame
    pub clock_step: f32,
    pub clock_mode: ClockMode,
    /// Globe radius (dots) at which beacon radii are drawn unscaled
    pub ring_reference: f32,
    pub spring: SpringParams,
    /// Colour faded beacon rings blend toward
    pub background: Rgb,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            sphere: SphereConfig::default(),
            beacons: BeaconSet::default(),
            spin_step: 0.002,
            drag_damping: 1400.0,
            clock_step: 0.015,
            clock_mode: ClockMode::Fixed,
            ring_reference: 40.0,
            spring: SpringParams::default(),
            background: Rgb::BLACK,
        }
    }
}

impl GlobeConfig {
    /// Starting rotation must be finite; a NaN tilt hides every point
    pub fn check_view(&self) -> GlobeResult<()> {
        for (what, value) in [("globe phi", self.sphere.phi), ("globe theta", self.sphere.theta)] {
            if !value.is_finite() {
                return Err(GlobeError::InvalidValue { what, value });
            }
        }
        Ok(())
    }
}

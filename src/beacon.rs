//! Pulsing beacons: configuration, the pulse clock and per-phase ring math

use crate::color::Rgb;
use crate::error::{GlobeError, GlobeResult};
use crate::geo::{GeoPoint, TORONTO};

/// Phase stagger between consecutive beacons
pub const PHASE_STAGGER: f32 = 0.3;
/// The primary beacon's second wave trails the first by half a cycle
pub const SECOND_WAVE_OFFSET: f32 = 0.5;
pub const SECOND_WAVE_RADIUS: f32 = 0.7;
/// Centre dot shows only during the first part of each cycle
pub const CENTER_DOT_WINDOW: f32 = 0.3;
pub const CENTER_DOT_OPACITY: f32 = 0.9;

const PRIMARY_OPACITY: f32 = 0.8;
const SECONDARY_OPACITY: f32 = 0.5;

/// Frame reference used to convert elapsed time into "frames" in delta mode
const REFERENCE_FPS: f32 = 60.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Beacon {
    pub location: GeoPoint,
    pub color: Rgb,
    pub max_radius: f32,
    /// Pulse cycle length in clock units
    pub speed: f32,
    pub primary: bool,
}

pub fn base_opacity(primary: bool) -> f32 {
    if primary { PRIMARY_OPACITY } else { SECONDARY_OPACITY }
}

/// A beacon list that carries exactly one primary beacon
#[derive(Clone, Debug, PartialEq)]
pub struct BeaconSet {
    beacons: Vec<Beacon>,
    primary: usize,
}

impl BeaconSet {
    pub fn new(beacons: Vec<Beacon>) -> GlobeResult<Self> {
        for (index, b) in beacons.iter().enumerate() {
            if !(b.speed.is_finite() && b.speed > 0.0) {
                return Err(GlobeError::InvalidSpeed { index, speed: b.speed });
            }
            if !(b.max_radius.is_finite() && b.max_radius >= 0.0) {
                return Err(GlobeError::InvalidValue { what: "beacon max_radius", value: b.max_radius });
            }
        }
        let primaries: Vec<usize> = beacons
            .iter()
            .enumerate()
            .filter(|(_, b)| b.primary)
            .map(|(i, _)| i)
            .collect();
        match primaries[..] {
            [primary] => Ok(Self { beacons, primary }),
            _ => Err(GlobeError::PrimaryCount(primaries.len())),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Beacon> {
        self.beacons.iter()
    }

    pub fn len(&self) -> usize {
        self.beacons.len()
    }

    pub fn primary(&self) -> &Beacon {
        &self.beacons[self.primary]
    }
}

impl Default for BeaconSet {
    /// The single gold Toronto beacon
    fn default() -> Self {
        Self {
            beacons: vec![Beacon {
                location: TORONTO,
                color: Rgb::new(0xD4, 0xA3, 0x73),
                max_radius: 6.0,
                speed: 2.0,
                primary: true,
            }],
            primary: 0,
        }
    }
}

/// How per-frame increments are applied
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ClockMode {
    /// Fixed step every frame; animation speed follows the frame rate
    #[default]
    Fixed,
    /// Step scaled by elapsed time against a 60 Hz reference
    Delta,
}

impl ClockMode {
    /// Number of reference frames a tick of `dt` seconds stands for
    pub fn frames(self, dt: f32) -> f32 {
        match self {
            ClockMode::Fixed => 1.0,
            ClockMode::Delta => dt.max(0.0) * REFERENCE_FPS,
        }
    }
}

/// Monotonic pulse clock, owned by one globe
#[derive(Clone, Debug)]
pub struct BeaconClock {
    elapsed: f64,
    step: f32,
    mode: ClockMode,
}

impl BeaconClock {
    pub fn new(step: f32, mode: ClockMode) -> Self {
        Self { elapsed: 0.0, step, mode }
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += f64::from(self.step * self.mode.frames(dt));
    }
}

/// Progress through one pulse cycle, always in `[0, 1)`
pub fn pulse_phase(clock: f64, speed: f32, offset: f32) -> f32 {
    let p = (clock / f64::from(speed) + f64::from(offset)).rem_euclid(1.0) as f32;
    // Values just under 1.0 can round up when narrowed
    if p >= 1.0 { 0.0 } else { p }
}

/// Geometry of one ring at a given phase
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pulse {
    pub radius: f32,
    pub opacity: f32,
}

/// Near beacons draw larger; depth 1 gives full size, the limb 70%
pub fn depth_scale(depth: f32) -> f32 {
    0.7 + depth * 0.3
}

/// Linear expansion with a fade that hits zero as the ring reaches full size
pub fn pulse(max_radius: f32, depth_scale: f32, size_scale: f32, phase: f32, base_opacity: f32) -> Pulse {
    Pulse {
        radius: max_radius * depth_scale * size_scale * phase,
        opacity: (1.0 - phase) * base_opacity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn beacon(primary: bool) -> Beacon {
        Beacon {
            location: TORONTO,
            color: Rgb::new(255, 255, 255),
            max_radius: 6.0,
            speed: 2.0,
            primary,
        }
    }

    #[test]
    fn default_set_has_one_primary() {
        let set = BeaconSet::default();
        assert_eq!(set.len(), 1);
        assert!(set.primary().primary);
        assert_eq!(set.primary().location, TORONTO);
    }

    #[test]
    fn rejects_zero_primaries() {
        let err = BeaconSet::new(vec![beacon(false), beacon(false)]).unwrap_err();
        assert!(matches!(err, GlobeError::PrimaryCount(0)));
    }

    #[test]
    fn rejects_multiple_primaries() {
        let err = BeaconSet::new(vec![beacon(true), beacon(false), beacon(true)]).unwrap_err();
        assert!(matches!(err, GlobeError::PrimaryCount(2)));
    }

    #[test]
    fn rejects_empty_set() {
        assert!(matches!(BeaconSet::new(vec![]), Err(GlobeError::PrimaryCount(0))));
    }

    #[test]
    fn rejects_bad_speed() {
        let mut b = beacon(true);
        b.speed = 0.0;
        assert!(matches!(
            BeaconSet::new(vec![b]),
            Err(GlobeError::InvalidSpeed { index: 0, .. })
        ));
    }

    #[test]
    fn primary_is_found_anywhere() {
        let set = BeaconSet::new(vec![beacon(false), beacon(true)]).unwrap();
        assert!(set.primary().primary);
        assert_eq!(set.iter().count(), 2);
    }

    #[test]
    fn fixed_clock_ignores_frame_time() {
        let mut clock = BeaconClock::new(0.015, ClockMode::Fixed);
        clock.advance(0.5);
        clock.advance(0.001);
        assert!((clock.elapsed() - 0.03).abs() < 1e-6);
    }

    #[test]
    fn delta_clock_scales_with_frame_time() {
        let mut clock = BeaconClock::new(0.015, ClockMode::Delta);
        // One second at any frame rate advances 60 reference frames
        clock.advance(0.5);
        clock.advance(0.5);
        assert!((clock.elapsed() - 0.9).abs() < 1e-5);
    }

    #[test]
    fn clock_keeps_advancing_after_days_of_frames() {
        let mut clock = BeaconClock::new(0.015, ClockMode::Fixed);
        clock.elapsed = 262_144.0;
        let phase = pulse_phase(clock.elapsed(), 2.0, 0.0);
        for _ in 0..100 {
            clock.advance(0.03);
        }
        assert!((clock.elapsed() - 262_145.5).abs() < 1e-6);
        let later = pulse_phase(clock.elapsed(), 2.0, 0.0);
        assert!((later - phase - 0.75).abs() < 1e-4);
    }

    #[test]
    fn phase_wraps() {
        assert_eq!(pulse_phase(0.0, 2.0, 0.0), 0.0);
        assert!((pulse_phase(1.0, 2.0, 0.0) - 0.5).abs() < 1e-6);
        assert!(pulse_phase(2.0, 2.0, 0.0).abs() < 1e-6);
        assert!((pulse_phase(1.0, 2.0, 0.6) - 0.1).abs() < 1e-5);
    }

    #[test]
    fn toronto_pulse_scenario() {
        let b = BeaconSet::default().primary().clone();
        let ds = 0.9;
        let ss = 1.5;

        let p0 = pulse_phase(0.0, b.speed, 0.0);
        let start = pulse(b.max_radius, ds, ss, p0, base_opacity(b.primary));
        assert_eq!(start.radius, 0.0);
        assert!((start.opacity - 0.8).abs() < 1e-6);

        let p1 = pulse_phase(1.0, b.speed, 0.0);
        assert!((p1 - 0.5).abs() < 1e-6);
        let half = pulse(b.max_radius, ds, ss, p1, base_opacity(b.primary));
        assert!((half.radius - 3.0 * ds * ss).abs() < 1e-5);
        assert!((half.opacity - 0.4).abs() < 1e-6);
    }

    #[test]
    fn depth_scale_range() {
        assert!((depth_scale(1.0) - 1.0).abs() < 1e-6);
        assert!((depth_scale(0.0) - 0.7).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn phase_stays_in_unit_interval(
            clock in 0.0f64..1.0e9,
            speed in 0.01f32..100.0,
            index in 0usize..16,
        ) {
            let p = pulse_phase(clock, speed, index as f32 * PHASE_STAGGER);
            prop_assert!((0.0..1.0).contains(&p));
        }

        #[test]
        fn opacity_decreases_with_phase(a in 0.0f32..1.0, b in 0.0f32..1.0, primary: bool) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let base = base_opacity(primary);
            let early = pulse(6.0, 1.0, 1.0, lo, base);
            let late = pulse(6.0, 1.0, 1.0, hi, base);
            prop_assert!(early.opacity >= late.opacity);
            prop_assert!(early.radius <= late.radius);
            prop_assert!(late.opacity <= base);
        }
    }
}

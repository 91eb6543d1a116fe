//! Beacon overlay renderer
//!
//! Immediate mode: every frame clears the whole overlay and repaints each
//! visible beacon from scratch. The overlay sits above the sphere layer and is
//! projected with the same rotation, so rings stay pinned to their locations.

use crate::beacon::{
    base_opacity, depth_scale, pulse, pulse_phase, BeaconClock, BeaconSet, CENTER_DOT_OPACITY,
    CENTER_DOT_WINDOW, PHASE_STAGGER, SECOND_WAVE_OFFSET, SECOND_WAVE_RADIUS,
};
use crate::color::Rgb;
use crate::geo::GeoPoint;
use crate::projection::{project_point, Viewport};
use crate::surface::Surface;

/// Centre dot radius, in dots, before depth scaling
pub const CENTER_DOT_RADIUS: f32 = 1.5;

const PRIMARY_STROKE: f32 = 2.0;
const SECONDARY_STROKE: f32 = 1.5;

#[derive(Clone, Debug)]
pub struct BeaconRenderer {
    /// Globe radius at which `max_radius` is drawn unscaled
    ring_reference: f32,
}

/// One ring to paint; `primary` selects the richer treatment
struct Ring {
    location: GeoPoint,
    color: Rgb,
    max_radius: f32,
    phase: f32,
    primary: bool,
}

impl BeaconRenderer {
    pub fn new(ring_reference: f32) -> Self {
        Self { ring_reference }
    }

    /// Paint one frame. Returns `false` when the surface is not sized yet, in
    /// which case nothing happens and the clock does not move.
    pub fn draw_frame(
        &self,
        surface: &mut dyn Surface,
        clock: &mut BeaconClock,
        beacons: &BeaconSet,
        phi: f32,
        theta: f32,
        dt: f32,
    ) -> bool {
        let Some((width, height)) = surface.size() else {
            log::trace!("beacon overlay not sized, skipping frame");
            return false;
        };
        let view = Viewport::centered(width, height);

        surface.clear();
        clock.advance(dt);
        let t = clock.elapsed();

        for (index, beacon) in beacons.iter().enumerate() {
            let offset = index as f32 * PHASE_STAGGER;
            self.draw_ring(
                surface,
                Ring {
                    location: beacon.location,
                    color: beacon.color,
                    max_radius: beacon.max_radius,
                    phase: pulse_phase(t, beacon.speed, offset),
                    primary: beacon.primary,
                },
                phi,
                theta,
                view,
            );

            if beacon.primary {
                self.draw_ring(
                    surface,
                    Ring {
                        location: beacon.location,
                        color: beacon.color,
                        max_radius: beacon.max_radius * SECOND_WAVE_RADIUS,
                        phase: pulse_phase(t, beacon.speed, offset + SECOND_WAVE_OFFSET),
                        primary: false,
                    },
                    phi,
                    theta,
                    view,
                );
            }
        }
        true
    }

    fn draw_ring(&self, surface: &mut dyn Surface, ring: Ring, phi: f32, theta: f32, view: Viewport) {
        let p = project_point(ring.location, phi, theta, view);
        if !p.visible {
            return;
        }

        let ds = depth_scale(p.depth);
        let size_scale = view.radius / self.ring_reference;
        let base = base_opacity(ring.primary);
        let shape = pulse(ring.max_radius, ds, size_scale, ring.phase, base);
        let stroke = if ring.primary { PRIMARY_STROKE } else { SECONDARY_STROKE };

        surface.stroke_circle(p.x, p.y, shape.radius, stroke, ring.color, shape.opacity);

        if ring.primary && ring.phase < CENTER_DOT_WINDOW {
            surface.fill_circle(p.x, p.y, CENTER_DOT_RADIUS * ds, ring.color, CENTER_DOT_OPACITY);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beacon::{Beacon, ClockMode};
    use crate::geo::TORONTO;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Clear,
        Stroke { x: f32, y: f32, radius: f32, width: f32, alpha: f32 },
        Fill { radius: f32, alpha: f32 },
    }

    /// Records draw calls instead of rasterising
    struct Recorder {
        size: Option<(usize, usize)>,
        ops: Vec<Op>,
    }

    impl Recorder {
        fn sized(w: usize, h: usize) -> Self {
            Self { size: Some((w, h)), ops: Vec::new() }
        }

        fn strokes(&self) -> Vec<&Op> {
            self.ops.iter().filter(|o| matches!(o, Op::Stroke { .. })).collect()
        }

        fn fills(&self) -> usize {
            self.ops.iter().filter(|o| matches!(o, Op::Fill { .. })).count()
        }
    }

    impl Surface for Recorder {
        fn size(&self) -> Option<(usize, usize)> {
            self.size
        }
        fn clear(&mut self) {
            self.ops.push(Op::Clear);
        }
        fn stroke_circle(&mut self, x: f32, y: f32, radius: f32, width: f32, _c: Rgb, alpha: f32) {
            self.ops.push(Op::Stroke { x, y, radius, width, alpha });
        }
        fn fill_circle(&mut self, _x: f32, _y: f32, radius: f32, _c: Rgb, alpha: f32) {
            self.ops.push(Op::Fill { radius, alpha });
        }
    }

    fn renderer() -> BeaconRenderer {
        BeaconRenderer::new(40.0)
    }

    /// Clock whose single per-frame step lands it on `value`
    fn clock_reading(value: f32) -> BeaconClock {
        BeaconClock::new(value, ClockMode::Fixed)
    }

    #[test]
    fn unsized_surface_is_a_noop() {
        let mut s = Recorder { size: None, ops: Vec::new() };
        let mut clock = BeaconClock::new(0.015, ClockMode::Fixed);
        let drawn = renderer().draw_frame(&mut s, &mut clock, &BeaconSet::default(), 0.0, 0.1, 0.03);
        assert!(!drawn);
        assert!(s.ops.is_empty());
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn frame_starts_with_clear_and_advances_clock() {
        let mut s = Recorder::sized(200, 200);
        let mut clock = BeaconClock::new(0.015, ClockMode::Fixed);
        assert!(renderer().draw_frame(&mut s, &mut clock, &BeaconSet::default(), 0.0, 0.1, 0.03));
        assert_eq!(s.ops[0], Op::Clear);
        assert!((clock.elapsed() - 0.015).abs() < 1e-7);
    }

    #[test]
    fn toronto_ring_at_half_cycle() {
        // One frame with step 1.0 puts the clock at 1.0: phase 0.5 for speed 2
        let mut s = Recorder::sized(200, 200);
        let mut clock = clock_reading(1.0);
        renderer().draw_frame(&mut s, &mut clock, &BeaconSet::default(), 0.0, 0.1, 0.0);

        let view = Viewport::centered(200, 200);
        let p = project_point(TORONTO, 0.0, 0.1, view);
        assert!(p.visible);
        let ds = 0.7 + p.depth * 0.3;
        let ss = view.radius / 40.0;

        let strokes = s.strokes();
        assert_eq!(strokes.len(), 2);
        match strokes[0] {
            Op::Stroke { x, y, radius, width, alpha } => {
                assert!((x - p.x).abs() < 1e-4 && (y - p.y).abs() < 1e-4);
                assert!((radius - 3.0 * ds * ss).abs() < 1e-4);
                assert!((alpha - 0.4).abs() < 1e-5);
                assert_eq!(*width, 2.0);
            }
            other => panic!("unexpected op {other:?}"),
        }
        // Second wave: phase wraps to 0, so zero radius at full secondary opacity
        match strokes[1] {
            Op::Stroke { radius, width, alpha, .. } => {
                assert!(radius.abs() < 1e-5);
                assert!((alpha - 0.5).abs() < 1e-5);
                assert_eq!(*width, 1.5);
            }
            other => panic!("unexpected op {other:?}"),
        }
        // Phase 0.5 is past the centre dot window
        assert_eq!(s.fills(), 0);
    }

    #[test]
    fn centre_dot_shows_early_in_cycle() {
        let mut s = Recorder::sized(200, 200);
        let mut clock = BeaconClock::new(0.015, ClockMode::Fixed);
        renderer().draw_frame(&mut s, &mut clock, &BeaconSet::default(), 0.0, 0.1, 0.0);
        assert_eq!(s.fills(), 1);
        assert!(s.ops.iter().any(|o| matches!(o, Op::Fill { alpha, .. } if (*alpha - 0.9).abs() < 1e-6)));
    }

    #[test]
    fn hidden_beacon_draws_nothing_but_still_clears() {
        let mut s = Recorder::sized(200, 200);
        let mut clock = BeaconClock::new(0.015, ClockMode::Fixed);
        // Half a turn puts Toronto on the far side
        renderer().draw_frame(&mut s, &mut clock, &BeaconSet::default(), std::f32::consts::PI, 0.1, 0.0);
        assert_eq!(s.ops, vec![Op::Clear]);
        assert!(clock.elapsed() > 0.0);
    }

    #[test]
    fn secondary_beacons_are_staggered_and_single_ring() {
        let gold = Rgb::new(212, 163, 115);
        let set = BeaconSet::new(vec![
            Beacon { location: TORONTO, color: gold, max_radius: 6.0, speed: 2.0, primary: true },
            Beacon {
                location: GeoPoint::new(40.71, -74.0),
                color: gold,
                max_radius: 4.0,
                speed: 2.0,
                primary: false,
            },
        ])
        .unwrap();
        let mut s = Recorder::sized(200, 200);
        let mut clock = clock_reading(1.0);
        renderer().draw_frame(&mut s, &mut clock, &set, 0.0, 0.1, 0.0);

        let strokes = s.strokes();
        assert_eq!(strokes.len(), 3);
        // Second beacon: phase 0.5 + 0.3 = 0.8, secondary opacity 0.5
        match strokes[2] {
            Op::Stroke { alpha, width, .. } => {
                assert!((alpha - 0.2 * 0.5).abs() < 1e-5);
                assert_eq!(*width, 1.5);
            }
            other => panic!("unexpected op {other:?}"),
        }
    }
}

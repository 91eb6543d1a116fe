//! Geographic points and the static outline data drawn by the dot sphere

use crate::error::{GlobeError, GlobeResult};
use serde::Deserialize;

/// A fixed location in degrees
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "[f32; 2]")]
pub struct GeoPoint {
    lat: f32,
    lng: f32,
}

impl GeoPoint {
    /// Unchecked constructor for compile-time locations
    pub const fn new(lat: f32, lng: f32) -> Self {
        Self { lat, lng }
    }

    pub fn checked(lat: f32, lng: f32) -> GlobeResult<Self> {
        if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng) {
            Ok(Self { lat, lng })
        } else {
            Err(GlobeError::InvalidLocation { lat, lng })
        }
    }

    pub fn lat(&self) -> f32 {
        self.lat
    }

    pub fn lng(&self) -> f32 {
        self.lng
    }
}

impl TryFrom<[f32; 2]> for GeoPoint {
    type Error = GlobeError;

    fn try_from([lat, lng]: [f32; 2]) -> Result<Self, Self::Error> {
        GeoPoint::checked(lat, lng)
    }
}

pub const TORONTO: GeoPoint = GeoPoint::new(43.65, -79.38);
pub const SAN_FRANCISCO: GeoPoint = GeoPoint::new(37.77, -122.41);
pub const NEW_YORK: GeoPoint = GeoPoint::new(40.71, -74.00);

/// Coarse coastline rings, (lat, lng) in degrees. Each ring is closed.
pub const COASTLINES: &[&[(f32, f32)]] = &[
    // North America
    &[
        (69.5, -90.5), (67.1, -81.4), (58.9, -94.7), (51.2, -79.9), (62.6, -77.4),
        (58.2, -67.6), (60.3, -64.6), (53.3, -55.8), (46.8, -71.1), (49.2, -65.1),
        (45.9, -59.8), (39.2, -76.3), (31.4, -81.3), (25.2, -80.4), (30.1, -84.1),
        (27.8, -97.1), (18.8, -95.9), (21.5, -87.1), (15.9, -88.9), (15.3, -83.4),
        (9.0, -82.2), (11.1, -74.9), (7.2, -80.9), (19.3, -105.0), (31.2, -113.1),
        (23.4, -109.4), (24.7, -112.2), (40.3, -124.4), (49.0, -122.8), (58.1, -134.1),
        (61.3, -150.6), (54.4, -164.8), (58.9, -157.0), (61.5, -166.1), (64.8, -160.8),
        (65.7, -168.1), (71.4, -156.6), (67.4, -108.9), (67.3, -96.1), (71.9, -95.2),
        (69.5, -90.5),
    ],
    // South America
    &[
        (11.1, -74.9), (10.7, -61.9), (4.2, -51.3), (-0.1, -50.4), (-7.3, -34.7),
        (-21.9, -40.9), (-24.9, -47.6), (-34.4, -53.8), (-33.9, -58.4), (-36.9, -56.8),
        (-41.1, -65.1), (-48.1, -66.0), (-53.8, -71.0), (-52.3, -74.9), (-46.6, -75.6),
        (-42.4, -72.7), (-18.3, -70.4), (-14.6, -76.0), (-4.7, -81.4), (3.8, -77.1),
        (9.0, -79.1), (11.1, -74.9),
    ],
    // Europe
    &[
        (36.0, -5.9), (36.9, -8.9), (43.0, -9.4), (43.4, -1.9), (48.7, -4.6),
        (53.5, 8.1), (57.1, 8.5), (54.0, 10.9), (54.4, 19.7), (59.2, 23.3),
        (60.0, 29.1), (60.7, 21.3), (65.1, 25.4), (65.7, 22.2), (55.4, 12.9),
        (59.5, 10.4), (58.6, 5.7), (62.6, 5.9), (69.8, 19.2), (70.5, 31.3),
        (69.3, 33.8), (47.3, 39.1), (41.1, 28.8), (40.3, 22.6), (36.4, 23.2),
        (45.6, 13.9), (37.9, 15.7), (44.4, 8.9), (36.0, -5.9),
    ],
    // Africa
    &[
        (29.9, 32.4), (11.7, 42.7), (10.6, 51.0), (-4.7, 39.2), (-14.7, 40.8),
        (-19.8, 34.8), (-24.1, 35.5), (-32.8, 28.2), (-34.8, 19.6), (-18.1, 11.8),
        (-10.7, 13.7), (3.7, 9.4), (6.3, 4.3), (4.4, -8.0), (14.7, -17.6),
        (35.8, -5.9), (37.1, 10.2), (31.2, 29.7), (29.9, 32.4),
    ],
    // Asia
    &[
        (77.0, 107.0), (70.8, 131.3), (69.4, 178.6), (62.3, 179.2), (59.9, 163.5),
        (51.0, 156.8), (56.8, 155.9), (62.6, 164.5), (54.7, 135.1), (52.2, 141.4),
        (39.8, 127.5), (35.1, 129.1), (40.9, 121.6), (39.2, 118.0), (37.5, 122.4),
        (34.9, 119.2), (28.2, 121.7), (19.8, 105.9), (13.4, 109.3), (8.6, 105.2),
        (13.4, 100.1), (1.3, 104.2), (22.8, 91.4), (15.9, 80.3), (8.0, 77.5),
        (21.4, 72.6), (30.3, 48.9), (24.0, 51.8), (26.4, 56.4), (22.3, 59.8),
        (12.6, 43.5), (21.3, 39.1), (69.3, 33.8), (68.1, 68.5), (73.0, 69.9),
        (72.8, 74.7), (77.0, 107.0),
    ],
    // Australia
    &[
        (-13.8, 143.6), (-26.1, 153.1), (-37.4, 150.0), (-38.0, 140.6), (-34.4, 138.2),
        (-31.5, 131.3), (-34.2, 115.0), (-21.8, 114.1), (-19.7, 120.9), (-14.2, 125.7),
        (-11.1, 132.4), (-11.9, 136.5), (-17.7, 140.2), (-11.0, 142.1), (-13.8, 143.6),
    ],
    // Greenland
    &[
        (83.5, -27.1), (81.3, -12.2), (76.6, -21.7), (70.1, -22.3), (65.5, -39.8),
        (60.1, -43.4), (63.6, -51.6), (69.9, -50.9), (75.5, -58.6), (78.0, -73.3),
        (81.8, -62.7), (83.5, -27.1),
    ],
    // Japan
    &[
        (37.1, 141.0), (33.5, 135.8), (33.9, 131.0), (31.4, 130.2), (33.3, 129.4),
        (38.2, 139.4), (41.2, 140.3), (37.1, 141.0),
    ],
    // Great Britain
    &[
        (58.6, -3.0), (51.3, 1.4), (50.0, -5.2), (54.0, -2.9), (56.8, -6.1), (58.6, -3.0),
    ],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_accepts_bounds() {
        assert!(GeoPoint::checked(90.0, 180.0).is_ok());
        assert!(GeoPoint::checked(-90.0, -180.0).is_ok());
    }

    #[test]
    fn checked_rejects_out_of_range() {
        assert!(matches!(
            GeoPoint::checked(91.0, 0.0),
            Err(GlobeError::InvalidLocation { .. })
        ));
        assert!(GeoPoint::checked(0.0, -180.5).is_err());
        assert!(GeoPoint::checked(f32::NAN, 0.0).is_err());
    }

    #[test]
    fn coastline_rings_are_closed_and_valid() {
        for ring in COASTLINES {
            assert!(ring.len() >= 3);
            assert_eq!(ring.first(), ring.last());
            for &(lat, lng) in ring.iter() {
                assert!(GeoPoint::checked(lat, lng).is_ok(), "bad vertex ({lat}, {lng})");
            }
        }
    }

    #[test]
    fn deserializes_pair() {
        #[derive(Deserialize)]
        struct Wrap {
            location: GeoPoint,
        }
        let w: Wrap = toml::from_str("location = [43.65, -79.38]").unwrap();
        assert_eq!(w.location, TORONTO);
        assert!(toml::from_str::<Wrap>("location = [100.0, 0.0]").is_err());
    }
}

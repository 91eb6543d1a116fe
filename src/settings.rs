use crate::beacon::{Beacon, BeaconSet, ClockMode};
use crate::color::Rgb;
use crate::config::GlobeConfig;
use crate::error::{GlobeError, GlobeResult};
use crate::geo::GeoPoint;
use crate::sphere::{Marker, SphereConfig};
use crate::spring::SpringParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub globe: GlobeSettings,
    pub spring: SpringParams,
    pub sphere: SphereSettings,
    pub markers: Option<Vec<MarkerSettings>>,
    pub beacons: Option<Vec<BeaconSettings>>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GlobeSettings {
    pub phi: f32,
    pub theta: f32,
    pub spin_step: f32,
    pub drag_damping: f32,
    pub clock_step: f32,
    pub clock_mode: ClockMode,
    pub ring_reference: f32,
    pub background: Option<Rgb>,
}

impl Default for GlobeSettings {
    fn default() -> Self {
        let d = GlobeConfig::default();
        Self {
            phi: d.sphere.phi,
            theta: d.sphere.theta,
            spin_step: d.spin_step,
            drag_damping: d.drag_damping,
            clock_step: d.clock_step,
            clock_mode: d.clock_mode,
            ring_reference: d.ring_reference,
            background: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SphereSettings {
    pub base_color: [f32; 3],
    pub marker_color: [f32; 3],
    pub glow_color: [f32; 3],
    pub diffuse: f32,
    pub map_brightness: f32,
}

impl Default for SphereSettings {
    fn default() -> Self {
        Self {
            base_color: [0.11, 0.11, 0.11],
            marker_color: [0.83, 0.64, 0.45],
            glow_color: [0.83, 0.64, 0.45],
            diffuse: 0.4,
            map_brightness: 1.2,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MarkerSettings {
    pub location: GeoPoint,
    pub size: f32,
}

#[derive(Debug, Deserialize)]
pub struct BeaconSettings {
    pub location: GeoPoint,
    pub color: Rgb,
    #[serde(default = "default_max_radius")]
    pub max_radius: f32,
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default)]
    pub primary: bool,
}

fn default_max_radius() -> f32 {
    6.0
}

fn default_speed() -> f32 {
    2.0
}

impl Settings {
    /// Load from `path`, or from the default location when `None`.
    /// A missing default file means defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> GlobeResult<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::config_path(), false),
        };
        if !path.exists() {
            if explicit {
                return Err(GlobeError::ConfigNotFound(path));
            }
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| GlobeError::ReadConfig {
            path: path.clone(),
            source,
        })?;
        log::info!("loaded config from {}", path.display());
        Self::parse(&content, &path)
    }

    pub fn parse(content: &str, path: &Path) -> GlobeResult<Self> {
        toml::from_str(content).map_err(|source| GlobeError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pulseglobe")
            .join("config.toml")
    }

    /// Validate and turn into a globe configuration
    pub fn into_config(self) -> GlobeResult<GlobeConfig> {
        let g = self.globe;
        non_negative("globe spin_step", g.spin_step.abs())?;
        positive("globe drag_damping", g.drag_damping)?;
        non_negative("globe clock_step", g.clock_step)?;
        positive("globe ring_reference", g.ring_reference)?;
        positive("spring mass", self.spring.mass)?;
        non_negative("spring stiffness", self.spring.stiffness)?;
        non_negative("spring damping", self.spring.damping)?;

        let defaults = GlobeConfig::default();
        let markers = match self.markers {
            Some(list) => list
                .into_iter()
                .map(|m| Marker { location: m.location, size: m.size })
                .collect(),
            None => defaults.sphere.markers,
        };
        let beacons = match self.beacons {
            Some(list) => BeaconSet::new(
                list.into_iter()
                    .map(|b| Beacon {
                        location: b.location,
                        color: b.color,
                        max_radius: b.max_radius,
                        speed: b.speed,
                        primary: b.primary,
                    })
                    .collect(),
            )?,
            None => defaults.beacons,
        };

        let s = self.sphere;
        let config = GlobeConfig {
            sphere: SphereConfig {
                phi: g.phi,
                theta: g.theta,
                base_color: Rgb::from_unit(s.base_color),
                marker_color: Rgb::from_unit(s.marker_color),
                glow_color: Rgb::from_unit(s.glow_color),
                diffuse: s.diffuse,
                map_brightness: s.map_brightness,
                markers,
            },
            beacons,
            spin_step: g.spin_step,
            drag_damping: g.drag_damping,
            clock_step: g.clock_step,
            clock_mode: g.clock_mode,
            ring_reference: g.ring_reference,
            spring: self.spring,
            background: g.background.unwrap_or(defaults.background),
        };
        config.check_view()?;
        Ok(config)
    }
}

fn non_negative(what: &'static str, value: f32) -> GlobeResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GlobeError::InvalidValue { what, value })
    }
}

fn positive(what: &'static str, value: f32) -> GlobeResult<()> {
    non_negative(what, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(GlobeError::InvalidValue { what, value })
    }
}

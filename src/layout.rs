//! Region / landing-pad layout
//!
//! The layout is read-only input to the terrain build. It is a plain data
//! struct so tests and level files can supply any arrangement of biomes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-biome decoration pass drawn on top of the ground layers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decoration {
    #[default]
    None,
    GrassTufts,
    Bushes,
    SnowCaps,
}

/// A biome region. Its end is the next region's `start_x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub start_x: f32,
    pub color: [u8; 3],
    #[serde(default)]
    pub cannon_density: f32,
    #[serde(default)]
    pub decoration: Decoration,
}

impl Region {
    pub fn new(name: impl Into<String>, start_x: f32, color: [u8; 3]) -> Self {
        Self {
            name: name.into(),
            start_x,
            color,
            cannon_density: 0.0,
            decoration: Decoration::None,
        }
    }

    pub fn with_decoration(mut self, decoration: Decoration) -> Self {
        self.decoration = decoration;
        self
    }

    pub fn with_cannon_density(mut self, density: f32) -> Self {
        self.cannon_density = density;
        self
    }
}

/// Landing pad, `x` is the pad centre
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandingPad {
    pub x: f32,
    pub width: f32,
    pub name: String,
}

impl LandingPad {
    pub fn new(name: impl Into<String>, x: f32, width: f32) -> Self {
        Self {
            x,
            width,
            name: name.into(),
        }
    }

    pub fn left(&self) -> f32 {
        self.x - self.width / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// Gaussian mountain peak
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    pub x: f32,
    pub height: f32,
    pub sigma: f32,
}

/// Peaks raised inside the named region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MountainRange {
    pub region: String,
    pub peaks: Vec<Peak>,
}

impl MountainRange {
    /// Largest single Gaussian contribution at `x`
    ///
    /// The max (not the sum) keeps peaks separated by valleys.
    pub fn bump(&self, x: f32) -> f32 {
        self.peaks
            .iter()
            .map(|p| {
                let d = x - p.x;
                let sigma = p.sigma.max(f32::EPSILON);
                p.height * (-(d * d) / (2.0 * sigma * sigma)).exp()
            })
            .fold(0.0, f32::max)
    }
}

/// Problems reported by [`RegionLayout::validate`]
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    Empty,
    UnsortedRegions { name: String },
    DuplicateRegion { name: String },
    UnknownRegion { name: String },
    InvalidPad { name: String },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "layout has no regions"),
            Self::UnsortedRegions { name } => {
                write!(f, "region '{name}' starts before the region preceding it")
            }
            Self::DuplicateRegion { name } => write!(f, "region '{name}' is defined twice"),
            Self::UnknownRegion { name } => write!(f, "no region named '{name}'"),
            Self::InvalidPad { name } => write!(f, "landing pad '{name}' has a non-positive width"),
        }
    }
}

impl std::error::Error for LayoutError {}

/// Ordered biome regions plus the pads and special regions the terrain reads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionLayout {
    pub regions: Vec<Region>,
    pub pads: Vec<LandingPad>,
    pub mountain: Option<MountainRange>,
    /// Name of the region that is flattened into the ocean band
    pub water_region: Option<String>,
    /// Where the last region ends
    pub world_end: f32,
}

impl RegionLayout {
    pub fn new(regions: Vec<Region>, world_end: f32) -> Self {
        Self {
            regions,
            world_end,
            ..Default::default()
        }
    }

    pub fn with_pads(mut self, pads: Vec<LandingPad>) -> Self {
        self.pads = pads;
        self
    }

    pub fn with_water(mut self, region: impl Into<String>) -> Self {
        self.water_region = Some(region.into());
        self
    }

    pub fn with_mountain(mut self, mountain: MountainRange) -> Self {
        self.mountain = Some(mountain);
        self
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    fn end_of(&self, idx: usize) -> f32 {
        self.regions
            .get(idx + 1)
            .map_or(self.world_end, |next| next.start_x)
    }

    /// `[start, end)` of the named region
    pub fn bounds(&self, name: &str) -> Option<(f32, f32)> {
        let idx = self.regions.iter().position(|r| r.name == name)?;
        Some((self.regions[idx].start_x, self.end_of(idx)))
    }

    /// Like [`bounds`](Self::bounds) but never blocks level start
    pub fn bounds_or(&self, name: &str, fallback: (f32, f32)) -> (f32, f32) {
        self.bounds(name).unwrap_or_else(|| {
            log::warn!(
                "region '{}' not found, using fallback bounds {:?}",
                name,
                fallback
            );
            fallback
        })
    }

    /// Region containing `x`, if any
    pub fn region_at(&self, x: f32) -> Option<&Region> {
        let idx = self.regions.partition_point(|r| r.start_x <= x);
        if idx == 0 {
            return None;
        }
        let idx = idx - 1;
        (x < self.end_of(idx)).then(|| &self.regions[idx])
    }

    /// Regions intersecting `[from, to]` along with their bounds
    pub fn regions_overlapping(&self, from: f32, to: f32) -> Vec<(&Region, f32, f32)> {
        self.regions
            .iter()
            .enumerate()
            .map(|(i, r)| (r, r.start_x, self.end_of(i)))
            .filter(|&(_, start, end)| start <= to && end >= from)
            .collect()
    }

    /// Strict checks. Generation still runs on a failing layout, using fallbacks
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.regions.is_empty() {
            return Err(LayoutError::Empty);
        }
        for pair in self.regions.windows(2) {
            if pair[1].start_x < pair[0].start_x {
                return Err(LayoutError::UnsortedRegions {
                    name: pair[1].name.clone(),
                });
            }
        }
        for (i, region) in self.regions.iter().enumerate() {
            if self.regions[..i].iter().any(|r| r.name == region.name) {
                return Err(LayoutError::DuplicateRegion {
                    name: region.name.clone(),
                });
            }
        }
        let referenced = self
            .water_region
            .iter()
            .chain(self.mountain.as_ref().map(|m| &m.region));
        for name in referenced {
            if self.bounds(name).is_none() {
                return Err(LayoutError::UnknownRegion { name: name.clone() });
            }
        }
        if let Some(pad) = self.pads.iter().find(|p| p.width <= 0.0) {
            return Err(LayoutError::InvalidPad {
                name: pad.name.clone(),
            });
        }
        Ok(())
    }

    /// Built-in launch-to-destination layout used by the viewer
    pub fn demo() -> Self {
        let regions = vec![
            Region::new("Launch Coast", 0.0, [96, 150, 72]).with_decoration(Decoration::GrassTufts),
            Region::new("Farmland", 6000.0, [120, 160, 70])
                .with_decoration(Decoration::Bushes)
                .with_cannon_density(0.1),
            Region::new("Atlantic", 12_000.0, [20, 70, 140]),
            Region::new("Old Continent", 18_000.0, [110, 140, 80])
                .with_decoration(Decoration::GrassTufts)
                .with_cannon_density(0.3),
            Region::new("Himalaya", 24_000.0, [130, 120, 110])
                .with_decoration(Decoration::SnowCaps)
                .with_cannon_density(0.2),
            Region::new("Steppe", 31_000.0, [170, 150, 90])
                .with_decoration(Decoration::Bushes)
                .with_cannon_density(0.5),
            Region::new("Destination", 37_000.0, [150, 150, 160]),
        ];
        let pads = vec![
            LandingPad::new("Launch Pad", 800.0, 160.0),
            LandingPad::new("Harbour", 10_500.0, 120.0),
            LandingPad::new("Port Town", 19_600.0, 120.0),
            LandingPad::new("Base Camp", 30_200.0, 100.0),
            LandingPad::new("Outpost", 34_000.0, 120.0),
            LandingPad::new("Final Pad", 39_000.0, 200.0),
        ];
        Self::new(regions, 40_000.0)
            .with_pads(pads)
            .with_water("Atlantic")
            .with_mountain(MountainRange {
                region: "Himalaya".to_string(),
                peaks: vec![
                    Peak {
                        x: 25_800.0,
                        height: 260.0,
                        sigma: 420.0,
                    },
                    Peak {
                        x: 27_600.0,
                        height: 390.0,
                        sigma: 380.0,
                    },
                    Peak {
                        x: 29_300.0,
                        height: 300.0,
                        sigma: 450.0,
                    },
                ],
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_regions() -> RegionLayout {
        RegionLayout::new(
            vec![
                Region::new("A", 0.0, [0, 0, 0]),
                Region::new("B", 1000.0, [0, 0, 0]),
                Region::new("C", 3000.0, [0, 0, 0]),
            ],
            4000.0,
        )
    }

    #[test]
    fn region_end_is_next_start() {
        let layout = three_regions();
        assert_eq!(layout.bounds("A"), Some((0.0, 1000.0)));
        assert_eq!(layout.bounds("B"), Some((1000.0, 3000.0)));
        assert_eq!(layout.bounds("C"), Some((3000.0, 4000.0)));
        assert_eq!(layout.bounds("D"), None);
    }

    #[test]
    fn missing_region_uses_fallback() {
        let layout = three_regions();
        assert_eq!(layout.bounds_or("Nowhere", (5.0, 6.0)), (5.0, 6.0));
        assert_eq!(layout.bounds_or("B", (5.0, 6.0)), (1000.0, 3000.0));
    }

    #[test]
    fn region_lookup_by_x() {
        let layout = three_regions();
        assert_eq!(layout.region_at(0.0).map(|r| r.name.as_str()), Some("A"));
        assert_eq!(layout.region_at(999.9).map(|r| r.name.as_str()), Some("A"));
        assert_eq!(layout.region_at(1000.0).map(|r| r.name.as_str()), Some("B"));
        assert_eq!(layout.region_at(3999.0).map(|r| r.name.as_str()), Some("C"));
        assert!(layout.region_at(-1.0).is_none());
        assert!(layout.region_at(4000.0).is_none());
    }

    #[test]
    fn overlapping_regions() {
        let layout = three_regions();
        let names: Vec<_> = layout
            .regions_overlapping(900.0, 1100.0)
            .into_iter()
            .map(|(r, _, _)| r.name.clone())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn validation_catches_bad_layouts() {
        assert_eq!(RegionLayout::default().validate(), Err(LayoutError::Empty));

        let unknown = three_regions().with_water("Ocean");
        assert_eq!(
            unknown.validate(),
            Err(LayoutError::UnknownRegion {
                name: "Ocean".to_string()
            })
        );

        let mut unsorted = three_regions();
        unsorted.regions.swap(0, 1);
        assert!(matches!(
            unsorted.validate(),
            Err(LayoutError::UnsortedRegions { .. })
        ));

        let bad_pad = three_regions().with_pads(vec![LandingPad::new("p", 10.0, 0.0)]);
        assert!(matches!(bad_pad.validate(), Err(LayoutError::InvalidPad { .. })));

        assert!(RegionLayout::demo().validate().is_ok());
    }

    #[test]
    fn bump_takes_max_not_sum() {
        let range = MountainRange {
            region: "M".to_string(),
            peaks: vec![
                Peak {
                    x: 0.0,
                    height: 100.0,
                    sigma: 50.0,
                },
                Peak {
                    x: 10.0,
                    height: 100.0,
                    sigma: 50.0,
                },
            ],
        };
        let b = range.bump(5.0);
        assert!(b <= 100.0);
        assert!((range.bump(0.0) - 100.0).abs() < 1e-3);
    }

    #[test]
    fn layout_parses_from_json() {
        let json = r#"{
            "regions": [
                { "name": "Land", "start_x": 0.0, "color": [1, 2, 3] },
                { "name": "Ocean", "start_x": 500.0, "color": [0, 0, 200] }
            ],
            "pads": [ { "x": 100.0, "width": 50.0, "name": "Home" } ],
            "water_region": "Ocean",
            "world_end": 1000.0
        }"#;
        let layout = RegionLayout::from_json_str(json).unwrap();
        assert_eq!(layout.bounds("Ocean"), Some((500.0, 1000.0)));
        assert_eq!(layout.regions[0].decoration, Decoration::None);
        assert!(layout.validate().is_ok());
    }
}

// 手动验证地形子系统的核心性质
use shuttle_terrain::draw::{DrawSurface, ShapeSurface, ShapeSurfaceFactory};
use shuttle_terrain::layout::{LandingPad, MountainRange, Peak, Region, RegionLayout};
use shuttle_terrain::physics::{BodyId, BodyKind, PhysicsWorld, StaticBodyDesc, StaticBodyStore};
use shuttle_terrain::terrain::{smoothed_profile, HeightField};
use shuttle_terrain::{FrameContext, Terrain, TerrainConfig};

fn build(
    config: TerrainConfig,
    layout: RegionLayout,
    store: &mut StaticBodyStore,
) -> Terrain<BodyId, ShapeSurface> {
    let mut factory = ShapeSurfaceFactory::new();
    Terrain::build(config, layout, store, &mut factory)
}

fn ocean_layout() -> RegionLayout {
    RegionLayout::new(
        vec![
            Region::new("Coast", 0.0, [90, 140, 70]),
            Region::new("Ocean", 1000.0, [30, 60, 120]),
            Region::new("Far Shore", 3000.0, [190, 180, 120]),
        ],
        4000.0,
    )
    .with_water("Ocean")
    .with_pads(vec![LandingPad::new("Home", 500.0, 100.0)])
}

fn mountain_layout() -> RegionLayout {
    RegionLayout::new(
        vec![
            Region::new("Foothills", 0.0, [100, 130, 80]),
            Region::new("Peaks", 1000.0, [130, 120, 110]),
            Region::new("Plains", 3000.0, [150, 160, 90]),
        ],
        4000.0,
    )
    .with_mountain(MountainRange {
        region: "Peaks".to_string(),
        peaks: vec![
            Peak {
                x: 1500.0,
                height: 150.0,
                sigma: 120.0,
            },
            Peak {
                x: 2000.0,
                height: 300.0,
                sigma: 150.0,
            },
            Peak {
                x: 2500.0,
                height: 200.0,
                sigma: 120.0,
            },
        ],
    })
}

#[test]
fn test_ocean_and_pad_scenario() {
    println!("\n=== Testing ocean + landing pad scenario ===");

    let config = TerrainConfig::with_world(0.0, 4000.0);
    let mut store = StaticBodyStore::new();
    let mut terrain = build(config.clone(), ocean_layout(), &mut store);

    let ocean: Vec<f32> = terrain
        .vertices()
        .iter()
        .filter(|v| v.x >= 1000.0 && v.x < 3000.0)
        .map(|v| v.y)
        .collect();
    println!("Ocean vertices: {}", ocean.len());
    assert_eq!(ocean.len(), 100);
    assert!(ocean.iter().all(|&y| y == config.ocean_y));
    assert_eq!(terrain.height_at(2000.0), config.ocean_y);
    assert_eq!(terrain.height_at(1234.5), config.ocean_y);

    let pad: Vec<f32> = terrain
        .vertices()
        .iter()
        .filter(|v| v.x >= 450.0 && v.x < 570.0)
        .map(|v| v.y)
        .collect();
    println!("Pad footprint vertices: {} at y={}", pad.len(), pad[0]);
    assert!(pad.len() >= 5);
    assert!(pad.iter().all(|&y| y == pad[0]), "pad not flat: {:?}", pad);
    for x in [450.0, 475.5, 500.0, 569.0] {
        assert_eq!(terrain.height_at(x), pad[0], "height_at({x}) off the pad level");
    }

    terrain.destroy(&mut store);
    println!("✓ Ocean + pad scenario passed");
}

#[test]
fn test_mountain_scenario() {
    println!("\n=== Testing mountain scenario ===");

    let config = TerrainConfig::with_world(0.0, 4000.0);
    let mut store = StaticBodyStore::new();
    let mut terrain = build(config.clone(), mountain_layout(), &mut store);

    let base = config.base_height();
    let summit = terrain.height_at(2000.0);
    println!("Summit y={summit:.2}, base - H2 = {:.2}", base - 300.0);
    // smoothing pulls the summit down a little, the rock texture adds a few units
    assert!(
        (summit - (base - 300.0)).abs() < config.rock_amplitude + 15.0,
        "summit {summit} too far from {}",
        base - 300.0
    );
    assert!(summit < config.clamp_min, "mountain must not be clamped");

    for x in [1700.0, 2300.0] {
        let y = terrain.height_at(x);
        println!("  y({x}) = {y:.2}");
        assert!(summit < y, "summit not above the flank at {x}");
    }

    for v in terrain.vertices() {
        if !terrain.field().in_mountain(v.x) {
            assert!(
                v.y >= config.clamp_min && v.y <= config.clamp_max,
                "vertex {:?} outside the safe band",
                v
            );
        }
    }

    terrain.destroy(&mut store);
    println!("✓ Mountain scenario passed");
}

#[test]
fn test_collision_bodies_follow_vertices() {
    println!("\n=== Testing collision bodies ===");

    let config = TerrainConfig::with_world(0.0, 4000.0);
    let mut store = StaticBodyStore::new();
    let mut terrain = build(config, ocean_layout(), &mut store);

    let n = terrain.vertices().len();
    println!("Vertices: {n}, bodies: {}", store.len());
    assert_eq!(store.len(), n - 1 + 2);
    assert_eq!(terrain.stats().skipped_bodies, 0);

    let segments: Vec<&StaticBodyDesc> = store
        .iter()
        .map(|(_, body)| body)
        .filter(|body| body.kind == BodyKind::Segment)
        .collect();
    let walls = store.iter().filter(|(_, b)| b.kind == BodyKind::Wall).count();
    assert_eq!(walls, 2);
    assert_eq!(segments.len(), n - 1);

    for (body, pair) in segments.iter().zip(terrain.vertices().windows(2)) {
        let expected = (pair[1].y - pair[0].y).atan2(pair[1].x - pair[0].x);
        assert!(
            (body.rotation - expected).abs() < 1e-5,
            "rotation {} != {}",
            body.rotation,
            expected
        );
    }

    terrain.destroy(&mut store);
    assert!(store.is_empty(), "destroy left {} bodies", store.len());
    println!("✓ Collision bodies passed");
}

/// Physics world that refuses every `every`-th body
struct FlakyPhysics {
    inner: StaticBodyStore,
    calls: usize,
    every: usize,
}

impl PhysicsWorld for FlakyPhysics {
    type Handle = BodyId;

    fn create_static_body(&mut self, desc: &StaticBodyDesc) -> Option<BodyId> {
        self.calls += 1;
        if self.calls % self.every == 0 {
            return None;
        }
        self.inner.create_static_body(desc)
    }

    fn remove_body(&mut self, handle: BodyId) {
        self.inner.remove_body(handle);
    }
}

#[test]
fn test_refused_bodies_are_skipped() {
    println!("\n=== Testing degraded collision ===");

    let mut physics = FlakyPhysics {
        inner: StaticBodyStore::new(),
        calls: 0,
        every: 10,
    };
    let mut factory = ShapeSurfaceFactory::new();
    let mut terrain = Terrain::build(
        TerrainConfig::with_world(0.0, 4000.0),
        ocean_layout(),
        &mut physics,
        &mut factory,
    );

    let stats = terrain.stats();
    println!("Bodies: {}, skipped: {}", stats.bodies, stats.skipped_bodies);
    assert_eq!(physics.calls, 202);
    assert_eq!(stats.skipped_bodies, 20);
    assert_eq!(stats.bodies, 182);
    assert_eq!(physics.inner.len(), 182);
    // the rest of the terrain is unaffected
    assert_eq!(stats.chunks, 4);
    assert_eq!(terrain.height_at(2000.0), terrain.config().ocean_y);

    terrain.destroy(&mut physics);
    assert!(physics.inner.is_empty());
    println!("✓ Degraded collision passed");
}

#[test]
fn test_generation_is_deterministic() {
    println!("\n=== Testing determinism ===");

    let config = TerrainConfig::default();
    let layout = RegionLayout::demo();
    let a = HeightField::generate(&config, &layout);
    let b = HeightField::generate(&config, &layout);

    assert_eq!(a.vertices().len(), b.vertices().len());
    for (va, vb) in a.vertices().iter().zip(b.vertices()) {
        assert_eq!(va.x.to_bits(), vb.x.to_bits());
        assert_eq!(va.y.to_bits(), vb.y.to_bits());
    }
    assert_eq!(a.flat_areas(), b.flat_areas());

    let other = HeightField::generate(&config.clone().with_seed(config.seed + 1), &layout);
    println!(
        "Flat areas: {} (seed) vs {} (seed + 1)",
        a.flat_areas().len(),
        other.flat_areas().len()
    );
    println!("✓ Determinism passed");
}

#[test]
fn test_smoothed_profile_has_no_jumps() {
    println!("\n=== Testing profile continuity ===");

    let config = TerrainConfig::with_world(0.0, 8000.0);
    let layout = RegionLayout::new(vec![Region::new("Plain", 0.0, [90, 140, 70])], 8000.0);
    let profile = smoothed_profile(&config, &layout);
    let bound = config.max_noise_slope() * config.segment_width + 1e-2;

    let worst = profile
        .windows(2)
        .map(|w| (w[1].y - w[0].y).abs())
        .fold(0.0f32, f32::max);
    println!("Largest step: {worst:.3} (bound {bound:.3})");
    assert!(worst <= bound);
    println!("✓ Profile continuity passed");
}

#[test]
fn test_chunk_visibility_matches_viewport() {
    println!("\n=== Testing chunk visibility ===");

    let config = TerrainConfig::with_world(0.0, 10_000.0);
    let margin = config.cull_margin;
    let layout = RegionLayout::new(vec![Region::new("Plain", 0.0, [90, 140, 70])], 10_000.0);
    let mut store = StaticBodyStore::new();
    let mut terrain = build(config, layout, &mut store);
    assert_eq!(terrain.chunks().len(), 10);

    for (camera_x, width) in [(0.0, 800.0), (2950.0, 1280.0), (7999.0, 1.0), (9500.0, 2000.0)] {
        terrain.update(
            &FrameContext {
                camera_x,
                viewport_width: width,
                dt: 1.0 / 60.0,
            },
            &false,
            &0.0f32,
        );
        let (left, right) = (camera_x - margin, camera_x + width + margin);
        let mut shown = Vec::new();
        for chunk in terrain.chunks().iter() {
            let expected = chunk.start_x <= right && chunk.end_x >= left;
            assert_eq!(chunk.surface.is_visible(), expected, "chunk {}", chunk.index);
            if expected {
                shown.push(chunk.index);
            }
        }
        println!("camera {camera_x} width {width}: chunks {:?}", shown);
    }

    terrain.destroy(&mut store);
    println!("✓ Chunk visibility passed");
}

#[test]
fn test_layout_from_json() {
    println!("\n=== Testing JSON layout ===");

    let json = r#"{
        "regions": [
            { "name": "West", "start_x": 0, "color": [90, 140, 70] },
            { "name": "Sea", "start_x": 1000, "color": [30, 60, 120] },
            { "name": "East", "start_x": 2000, "color": [150, 150, 90], "decoration": "Bushes" }
        ],
        "pads": [ { "x": 300, "width": 80, "name": "Base" } ],
        "water_region": "Sea",
        "world_end": 3000
    }"#;
    let layout = RegionLayout::from_json_str(json).expect("valid layout");
    layout.validate().expect("layout validates");
    assert_eq!(layout.bounds("Sea"), Some((1000.0, 2000.0)));

    let mut store = StaticBodyStore::new();
    let mut terrain = build(TerrainConfig::with_world(0.0, 3000.0), layout, &mut store);
    assert!(terrain.is_water(1500.0));
    assert!(!terrain.is_water(2500.0));
    assert!(terrain.stats().has_ocean);
    terrain.destroy(&mut store);
    println!("✓ JSON layout passed");
}

#[test]
fn test_missing_water_region_falls_back() {
    println!("\n=== Testing fallback water bounds ===");

    let config = TerrainConfig::default();
    let layout = RegionLayout::new(
        vec![
            Region::new("West", 0.0, [90, 140, 70]),
            Region::new("East", 20_000.0, [150, 160, 90]),
        ],
        config.world_end,
    )
    .with_water("Missing");
    let (start, end) = config.fallback_water_bounds;

    let mut store = StaticBodyStore::new();
    let mut terrain = build(config.clone(), layout, &mut store);

    let ocean = terrain
        .vertices()
        .iter()
        .filter(|v| v.x >= start && v.x <= end)
        .inspect(|v| assert_eq!(v.y, config.ocean_y, "vertex {:?} not at ocean height", v))
        .count();
    println!("Fallback band [{start}, {end}]: {ocean} ocean vertices");
    assert!(ocean > 0);

    let walls: Vec<&StaticBodyDesc> = store
        .iter()
        .map(|(_, body)| body)
        .filter(|body| body.kind == BodyKind::Wall)
        .collect();
    assert_eq!(walls.len(), 2);
    assert_eq!(walls[0].position.x, start);
    assert_eq!(walls[1].position.x, end);
    assert_eq!(store.len(), terrain.vertices().len() - 1 + 2);

    terrain.destroy(&mut store);
    println!("✓ Fallback water bounds passed");
}

#[test]
fn test_pad_margin_is_flat_at_any_offset() {
    println!("\n=== Testing pad footprint between vertices ===");

    let config = TerrainConfig::with_world(0.0, 4000.0);
    let layout = RegionLayout::new(vec![Region::new("Plain", 0.0, [90, 140, 70])], 4000.0)
        .with_pads(vec![LandingPad::new("Home", 500.0, 100.0)]);
    let mut store = StaticBodyStore::new();
    let mut terrain = build(config.clone(), layout, &mut store);

    let lo = 450.0 - config.pad_margin_left;
    let hi = 550.0 + config.pad_margin_right;
    let level = terrain.height_at(500.0);
    let off: Vec<f32> = (0..=((hi - lo) * 10.0) as usize)
        .map(|i| lo + i as f32 * 0.1)
        .filter(|&x| terrain.height_at(x) != level)
        .collect();
    println!("Footprint [{lo}, {hi}] at y={level}, off-level samples: {}", off.len());
    assert!(off.is_empty(), "off-level xs: {:?}", &off[..off.len().min(8)]);

    terrain.destroy(&mut store);
    println!("✓ Pad footprint passed");
}

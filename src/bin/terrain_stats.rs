// 地形统计: 用内存物理世界构建一次地形并打印概况
//
// usage: terrain_stats [layout.json] [--seed N] [--json]

use std::path::PathBuf;

use anyhow::Context;
use shuttle_terrain::draw::ShapeSurfaceFactory;
use shuttle_terrain::layout::RegionLayout;
use shuttle_terrain::physics::StaticBodyStore;
use shuttle_terrain::{Terrain, TerrainConfig};

struct Args {
    layout: Option<PathBuf>,
    seed: Option<u64>,
    json: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args {
        layout: None,
        seed: None,
        json: false,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--json" => args.json = true,
            "--seed" => {
                let value = it.next().context("--seed needs a value")?;
                args.seed = Some(value.parse().with_context(|| format!("bad seed {value:?}"))?);
            }
            _ => args.layout = Some(PathBuf::from(arg)),
        }
    }
    Ok(args)
}

fn load_layout(path: &PathBuf) -> anyhow::Result<RegionLayout> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let layout = RegionLayout::from_json_str(&text)
        .with_context(|| format!("parsing {}", path.display()))?;
    layout
        .validate()
        .with_context(|| format!("validating {}", path.display()))?;
    Ok(layout)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = parse_args()?;

    let layout = match &args.layout {
        Some(path) => load_layout(path)?,
        None => RegionLayout::demo(),
    };
    let mut config = TerrainConfig::with_world(0.0, layout.world_end);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let mut physics = StaticBodyStore::new();
    let mut surfaces = ShapeSurfaceFactory::new();
    let mut terrain = Terrain::build(config, layout, &mut physics, &mut surfaces);
    let stats = terrain.stats();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("Terrain stats:");
        println!("  Vertices: {}", stats.vertices);
        println!("  Bodies: {} ({} skipped)", stats.bodies, stats.skipped_bodies);
        println!("  Chunks: {}", stats.chunks);
        println!("  Flat areas: {}", stats.flat_areas);
        println!("  Ocean: {}", if stats.has_ocean { "yes" } else { "no" });
        println!("  Height range: {:.1} .. {:.1}", stats.min_y, stats.max_y);
        println!("Regions:");
        for region in &terrain.layout().regions {
            let (start, end) = terrain
                .layout()
                .bounds(&region.name)
                .unwrap_or((region.start_x, region.start_x));
            let mid = (start + end) / 2.0;
            println!(
                "  {:<16} [{:>7.0}, {:>7.0})  ground at centre {:.1}",
                region.name,
                start,
                end,
                terrain.height_at(mid)
            );
        }
        for area in terrain.flat_areas().iter().take(8) {
            println!(
                "  flat area at x={:.0} width={:.0} y={:.1}",
                area.center_x, area.width, area.y
            );
        }
    }

    terrain.destroy(&mut physics);
    Ok(())
}

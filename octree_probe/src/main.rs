//! Octree probe
//!
//! Loads a terrain OBJ, builds the octree and runs the queries a lander
//! game makes each frame: a ground test at a point, and a ray used both as
//! an altitude probe and as a pick ray.

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgMatches, Command};
use log::{info, warn};
use terrain_octree::foundation::logging;
use terrain_octree::prelude::*;

fn cli() -> Command {
    Command::new("octree_probe")
        .about("Builds a terrain octree from an OBJ file and queries it")
        .arg(
            Arg::new("mesh")
                .value_name("OBJ")
                .help("Terrain mesh to index")
                .required(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Terrain config (.toml or .ron)"),
        )
        .arg(
            Arg::new("levels")
                .short('l')
                .long("levels")
                .value_name("N")
                .help("Override the configured octree depth")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new("point")
                .short('p')
                .long("point")
                .value_name("X,Y,Z")
                .help("Ground test at this position")
                .allow_hyphen_values(true),
        )
        .arg(
            Arg::new("ray")
                .short('r')
                .long("ray")
                .value_name("OX,OY,OZ,DX,DY,DZ")
                .help("Cast a ray: first hit, all hits, nearest cell and picked vertex")
                .allow_hyphen_values(true),
        )
        .arg(
            Arg::new("draw")
                .long("draw")
                .help("List the debug boxes a renderer would draw")
                .action(clap::ArgAction::SetTrue),
        )
}

/// Parse exactly `N` comma-separated floats
fn parse_floats<const N: usize>(text: &str) -> Result<[f32; N]> {
    let values = text
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f32>()
                .with_context(|| format!("'{part}' is not a number"))
        })
        .collect::<Result<Vec<f32>>>()?;

    match <[f32; N]>::try_from(values) {
        Ok(array) => Ok(array),
        Err(values) => bail!("expected {N} comma-separated values, got {}", values.len()),
    }
}

fn load_config(matches: &ArgMatches) -> Result<TerrainConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => TerrainConfig::load_from_file(path)
            .with_context(|| format!("loading config {path}"))?,
        None => TerrainConfig::default(),
    };
    if let Some(&levels) = matches.get_one::<u32>("levels") {
        config.octree.max_levels = levels;
    }
    Ok(config)
}

fn probe_point(octree: &Octree, text: &str) -> Result<()> {
    let [x, y, z] = parse_floats::<3>(text)?;
    let position = Vec3::new(x, y, z);

    match ground_contact(octree, position) {
        Some(contact) => info!(
            "Grounded at {:?}: vertex {} {:?}, normal {:?}",
            position, contact.point_index, contact.point, contact.normal
        ),
        None => info!("Not grounded at {:?}", position),
    }
    Ok(())
}

fn probe_ray(octree: &Octree, text: &str) -> Result<()> {
    let [ox, oy, oz, dx, dy, dz] = parse_floats::<6>(text)?;
    let origin = Vec3::new(ox, oy, oz);
    let ray = Ray::normalized(origin, Vec3::new(dx, dy, dz));
    if ray.direction == Vec3::zeros() {
        warn!("Ray direction is zero; queries reduce to a containment test");
    }

    match octree.find_first_intersected_leaf(&ray) {
        Some(leaf) => info!(
            "First hit (traversal order): depth {}, {} points",
            leaf.depth(),
            leaf.points().len()
        ),
        None => info!("Ray misses the terrain"),
    }

    info!("Ray crosses {} leaves", octree.collect_intersected_leaves(&ray).len());

    if let Some((leaf, enter)) = octree.nearest_intersected_leaf(&ray) {
        info!("Nearest leaf entered at t = {enter:.3}, center {:?}", leaf.bounds().center());
    }

    if let Some(hit) = pick(octree, &ray, origin) {
        info!("Picked vertex {} {:?} at distance {:.3}", hit.point_index, hit.point, hit.distance);
    }

    if let Some(height) = altitude(octree, origin, ray.direction) {
        info!("Altitude along ray: {height:.3}");
    }
    Ok(())
}

fn main() -> Result<()> {
    logging::init_with_level(log::LevelFilter::Info);

    let matches = cli().get_matches();
    let config = load_config(&matches)?;

    let mesh_path = matches
        .get_one::<String>("mesh")
        .context("mesh path is required")?;
    let mesh = ObjLoader::load_obj(mesh_path).with_context(|| format!("loading {mesh_path}"))?;
    let octree = Octree::with_config(mesh, &config.octree).context("building octree")?;

    let stats = octree.stats();
    info!(
        "Octree: {} nodes, {} leaves, depth {}, {} point refs",
        stats.nodes, stats.leaves, stats.depth, stats.point_refs
    );

    if matches.get_flag("draw") {
        let boxes = octree_boxes(&octree, config.draw_levels, &config.palette);
        for b in &boxes {
            info!("box depth {} center {:?} extents {:?}", b.depth, b.center, b.extents);
        }
        info!(
            "{} boxes to depth {}, {} leaf boxes",
            boxes.len(),
            config.draw_levels,
            octree.leaves().len()
        );
    }

    if let Some(text) = matches.get_one::<String>("point") {
        probe_point(&octree, text)?;
    }
    if let Some(text) = matches.get_one::<String>("ray") {
        probe_ray(&octree, text)?;
    }
    Ok(())
}

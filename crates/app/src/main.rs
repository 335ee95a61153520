//! Mesh inspector: loads or generates a mesh, applies the requested
//! transforms and logs what came out.

use std::path::PathBuf;

use anyhow::{Context, Result};
use asset::{MeshData, NormalWeighting, SphereParams};
use corelib::Vec3f;

fn parse_vec3(val: &str) -> Option<Vec3f> {
    let mut parts = val.split(',').map(|p| p.trim().parse::<f32>());
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(Ok(x)), Some(Ok(y)), Some(Ok(z)), None) => Some(Vec3f::new(x, y, z)),
        _ => None,
    }
}

fn parse_mesh_arg(args: &[String]) -> Option<PathBuf> {
    // --mesh=path/to/file.off
    args.iter()
        .find_map(|arg| arg.strip_prefix("--mesh="))
        .map(PathBuf::from)
}

fn parse_vec3_arg(args: &[String], prefix: &str) -> Option<Vec3f> {
    // --center=x,y,z
    let mut out = None;
    for arg in args {
        if let Some(val) = arg.strip_prefix(prefix) {
            out = parse_vec3(val);
            if out.is_none() {
                log::warn!("Ignoring malformed '{}' (expected x,y,z)", arg);
            }
        }
    }
    out
}

fn parse_length_arg(args: &[String]) -> Option<f32> {
    for arg in args {
        if let Some(val) = arg.strip_prefix("--length=") {
            match val.parse::<f32>() {
                Ok(len) if len > 0.0 => return Some(len),
                _ => log::warn!("Ignoring non-positive or malformed length '{}'", val),
            }
        }
    }
    None
}

fn parse_normals_arg(args: &[String]) -> NormalWeighting {
    // --normals=area|angle
    let mut weighting = NormalWeighting::default();
    for arg in args {
        if let Some(val) = arg.strip_prefix("--normals=") {
            weighting = match val.to_ascii_lowercase().as_str() {
                "area" => NormalWeighting::Area,
                "angle" => NormalWeighting::Angle,
                other => {
                    log::warn!("Unknown normal weighting '{}', falling back to area.", other);
                    NormalWeighting::Area
                }
            };
        }
    }
    weighting
}

fn parse_sphere_arg(args: &[String]) -> Option<SphereParams> {
    // --sphere or --sphere=LONGxLAT
    for arg in args {
        if arg == "--sphere" {
            return Some(SphereParams::default());
        }
        if let Some(v) = arg.strip_prefix("--sphere=") {
            if let Some((lo, la)) = v.split_once('x').or_else(|| v.split_once('X')) {
                if let (Ok(longitude_divisions), Ok(latitude_divisions)) =
                    (lo.parse::<u32>(), la.parse::<u32>())
                {
                    return Some(SphereParams {
                        longitude_divisions,
                        latitude_divisions,
                    });
                }
            }
            log::warn!("Malformed '{}', using the default tessellation.", arg);
            return Some(SphereParams::default());
        }
    }
    None
}

fn parse_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// Where the mesh comes from.
#[derive(Debug, PartialEq)]
enum Source {
    File(PathBuf),
    Sphere(SphereParams),
    Terrain,
}

#[derive(Debug)]
struct Options {
    source: Source,
    lsa_offset: Vec3f,
    center: Option<Vec3f>,
    length: Option<f32>,
    weighting: NormalWeighting,
    flip_normals: bool,
}

impl Options {
    fn from_args(args: &[String]) -> Self {
        let source = if let Some(params) = parse_sphere_arg(args) {
            Source::Sphere(params)
        } else if parse_flag(args, "--terrain") {
            Source::Terrain
        } else if let Some(path) = parse_mesh_arg(args) {
            Source::File(path)
        } else {
            Source::Sphere(SphereParams::default())
        };
        Self {
            source,
            lsa_offset: parse_vec3_arg(args, "--lsa-offset=").unwrap_or_default(),
            center: parse_vec3_arg(args, "--center="),
            length: parse_length_arg(args),
            weighting: parse_normals_arg(args),
            flip_normals: parse_flag(args, "--flip-normals"),
        }
    }
}

fn build_mesh(opts: &Options) -> Result<MeshData> {
    let mut mesh = MeshData::new();
    match &opts.source {
        Source::File(path) => {
            mesh.load(path, opts.lsa_offset)
                .with_context(|| format!("Failed to load mesh {:?}", path))?;
        }
        Source::Sphere(params) => {
            mesh.generate_sphere(*params)
                .context("Failed to generate sphere")?;
        }
        Source::Terrain => mesh.generate_flat_patch(),
    }

    if opts.weighting != NormalWeighting::default() {
        mesh.compute_normals_with(opts.weighting);
    }
    if let Some(mid) = opts.center {
        mesh.translate_to_center(mid);
    }
    if let Some(length) = opts.length {
        let scale = mesh.scale_to_length(length)?;
        log::debug!("Scaled by {}", scale);
    }
    if opts.flip_normals {
        mesh.flip_normals();
    }
    Ok(mesh)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let opts = Options::from_args(&args);
    log::info!("Starting mesh inspector: {:?}", opts);

    let mesh = build_mesh(&opts)?;
    for line in mesh.to_string().lines() {
        log::info!("{}", line);
    }

    log::info!("Done.");
    Ok(())
}

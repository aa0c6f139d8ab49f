//! retopo CLI - edge-loop retopology from the command line.
//!
//! Usage: retopo <COMMAND> [OPTIONS]
//!
//! Run `retopo --help` for available commands.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

use retopo::algo::retopo::{Axis, LoopOp, RetopoOptions, Retopologizer};
use retopo::io;
use retopo::mesh::{build_grid, PolyMesh, VertexId};

#[derive(Parser)]
#[command(name = "retopo")]
#[command(author, version, about = "Edge-loop retopology CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Write a planar quad grid
    Grid {
        /// Output mesh file
        output: PathBuf,

        /// Number of quads along x
        #[arg(short, long, default_value = "4")]
        columns: usize,

        /// Number of quads along y
        #[arg(short, long, default_value = "4")]
        rows: usize,

        /// Distance between neighbouring vertices
        #[arg(short, long, default_value = "1.0")]
        spacing: f64,
    },

    /// Apply a loop operation at a seed vertex
    Apply {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Operation to apply (1to2, 1to3, 1to4, 2to1, 3to1, 4to1, 4to2, 5to3)
        #[arg(short, long)]
        op: LoopOp,

        /// Index of the seed vertex (zero-based, in file order)
        #[arg(long)]
        seed: usize,

        /// Axis followed along each row (+x, -x, +y, -y, +z, -z)
        #[arg(long, default_value = "+x", allow_hyphen_values = true)]
        across: Axis,

        /// Axis followed from row to row
        #[arg(long, default_value = "+y", allow_hyphen_values = true)]
        down: Axis,

        /// Also dissolve the edges and vertices the operation leaves behind
        #[arg(long)]
        dissolve: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }
        Commands::Grid {
            output,
            columns,
            rows,
            spacing,
        } => {
            cmd_grid(&output, columns, rows, spacing)?;
        }
        Commands::Apply {
            input,
            output,
            op,
            seed,
            across,
            down,
            dissolve,
        } => {
            let options = RetopoOptions::new(across, down).with_dissolve(dissolve);
            cmd_apply(&input, &output, op, seed, &options)?;
        }
    }
    Ok(())
}

fn cmd_info(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: PolyMesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Edges: {}", mesh.num_edges());
    println!("Faces: {}", mesh.num_faces());
    println!("Surface area: {:.6}", mesh.surface_area());

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }

    let mut sizes: BTreeMap<usize, usize> = BTreeMap::new();
    for (_, face) in mesh.faces() {
        *sizes.entry(face.len()).or_default() += 1;
    }
    println!("Face sizes:");
    for (corners, count) in sizes {
        println!("  {:>2}-gon: {}", corners, count);
    }

    if mesh.is_quad_mesh() {
        println!("Mesh type: Quad mesh");
    } else if mesh.is_triangle_mesh() {
        println!("Mesh type: Triangle mesh");
    } else {
        println!("Mesh type: Mixed polygon mesh");
    }

    let boundary = mesh.edges().filter(|(_, e)| e.is_boundary()).count();
    let wire = mesh.edges().filter(|(_, e)| e.is_wire()).count();
    println!("Boundary edges: {}", boundary);
    if wire > 0 {
        println!("Wire edges: {}", wire);
    }
    Ok(())
}

fn cmd_grid(
    output: &PathBuf,
    columns: usize,
    rows: usize,
    spacing: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: PolyMesh = build_grid(columns, rows, spacing)?;
    io::save(&mesh, output)?;
    log::info!(
        "Saved {}x{} grid: {} ({} vertices, {} faces)",
        columns,
        rows,
        output.display(),
        mesh.num_vertices(),
        mesh.num_faces()
    );
    Ok(())
}

fn cmd_apply(
    input: &PathBuf,
    output: &PathBuf,
    op: LoopOp,
    seed: usize,
    options: &RetopoOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh: PolyMesh = io::load(input)?;
    log::info!(
        "Loaded: {} vertices, {} faces",
        mesh.num_vertices(),
        mesh.num_faces()
    );

    mesh.select_only(VertexId::new(seed))?;
    let start = Instant::now();
    let report = Retopologizer::default().apply(&mut mesh, op, options)?;
    let elapsed = start.elapsed();

    log::info!(
        "{}: {} new vertices, {} new faces, {} removed ({:.2?})",
        report.operation,
        report.edit.created_vertices.len(),
        report.edit.created_faces.len(),
        report.edit.removed_faces,
        elapsed
    );

    io::save(&mesh, output)?;
    log::info!(
        "Saved: {} ({} vertices, {} faces)",
        output.display(),
        mesh.num_vertices(),
        mesh.num_faces()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_parses_operation_names() {
        for op in LoopOp::ALL {
            let name = op.to_string();
            let cli = Cli::try_parse_from([
                "retopo", "apply", "in.obj", "out.obj", "--op", name.as_str(), "--seed", "0",
            ])
            .unwrap();
            match cli.command {
                Commands::Apply { op: parsed, .. } => assert_eq!(parsed, op),
                _ => panic!("expected apply"),
            }
        }
    }

    #[test]
    fn test_apply_rejects_unknown_operation() {
        let result = Cli::try_parse_from([
            "retopo", "apply", "in.obj", "out.obj", "--op", "2to5", "--seed", "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_parses_negative_axes() {
        let cli = Cli::try_parse_from([
            "retopo", "apply", "in.obj", "out.obj", "-o", "4to2", "--seed", "3", "--across",
            "-y", "--down", "-x",
        ])
        .unwrap();
        match cli.command {
            Commands::Apply { op, across, down, .. } => {
                assert_eq!(op, LoopOp::FourToTwo);
                assert_eq!(across, Axis::NegY);
                assert_eq!(down, Axis::NegX);
            }
            _ => panic!("expected apply"),
        }
    }
}

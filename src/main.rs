use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use neuro_workspace::kinematic_traits::{Kinematics, Point};
use neuro_workspace::parameters_from_file::WorkspaceSetup;
use neuro_workspace::pipeline::WorkspacePipeline;
use neuro_workspace::utils::{dump_axes, dump_pose};

/// Computes the workspace of the robot, validates an entry point and exports the point files.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// YAML setup with probe geometry, registration and optionally the entry point.
    /// The built-in nominal probe and identity registration are used if omitted.
    #[arg(short, long)]
    setup: Option<PathBuf>,

    /// Entry point in imager coordinates, overrides the one from the setup.
    #[arg(short, long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    entry: Option<Vec<f64>>,

    /// Directory to write the point files into.
    #[arg(short, long, default_value = ".")]
    output: PathBuf,
}

/// Usage example.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let setup = match &args.setup {
        Some(path) => WorkspaceSetup::from_yaml_file(path)
            .with_context(|| format!("reading setup {}", path.display()))?,
        None => WorkspaceSetup::default(),
    };
    println!("Probe:\n{}", setup.probe.to_yaml());

    let entry = match (&args.entry, setup.entry_point) {
        (Some(v), _) => Point::new(v[0], v[1], v[2]),
        (None, Some(entry)) => entry,
        (None, None) => {
            bail!("no entry point given, use --entry X Y Z or set entry_point in the setup")
        }
    };

    let mut pipeline = WorkspacePipeline::new(setup.probe, setup.registration)
        .context("registration matrix is not invertible")?;
    pipeline.corridor = setup.corridor;

    let report = pipeline.run(&entry);
    println!(
        "Entry point in robot frame: {:.1} {:.1} {:.1}",
        report.entry.x, report.entry.y, report.entry.z
    );
    println!("General workspace: {} points", report.general.len());
    println!("RCM workspace: {} points", report.rcm.len());
    match report.require_reachable() {
        Ok(validated) => {
            println!("Validated workspace: {} points", validated.len());
            if let Some(rcm) = validated.points().first() {
                let axes = pipeline.robot.inverse(&report.entry, rcm)?;
                println!("Configuration for the first validated RCM point:");
                dump_axes(&axes);
                dump_pose(&pipeline.robot.forward_checked(&axes, 0)?.z_frame_to_treatment);
            }
        }
        Err(e) => println!("{}", e),
    }
    println!("Corridor: {} points", report.corridor.len());

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    report.export(&args.output)
        .with_context(|| format!("writing point files to {}", args.output.display()))?;
    Ok(())
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ember_assets::{obj, MeshData};
use ember_ecs::{Tag, Transform};
use ember_input::{InputState, Key};
use ember_render::{RecordingBackend, Renderer};
use ember_scene::demo::build_demo_scene;
use ember_scene::{EngineConfig, Scene};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ember-cli", about = "Headless tools for the ember engine")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Engine config (YAML); defaults apply when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the effective engine config
    Info,
    /// Run the demo scene headless and report where everything ended up
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "120")]
        frames: u64,
        /// Seconds per frame
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,
        /// Keys held for the whole run (e.g. `w`, `shift`, `arrowleft`)
        #[arg(long)]
        hold: Vec<Key>,
        /// OBJ model used for the falling body instead of the cube
        #[arg(long)]
        model: Option<PathBuf>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarize an OBJ file
    Obj {
        path: PathBuf,
    },
}

#[derive(Debug, Serialize)]
struct EntityReport {
    handle: u64,
    tag: String,
    position: [f32; 3],
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    frames: u64,
    draws: u32,
    submissions: u32,
    physics_steps: u64,
    camera: [f32; 3],
    entities: Vec<EntityReport>,
}

fn simulate(
    config: &EngineConfig,
    frames: u64,
    dt: f32,
    hold: &[Key],
    model: Option<MeshData>,
) -> Result<SimulationReport> {
    tracing::info!(frames, dt, held = hold.len(), "simulating demo scene");
    let (w, h) = (1280, 720);
    let mut renderer = Renderer::new(RecordingBackend::new(w, h), config.renderer)?;
    let mut scene = Scene::from_config(config);
    build_demo_scene(&mut scene, &mut renderer, model)?;
    scene.on_start()?;

    let mut input = InputState::new();
    for key in hold {
        input.press(*key);
    }

    let mut last = None;
    for _ in 0..frames {
        last = Some(scene.update(dt, &input, &mut renderer)?);
    }

    let entities = scene
        .store()
        .view::<(Tag, Transform)>()
        .map(|(handle, (tag, transform))| EntityReport {
            handle: handle.index(),
            tag: tag.as_str().to_owned(),
            position: transform.position.to_array(),
        })
        .collect();

    Ok(SimulationReport {
        frames,
        draws: last.map_or(0, |s| s.draws),
        submissions: last.map_or(0, |s| s.submissions),
        physics_steps: scene.physics().map_or(0, |p| p.steps()),
        camera: scene.camera().position.to_array(),
        entities,
    })
}

fn load_model(path: &Path) -> Result<MeshData> {
    let model = obj::load(path).with_context(|| format!("loading model {}", path.display()))?;
    tracing::debug!(vertices = model.vertices.len(), faces = model.faces.len(), "loaded model");
    Ok(model.to_mesh_data())
}

fn print_obj_summary(path: &Path) -> Result<()> {
    let model = obj::load(path).with_context(|| format!("loading {}", path.display()))?;
    println!("{}", path.display());
    println!("  vertices:  {}", model.vertices.len());
    println!("  uvs:       {}", model.uvs.len());
    println!("  normals:   {}", model.normals.len());
    println!("  faces:     {}", model.faces.len());
    println!("  triangles: {}", model.triangle_count());
    if let Some((min, max)) = model.to_mesh_data().bounds() {
        println!("  bounds:    {min} .. {max}");
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("ember-cli v{}", env!("CARGO_PKG_VERSION"));
            print!("{}", config.to_yaml()?);
        }
        Commands::Simulate {
            frames,
            dt,
            hold,
            model,
            json,
        } => {
            let model = model.as_deref().map(load_model).transpose()?;
            let report = simulate(&config, frames, dt, &hold, model)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "frames={} steps={} draws/frame={} submissions/frame={}",
                    report.frames, report.physics_steps, report.draws, report.submissions
                );
                let [x, y, z] = report.camera;
                println!("camera: ({x:.3}, {y:.3}, {z:.3})");
                for e in &report.entities {
                    let [x, y, z] = e.position;
                    println!("#{} {:<10} ({x:.3}, {y:.3}, {z:.3})", e.handle, e.tag);
                }
            }
        }
        Commands::Obj { path } => print_obj_summary(&path)?,
    }

    Ok(())
}

mod script;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use walkroom_assets::TextureStore;
use walkroom_locomotion::{Locomotion, RoomBounds};
use walkroom_render::{DebugTextRenderer, FirstPersonCamera, RenderView, Renderer};
use walkroom_scene::{AssetPaths, build_room};

#[derive(Parser)]
#[command(name = "walkroom-cli", about = "CLI tool for the walkable room")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Build the room and print it
    Scene {
        /// Texture directory; missing files become placeholders
        #[arg(long, default_value = "./assets")]
        assets: PathBuf,
        /// Print the scene as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Replay a scripted walk through the locomotion model
    Walk {
        /// Held keys per frame, e.g. "w*30,wd*10,*20" (see `walk --help`)
        #[arg(short, long)]
        keys: String,
        /// Total frames to run; frames past the script hold no keys
        #[arg(short, long)]
        frames: Option<usize>,
        /// Seconds per frame
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,
        /// Print every Nth frame (0 prints only the last)
        #[arg(long, default_value_t = 0)]
        every: usize,
        /// Texture directory; missing files become placeholders
        #[arg(long, default_value = "./assets")]
        assets: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("walkroom-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("locomotion: {}", walkroom_locomotion::crate_info());
            println!(
                "  damping={} acceleration={} bounds={:?}",
                walkroom_locomotion::DAMPING,
                walkroom_locomotion::ACCELERATION,
                RoomBounds::ROOM
            );
            println!("input: {}", walkroom_input::crate_info());
            println!("assets: {}", walkroom_assets::crate_info());
            println!("scene: {}", walkroom_scene::crate_info());
            println!("render: {}", walkroom_render::crate_info());
        }
        Commands::Scene { assets, json } => {
            let mut textures = TextureStore::new();
            let scene = build_room(&mut textures, &AssetPaths::in_dir(&assets));
            tracing::info!(
                "built room from {}: {} objects, {} textures",
                assets.display(),
                scene.len(),
                textures.len()
            );
            if json {
                let out = serde_json::to_string_pretty(&scene)
                    .context("failed to serialize scene")?;
                println!("{out}");
            } else {
                let view = RenderView::from_camera(&FirstPersonCamera::default());
                print!("{}", DebugTextRenderer::new().render(&scene, &view));
                println!("textures: {}", textures.len());
            }
        }
        Commands::Walk {
            keys,
            frames,
            dt,
            every,
            assets,
        } => {
            let script = script::parse(&keys).context("invalid key script")?;
            let total = frames.unwrap_or(script.len());
            tracing::info!("script has {} frames, running {total}", script.len());

            let mut textures = TextureStore::new();
            let scene = build_room(&mut textures, &AssetPaths::in_dir(&assets));
            let mut camera = FirstPersonCamera::default();
            let mut locomotion = Locomotion::new();
            let renderer = DebugTextRenderer::new();

            println!("Walk: {total} frames at dt={dt}");
            for frame in 0..total {
                let intent = script.get(frame).copied().unwrap_or_default();
                locomotion.update(dt, &intent, &mut camera, &RoomBounds::ROOM);
                tracing::debug!(frame, ?intent, position = ?camera.position, "walk step");

                let last = frame + 1 == total;
                if last || (every > 0 && frame % every == 0) {
                    let v = locomotion.velocity();
                    println!("--- frame {frame} velocity=({:.3}, {:.3}) ---", v.x, v.z);
                    print!(
                        "{}",
                        renderer.render(&scene, &RenderView::from_camera(&camera))
                    );
                }
            }
        }
    }

    Ok(())
}

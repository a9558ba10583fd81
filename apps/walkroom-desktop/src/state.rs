use crate::swap::{DecodedMedia, MediaSwapper};
use egui::Context as EguiContext;
use glam::Vec2;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use walkroom_assets::TextureStore;
use walkroom_input::InputMapper;
use walkroom_locomotion::{Intent, Locomotion, RoomBounds};
use walkroom_render::FirstPersonCamera;
use walkroom_scene::{AssetPaths, MediaTarget, Ray, Scene, SceneEvent, build_room};

/// Everything the frame loop owns apart from the GPU.
pub struct AppState {
    pub scene: Scene,
    pub textures: TextureStore,
    pub camera: FirstPersonCamera,
    pub locomotion: Locomotion,
    pub intent: Intent,
    pub mapper: InputMapper,
    pub show_hud: bool,
    pub assets_dir: PathBuf,
    /// Last known cursor position in window pixels.
    pub cursor: Option<Vec2>,
    last_frame: Instant,
    started: Instant,
    swapper: MediaSwapper,
}

impl AppState {
    pub fn new(assets_dir: PathBuf) -> Self {
        let mut textures = TextureStore::new();
        let scene = build_room(&mut textures, &AssetPaths::in_dir(&assets_dir));
        tracing::info!(
            "room built: {} objects, {} textures",
            scene.len(),
            textures.len()
        );

        let now = Instant::now();
        Self {
            scene,
            textures,
            camera: FirstPersonCamera::default(),
            locomotion: Locomotion::new(),
            intent: Intent::new(),
            mapper: InputMapper::new(),
            show_hud: true,
            assets_dir,
            cursor: None,
            last_frame: now,
            started: now,
            swapper: MediaSwapper::new(),
        }
    }

    /// Time since the app started; drives animated textures and water.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Seconds since the previous frame.
    ///
    /// Not capped: locomotion damping already saturates on long frames.
    pub fn frame_delta(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        dt
    }

    /// One frame of simulation. Returns the scene changes the renderer has
    /// to pick up.
    pub fn update(&mut self, dt: f32) -> Vec<SceneEvent> {
        self.locomotion
            .update(dt, &self.intent, &mut self.camera, &RoomBounds::ROOM);

        for decoded in self.swapper.poll() {
            self.apply_decoded(decoded);
        }
        self.scene.drain_events()
    }

    /// The media plane under `ndc`, if any.
    pub fn target_at(&self, ndc: Vec2) -> Option<MediaTarget> {
        let ray = Ray::from_ndc(ndc, self.camera.inverse_view_projection());
        self.scene.pick_media(&ray)
    }

    pub fn request_swap(&mut self, target: MediaTarget, path: PathBuf) {
        tracing::info!("loading {} for {}", path.display(), target.kind);
        self.swapper.request(target, path);
    }

    /// Forget held keys, e.g. when focus is lost and key releases would be
    /// missed.
    pub fn release_all(&mut self) {
        self.intent.clear();
    }

    fn apply_decoded(&mut self, decoded: DecodedMedia) {
        let DecodedMedia {
            target,
            path,
            result,
        } = decoded;
        let asset = match result {
            Ok(asset) => asset,
            Err(e) => {
                tracing::warn!("could not load {}: {e}", path.display());
                return;
            }
        };
        let id = self.textures.insert(asset);
        match self.scene.swap_media(target.object, id) {
            Ok(old) => {
                tracing::info!(
                    "{} {} now shows {} (was {old})",
                    target.kind,
                    target.object,
                    path.display()
                );
                if !self.scene.textures_in_use().contains(&old) {
                    self.textures.remove(old);
                }
            }
            Err(e) => {
                tracing::error!("texture swap failed: {e}");
                if !self.scene.textures_in_use().contains(&id) {
                    self.textures.remove(id);
                }
            }
        }
    }

    pub fn draw_ui(&mut self, ctx: &EguiContext) {
        if self.mapper.pointer_locked() {
            let painter = ctx.layer_painter(egui::LayerId::new(
                egui::Order::Foreground,
                egui::Id::new("crosshair"),
            ));
            let c = ctx.screen_rect().center();
            let stroke = egui::Stroke::new(2.0, egui::Color32::WHITE);
            painter.line_segment([c - egui::vec2(8.0, 0.0), c + egui::vec2(8.0, 0.0)], stroke);
            painter.line_segment([c - egui::vec2(0.0, 8.0), c + egui::vec2(0.0, 8.0)], stroke);
        }

        if !self.show_hud {
            return;
        }

        egui::Window::new("Walkroom")
            .anchor(egui::Align2::LEFT_TOP, [8.0, 8.0])
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                let p = self.camera.position;
                let v = self.locomotion.velocity();
                ui.label(format!("Position: ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z));
                ui.label(format!(
                    "Velocity: ({:.2}, {:.2})  speed {:.2}",
                    v.x,
                    v.z,
                    self.locomotion.speed()
                ));
                if self.swapper.pending() > 0 {
                    ui.label(format!("Loading {} file(s)...", self.swapper.pending()));
                }
                ui.separator();
                ui.small("WASD / arrows: move | Mouse: look");
                ui.small("Click image or video: replace it");
                ui.small("Esc: release pointer | F1: toggle HUD");
            });
    }
}

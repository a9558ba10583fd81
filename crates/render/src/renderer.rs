use glam::Vec3;
use walkroom_scene::{Material, Scene};

use crate::camera::FirstPersonCamera;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self::from_camera(&FirstPersonCamera::default())
    }
}

impl RenderView {
    pub fn from_camera(camera: &FirstPersonCamera) -> Self {
        Self {
            eye: camera.position,
            target: camera.position + camera.forward(),
            fov_degrees: camera.fov.to_degrees(),
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene and a view, then produces output. It never
/// mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene and view.
    fn render(&self, scene: &Scene, view: &RenderView) -> Self::Output;
}

/// Human-readable dump of the scene as seen from a view.
///
/// Used by the CLI and in tests, where no GPU is available.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, view: &RenderView) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== Room (objects={}) ===\n", scene.len()));
        out.push_str(&format!(
            "Camera: eye=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) fov={:.0}\n",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        ));

        for obj in scene.objects() {
            let p = obj.transform.position;
            let surface = match obj.material {
                Material::Textured { texture, .. } => format!("texture={texture}"),
                Material::Water(_) => "water".to_string(),
            };
            out.push_str(&format!(
                "  [{}] {:?} pos=({:.2}, {:.2}, {:.2}) size={:.1}x{:.1} {}\n",
                obj.id, obj.kind, p.x, p.y, p.z, obj.quad.width, obj.quad.height, surface
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use walkroom_assets::TextureId;
    use walkroom_common::Transform;
    use walkroom_scene::{ObjectKind, Quad, Side};

    #[test]
    fn debug_renderer_empty_scene() {
        let scene = Scene::new([0.0; 3]);
        let output = DebugTextRenderer::new().render(&scene, &RenderView::default());
        assert!(output.contains("objects=0"));
        assert!(output.contains("fov=75"));
    }

    #[test]
    fn debug_renderer_lists_objects() {
        let mut scene = Scene::new([0.0; 3]);
        scene.insert(
            ObjectKind::ImagePlane,
            Transform::from_position(Vec3::new(0.0, 0.0, 9.9)),
            Quad::new(5.0, 3.0),
            Material::textured(TextureId(0xabc), Side::Double),
        );
        let output = DebugTextRenderer::new().render(&scene, &RenderView::default());
        assert!(output.contains("objects=1"));
        assert!(output.contains("[#0] ImagePlane pos=(0.00, 0.00, 9.90) size=5.0x3.0"));
        assert!(output.contains("texture=0000000000000abc"));
    }

    #[test]
    fn view_follows_camera() {
        let mut cam = FirstPersonCamera::default();
        cam.position = Vec3::new(1.0, 0.0, 2.0);
        let view = RenderView::from_camera(&cam);
        assert_eq!(view.eye, cam.position);
        assert!((view.target - Vec3::new(1.0, 0.0, 1.0)).length() < 1e-5);
    }
}

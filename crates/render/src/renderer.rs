use crate::camera::{Camera, Surface};
use glam::Vec3;
use std::collections::BTreeMap;
use std::fmt::Write;
use tickscene_common::MeshHandle;

/// Geometry of a renderable object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeshDesc {
    Sphere { radius: f32 },
    Cuboid { half_extents: Vec3 },
}

/// Renderer-agnostic service interface. All renderers implement this trait.
///
/// The renderer owns one scene and one camera. The scene core pushes poses
/// in and asks for a frame; it never reads anything back except handles.
pub trait RenderService {
    /// Add an object to the scene at `position`.
    fn create_mesh(&mut self, desc: MeshDesc, position: Vec3) -> MeshHandle;

    fn set_object_pose(&mut self, mesh: MeshHandle, position: Vec3);

    fn set_camera_pose(&mut self, eye: Vec3, target: Vec3);

    /// Window resize: updates camera aspect and surface dimensions.
    fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32);

    /// Draw one frame.
    fn render(&mut self);
}

#[derive(Debug, Clone, Copy)]
struct MeshState {
    desc: MeshDesc,
    position: Vec3,
}

/// Text renderer standing in for a GPU backend.
///
/// Produces a human-readable description of each frame. Useful for CLI
/// output, logging, and testing the systems that drive the renderer.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    meshes: BTreeMap<MeshHandle, MeshState>,
    camera: Camera,
    surface: Surface,
    next_handle: u64,
    frames: u64,
    last_frame: String,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_camera(camera: Camera) -> Self {
        Self {
            camera,
            ..Self::default()
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Number of frames rendered.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Text of the most recent frame; empty before the first `render`.
    pub fn last_frame(&self) -> &str {
        &self.last_frame
    }

    pub fn mesh_position(&self, mesh: MeshHandle) -> Option<Vec3> {
        self.meshes.get(&mesh).map(|m| m.position)
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }
}

impl RenderService for DebugTextRenderer {
    fn create_mesh(&mut self, desc: MeshDesc, position: Vec3) -> MeshHandle {
        let handle = MeshHandle(self.next_handle);
        self.next_handle += 1;
        self.meshes.insert(handle, MeshState { desc, position });
        handle
    }

    fn set_object_pose(&mut self, mesh: MeshHandle, position: Vec3) {
        match self.meshes.get_mut(&mesh) {
            Some(state) => state.position = position,
            None => tracing::warn!(?mesh, "pose update for unknown mesh"),
        }
    }

    fn set_camera_pose(&mut self, eye: Vec3, target: Vec3) {
        self.camera.look_at(eye, target);
    }

    fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32) {
        let surface = Surface::new(width, height, pixel_ratio);
        if let Some(aspect) = surface.aspect() {
            self.camera.aspect = aspect;
        }
        self.surface = surface;
        tracing::debug!(width, height, pixel_ratio = surface.pixel_ratio, "surface resized");
    }

    fn render(&mut self) {
        self.frames += 1;
        let c = &self.camera;
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "=== Frame {} ({}x{} @{:.1}) ===",
            self.frames, self.surface.width, self.surface.height, self.surface.pixel_ratio
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0} aspect={:.2}",
            c.eye.x, c.eye.y, c.eye.z, c.target.x, c.target.y, c.target.z, c.fov_degrees, c.aspect
        );
        for (handle, mesh) in &self.meshes {
            let p = mesh.position;
            let shape = match mesh.desc {
                MeshDesc::Sphere { .. } => "sphere",
                MeshDesc::Cuboid { .. } => "cuboid",
            };
            let _ = writeln!(
                out,
                "  [mesh {}] {shape} pos=({:.2}, {:.2}, {:.2})",
                handle.0, p.x, p.y, p.z
            );
        }
        self.last_frame = out;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_renderer_empty_scene() {
        let mut renderer = DebugTextRenderer::new();
        assert_eq!(renderer.last_frame(), "");
        renderer.render();
        assert!(renderer.last_frame().contains("Frame 1"));
        assert_eq!(renderer.frames(), 1);
    }

    #[test]
    fn debug_renderer_with_meshes() {
        let mut renderer = DebugTextRenderer::new();
        let a = renderer.create_mesh(MeshDesc::Sphere { radius: 0.5 }, Vec3::new(0.0, 6.0, 0.0));
        renderer.create_mesh(
            MeshDesc::Cuboid {
                half_extents: Vec3::ONE,
            },
            Vec3::ZERO,
        );
        renderer.set_object_pose(a, Vec3::new(1.0, 2.0, 3.0));
        renderer.render();

        let frame = renderer.last_frame();
        assert!(frame.contains("sphere pos=(1.00, 2.00, 3.00)"));
        assert!(frame.contains("cuboid"));
        assert_eq!(renderer.mesh_count(), 2);
    }

    #[test]
    fn unknown_mesh_pose_is_ignored() {
        let mut renderer = DebugTextRenderer::new();
        renderer.set_object_pose(MeshHandle(7), Vec3::ONE);
        assert_eq!(renderer.mesh_position(MeshHandle(7)), None);
    }

    #[test]
    fn resize_updates_aspect_and_surface() {
        let mut renderer = DebugTextRenderer::new();
        renderer.resize(1000, 500, 1.5);
        assert_eq!(renderer.camera().aspect, 2.0);
        assert_eq!(renderer.surface().width, 1000);
        assert_eq!(renderer.surface().pixel_ratio, 1.5);

        // degenerate surface keeps the previous aspect
        renderer.resize(1000, 0, 1.0);
        assert_eq!(renderer.camera().aspect, 2.0);
        assert_eq!(renderer.surface().height, 0);
    }

    #[test]
    fn camera_pose_is_recorded() {
        let mut renderer = DebugTextRenderer::new();
        renderer.set_camera_pose(Vec3::new(6.0, 6.0, 6.0), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(renderer.camera().target, Vec3::new(0.0, 1.0, 0.0));
        renderer.render();
        assert!(renderer.last_frame().contains("eye=(6.0, 6.0, 6.0)"));
    }
}

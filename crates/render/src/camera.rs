use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Upper bound applied to the device pixel ratio on resize.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Perspective camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_degrees: f32,
    /// Width over height of the drawing surface.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(6.0, 6.0, 6.0),
            target: Vec3::ZERO,
            fov_degrees: 75.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Camera {
    pub fn look_at(&mut self, eye: Vec3, target: Vec3) {
        self.eye = eye;
        self.target = target;
    }

    /// Unit vector from eye to target, or zero if they coincide.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or_zero()
    }
}

/// Drawing surface dimensions in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f32,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            pixel_ratio: 1.0,
        }
    }
}

impl Surface {
    pub fn new(width: u32, height: u32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio: pixel_ratio.clamp(f32::MIN_POSITIVE, MAX_PIXEL_RATIO),
        }
    }

    /// Width over height; `None` for a degenerate (zero-height) surface.
    pub fn aspect(&self) -> Option<f32> {
        (self.height > 0).then(|| self.width as f32 / self.height as f32)
    }

    /// Size of the backing buffer in physical pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        (
            (self.width as f32 * self.pixel_ratio).round() as u32,
            (self.height as f32 * self.pixel_ratio).round() as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_default() {
        let c = Camera::default();
        assert_eq!(c.fov_degrees, 75.0);
        assert_eq!(c.target, Vec3::ZERO);
        assert_eq!(c.near, 0.1);
        assert_eq!(c.far, 100.0);
    }

    #[test]
    fn forward_points_at_target() {
        let mut c = Camera::default();
        c.look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        assert_eq!(c.forward(), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn pixel_ratio_is_clamped() {
        let s = Surface::new(800, 600, 3.0);
        assert_eq!(s.pixel_ratio, MAX_PIXEL_RATIO);
        assert_eq!(s.physical_size(), (1600, 1200));
    }

    #[test]
    fn zero_height_has_no_aspect() {
        assert_eq!(Surface::new(800, 0, 1.0).aspect(), None);
        assert_eq!(Surface::new(800, 400, 1.0).aspect(), Some(2.0));
    }
}

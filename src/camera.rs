// src/camera.rs
// Drag-driven orbit rotator: maps accumulated pointer drag to a view rotation
// RELEVANT FILES:src/viewer/mod.rs,src/transforms.rs

use std::f32::consts::PI;

use glam::Mat4;

/// Orbit rotator state, updated by pointer-drag events the viewer forwards.
///
/// Produces a rotation-only view matrix; the transform pipeline applies its
/// own fixed push-back translation, so no camera distance lives here.
#[derive(Debug, Clone)]
pub struct OrbitRotator {
    yaw: f32,
    pitch: f32,
    sensitivity: f32,
    dragging: bool,
    last_cursor: Option<(f32, f32)>,
}

impl OrbitRotator {
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            sensitivity: 0.005,
            dragging: false,
            last_cursor: None,
        }
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
        if !dragging {
            self.last_cursor = None;
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Forward a cursor position; applies the delta while a drag is active.
    pub fn handle_cursor(&mut self, x: f32, y: f32) {
        if self.dragging {
            if let Some((last_x, last_y)) = self.last_cursor {
                self.yaw += (x - last_x) * self.sensitivity;
                self.pitch = (self.pitch + (y - last_y) * self.sensitivity)
                    .clamp(-PI / 2.0 + 0.01, PI / 2.0 - 0.01);
            }
        }
        self.last_cursor = Some((x, y));
    }

    /// Accumulated drag rotation as a 4x4 view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_x(self.pitch) * Mat4::from_rotation_y(self.yaw)
    }
}

impl Default for OrbitRotator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn view_matrix_is_rotation_only() {
        let mut rotator = OrbitRotator::new();
        rotator.set_dragging(true);
        rotator.handle_cursor(0.0, 0.0);
        rotator.handle_cursor(35.0, -12.0);
        let m = rotator.view_matrix();
        // no translation component
        assert_eq!(m * Vec4::new(0.0, 0.0, 0.0, 1.0), Vec4::new(0.0, 0.0, 0.0, 1.0));
        // rigid: determinant 1
        assert!((m.determinant() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn cursor_moves_without_drag_do_not_rotate() {
        let mut rotator = OrbitRotator::new();
        rotator.handle_cursor(10.0, 10.0);
        rotator.handle_cursor(300.0, 300.0);
        assert_eq!(rotator.view_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn pitch_is_clamped_short_of_the_poles() {
        let mut rotator = OrbitRotator::new();
        rotator.set_dragging(true);
        rotator.handle_cursor(0.0, 0.0);
        rotator.handle_cursor(0.0, 1e6);
        assert!(rotator.pitch < PI / 2.0);
    }
}

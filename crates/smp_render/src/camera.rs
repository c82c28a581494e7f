use glam::{Mat4, Vec2};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Orthographic camera over y-down world space, one world unit per pixel.
/// `position` is the world point shown at the center of the viewport.
pub struct Camera2D {
    pub position: Vec2,
    pub viewport: (u32, u32),
}

impl Camera2D {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            position: Vec2::new(viewport_width as f32 * 0.5, viewport_height as f32 * 0.5),
            viewport: (viewport_width, viewport_height),
        }
    }

    pub fn half_extent(&self) -> Vec2 {
        Vec2::new(self.viewport.0 as f32 * 0.5, self.viewport.1 as f32 * 0.5)
    }

    pub fn projection(&self) -> Mat4 {
        let half = self.half_extent();
        // Bottom/top swapped relative to a y-up camera so larger world y
        // lands lower on screen.
        Mat4::orthographic_rh(
            self.position.x - half.x,
            self.position.x + half.x,
            self.position.y + half.y,
            self.position.y - half.y,
            -1.0,
            1.0,
        )
    }

    pub fn build_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.projection().to_cols_array_2d(),
        }
    }
}

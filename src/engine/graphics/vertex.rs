use glam::Vec2;
use wgpu;

use crate::game::controller::FrameSnapshot;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: &[wgpu::VertexAttribute] = &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            wgpu::VertexAttribute {
                offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x2,
            },
        ];

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: ATTRIBUTES,
        }
    }
}

// Unit quad, top-left origin, y down (same as screen and texture space)
pub const QUAD_VERTICES: &[Vertex] = &[
    Vertex { position: [0.0, 0.0], tex_coords: [0.0, 0.0] }, // top-left
    Vertex { position: [1.0, 0.0], tex_coords: [1.0, 0.0] }, // top-right
    Vertex { position: [1.0, 1.0], tex_coords: [1.0, 1.0] }, // bottom-right
    Vertex { position: [0.0, 1.0], tex_coords: [0.0, 1.0] }, // bottom-left
];

pub const QUAD_INDICES: &[u16] = &[0, 1, 2, 2, 3, 0];

/// Where the icon quad lands, in logical pixels
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct IconUniforms {
    /// x, y, width, height of the scaled icon
    pub rect: [f32; 4],
    pub screen: [f32; 2],
    pub _padding: [f32; 2],
}

impl IconUniforms {
    /// Scale the icon about its center
    pub fn from_frame(frame: &FrameSnapshot, screen: Vec2) -> Self {
        let size = frame.icon_size * frame.scale;
        let offset = (frame.icon_size - size) * 0.5;
        Self {
            rect: [
                frame.position.x + offset,
                frame.position.y + offset,
                size,
                size,
            ],
            screen: [screen.x.max(1.0), screen.y.max(1.0)],
            _padding: [0.0; 2],
        }
    }

    /// CPU mirror of the vertex shader: quad-space corner to NDC
    pub fn to_ndc(&self, corner: Vec2) -> Vec2 {
        let px = Vec2::new(self.rect[0], self.rect[1]) + corner * Vec2::new(self.rect[2], self.rect[3]);
        Vec2::new(
            px.x / self.screen[0] * 2.0 - 1.0,
            1.0 - px.y / self.screen[1] * 2.0,
        )
    }
}

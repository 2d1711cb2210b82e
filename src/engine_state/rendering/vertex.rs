//! Vertex data structures and layouts for voxel rendering.
//!
//! This module defines the vertex format emitted by the mesher, the growable
//! [`VertexBuffer`] each chunk keeps its mesh in, and the GPU layout the render
//! pipelines are built with.

/// A vertex in the voxel rendering pipeline.
///
/// Positions are chunk-local; the renderer applies the chunk's world offset.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
/// - Color: 4x u8 (4 bytes)
///
/// Total size: 24 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Chunk-local position
    pub position: [f32; 3],
    /// Atlas texture coordinates (normalized 0.0-1.0)
    pub uv: [f32; 2],
    /// Light-modulated RGBA color
    pub color: [u8; 4],
}

impl Vertex {
    /// Returns the vertex buffer layout description for the shader pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec3<f32>)
    /// - `location = 1`: uv (vec2<f32>)
    /// - `location = 2`: color (vec4<f32>, normalized from u8)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Unorm8x4,
                },
            ],
        }
    }
}

/// Append-only vertex storage that doubles its capacity on overflow.
///
/// `make_room` is the only way to add vertices. Clearing keeps the allocation so
/// remeshing a chunk does not churn the allocator.
#[derive(Debug, Default)]
pub struct VertexBuffer {
    /// Backing storage; its length is the buffer's capacity.
    elements: Vec<Vertex>,
    /// Number of vertices in use.
    used: usize,
}

impl VertexBuffer {
    /// Creates an empty buffer with no allocation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves `count` more vertices and returns them for writing.
    ///
    /// Capacity starts at 1 and doubles until the request fits.
    pub fn make_room(&mut self, count: usize) -> &mut [Vertex] {
        if self.used + count > self.elements.len() {
            let mut capacity = self.elements.len().max(1);
            while self.used + count > capacity {
                capacity *= 2;
            }
            self.elements.resize(capacity, Vertex::default());
        }
        self.used += count;
        &mut self.elements[self.used - count..self.used]
    }

    /// Logically empties the buffer, keeping its storage.
    pub fn clear(&mut self) {
        self.used = 0;
    }

    /// Number of vertices in use.
    pub fn len(&self) -> usize {
        self.used
    }

    /// Whether no vertices are in use.
    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Allocated capacity in vertices.
    pub fn capacity(&self) -> usize {
        self.elements.len()
    }

    /// The vertices in use.
    pub fn as_slice(&self) -> &[Vertex] {
        &self.elements[..self.used]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_doubles_from_one() {
        let mut buffer = VertexBuffer::new();
        assert_eq!(buffer.capacity(), 0);

        buffer.make_room(1);
        assert_eq!(buffer.capacity(), 1);

        buffer.make_room(6);
        assert_eq!(buffer.len(), 7);
        assert_eq!(buffer.capacity(), 8);

        buffer.make_room(6);
        assert_eq!(buffer.len(), 13);
        assert_eq!(buffer.capacity(), 16);
    }

    #[test]
    fn make_room_returns_the_new_tail() {
        let mut buffer = VertexBuffer::new();
        buffer.make_room(2)[1].position = [1.0, 2.0, 3.0];
        let tail = buffer.make_room(3);
        assert_eq!(tail.len(), 3);
        tail[0].uv = [0.5, 0.25];

        let vertices = buffer.as_slice();
        assert_eq!(vertices[1].position, [1.0, 2.0, 3.0]);
        assert_eq!(vertices[2].uv, [0.5, 0.25]);
    }

    #[test]
    fn clear_keeps_storage() {
        let mut buffer = VertexBuffer::new();
        buffer.make_room(12);
        let capacity = buffer.capacity();
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), capacity);
        assert!(buffer.as_slice().is_empty());
    }

    #[test]
    fn layout_matches_vertex_size() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        assert_eq!(Vertex::desc().array_stride, 24);
        assert_eq!(Vertex::desc().attributes.len(), 3);
    }
}

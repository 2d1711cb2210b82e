use crate::engine_state::voxels::block::block_side::BlockSide;

/// Number of atlas cells along each axis of the block texture atlas.
pub const ATLAS_CELLS: f32 = 16.0;

/// Vertices emitted per visible face (two triangles).
pub const VERTICES_PER_FACE: usize = 6;

/// Unit-cube corner offsets for each face, two counter-clockwise triangles per face.
///
/// Indexed by [`BlockSide`] id. The corner order pairs with [`face_uvs`].
const CUBE_VERTICES: [[[f32; 3]; VERTICES_PER_FACE]; 6] = [
    // LEFT (-X)
    [
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0],
        [0.0, 0.0, 1.0],
        [0.0, 0.0, 1.0],
        [0.0, 1.0, 1.0],
        [0.0, 1.0, 0.0],
    ],
    // RIGHT (+X)
    [
        [1.0, 1.0, 1.0],
        [1.0, 0.0, 1.0],
        [1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [1.0, 1.0, 1.0],
    ],
    // BOTTOM (-Y)
    [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 0.0, 1.0],
        [1.0, 0.0, 1.0],
        [0.0, 0.0, 1.0],
        [0.0, 0.0, 0.0],
    ],
    // TOP (+Y)
    [
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 1.0, 1.0],
        [0.0, 1.0, 1.0],
        [1.0, 1.0, 1.0],
        [1.0, 1.0, 0.0],
    ],
    // BACK (-Z)
    [
        [1.0, 1.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 0.0, 0.0],
        [0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [1.0, 1.0, 0.0],
    ],
    // FRONT (+Z)
    [
        [0.0, 1.0, 1.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 1.0],
        [1.0, 0.0, 1.0],
        [1.0, 1.0, 1.0],
        [0.0, 1.0, 1.0],
    ],
];

/// Directional shading per face: sides darker than the top, bottom darkest.
pub const FACE_AMBIENT: [f32; 6] = [0.6, 0.6, 0.5, 1.0, 0.8, 0.8];

/// Corner offsets of one face of a unit cube.
pub fn face_vertices(side: BlockSide) -> &'static [[f32; 3]; VERTICES_PER_FACE] {
    &CUBE_VERTICES[side as usize]
}

/// Texture coordinates of the six face vertices for atlas cell `(column, row)`.
///
/// Row 0 is the top of the atlas image, so the V axis is flipped relative to
/// texture space.
pub fn face_uvs(cell: [u8; 2]) -> [[f32; 2]; VERTICES_PER_FACE] {
    let w = 1.0 / ATLAS_CELLS;
    let top_left = [w * cell[0] as f32, w * (ATLAS_CELLS - cell[1] as f32)];
    let bottom_left = [top_left[0], top_left[1] - w];
    let bottom_right = [top_left[0] + w, bottom_left[1]];
    let top_right = [bottom_right[0], top_left[1]];
    [
        top_left,
        bottom_left,
        bottom_right,
        bottom_right,
        top_right,
        top_left,
    ]
}

//! Column-major 4x4 matrix helpers for the sheet transform.
//! Just the handful of constructions the renderer needs; no math crate.

pub type Mat4 = [[f32; 4]; 4];

pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

pub fn radians(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}

pub fn translation(x: f32, y: f32, z: f32) -> Mat4 {
    [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [x, y, z, 1.0],
    ]
}

/// Right-handed perspective projection with 0..1 depth.
pub fn perspective_rh(fovy_radians: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let y = 1.0 / (fovy_radians * 0.5).tan();
    let x = y / aspect;
    let z = far / (near - far);
    [
        [x, 0.0, 0.0, 0.0],
        [0.0, y, 0.0, 0.0],
        [0.0, 0.0, z, -1.0],
        [0.0, 0.0, z * near, 0.0],
    ]
}

/// `a * b`, both column-major.
pub fn multiply(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut out = [[0.0f32; 4]; 4];
    for (col, b_col) in b.iter().enumerate() {
        for row in 0..4 {
            out[col][row] = a[0][row] * b_col[0]
                + a[1][row] * b_col[1]
                + a[2][row] * b_col[2]
                + a[3][row] * b_col[3];
        }
    }
    out
}

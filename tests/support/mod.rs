//! Test support library
//! Provides fixtures & helper functions shared by the integration tests.
#![allow(dead_code)]

use meshprep::{
    float_types::Real,
    math::face_normal,
    mesh::{MeshData, VertexAttributes},
};
use nalgebra::{Point3, Vector3};

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

pub fn vec_approx_eq(a: &Vector3<Real>, b: &Vector3<Real>, eps: Real) -> bool {
    (a - b).norm() < eps
}

/// Route `log` output to the test harness. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Corners of the unit cube; bit 0 is x, bit 1 is y, bit 2 is z.
pub fn cube_corners() -> Vec<Point3<Real>> {
    (0..8)
        .map(|i| {
            Point3::new(
                (i & 1) as Real,
                ((i >> 1) & 1) as Real,
                ((i >> 2) & 1) as Real,
            )
        })
        .collect()
}

/// Counter-clockwise quads of the unit cube seen from outside, in the order
/// -X, +X, -Y, +Y, -Z, +Z.
pub const CUBE_FACES: [[usize; 4]; 6] = [
    [0, 4, 6, 2],
    [1, 3, 7, 5],
    [0, 1, 5, 4],
    [2, 6, 7, 3],
    [0, 2, 3, 1],
    [4, 5, 7, 6],
];

pub fn cube_face_normals() -> [Vector3<Real>; 6] {
    [
        -Vector3::x(),
        Vector3::x(),
        -Vector3::y(),
        Vector3::y(),
        -Vector3::z(),
        Vector3::z(),
    ]
}

/// 36 corner indices into [`cube_corners`], two triangles per face.
pub fn cube_indices() -> Vec<usize> {
    CUBE_FACES
        .iter()
        .flat_map(|&[a, b, c, d]| [a, b, c, a, c, d])
        .collect()
}

/// Indexed unit cube: 8 shared corners, 12 triangles.
pub fn indexed_cube() -> MeshData {
    MeshData::new(VertexAttributes::new(cube_corners())).with_indices(cube_indices())
}

/// Unit cube as triangle soup: 36 vertices, three per triangle, each carrying
/// its face normal.
pub fn soup_cube() -> MeshData {
    let corners = cube_corners();
    let face_normals = cube_face_normals();
    let positions: Vec<Point3<Real>> = cube_indices().iter().map(|&i| corners[i]).collect();
    let normals: Vec<Vector3<Real>> = (0..positions.len())
        .map(|corner| face_normals[corner / 6])
        .collect();
    MeshData::new(VertexAttributes::new(positions).with_normals(normals))
}

/// Two triangles sharing the edge 1-2, the second folded about it by `fold`
/// radians. The angle between the two face normals equals `fold`.
pub fn hinge(fold: Real) -> MeshData {
    let (s, c) = fold.sin_cos();
    let half_diagonal = (0.5 as Real).sqrt();
    MeshData::new(VertexAttributes::new(vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.5 + 0.5 * c, 0.5 + 0.5 * c, half_diagonal * s),
    ]))
    .with_indices(vec![0, 1, 2, 2, 1, 3])
}

/// Face normal of triangle `t` of an indexed mesh.
pub fn triangle_normal(mesh: &MeshData, t: usize) -> Vector3<Real> {
    let indices = mesh.indices_or_sequential();
    let p = &mesh.attributes.positions;
    face_normal(
        &p[indices[t * 3]],
        &p[indices[t * 3 + 1]],
        &p[indices[t * 3 + 2]],
    )
}

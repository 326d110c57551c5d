#![cfg(feature = "stl-io")]

mod support;

use meshprep::{
    dedup::{MatchConditions, minimize_verts_with},
    float_types::degrees,
    mesh::MeshData,
    normals::NormalGenerator,
};
use support::*;

#[test]
fn cube_to_stl_ascii() {
    let stl_str = indexed_cube().to_stl_ascii("test_cube").expect("triangle list");
    assert!(stl_str.contains("solid test_cube"));
    assert!(stl_str.contains("endsolid test_cube"));
    assert_eq!(stl_str.matches("facet normal").count(), 12);
    assert_eq!(stl_str.matches("vertex").count(), 36);
}

#[test]
fn binary_round_trip_reads_back_soup() -> Result<(), Box<dyn std::error::Error>> {
    let bytes = indexed_cube().to_stl_binary()?;
    let soup = MeshData::from_stl(&bytes)?;

    assert!(!soup.is_indexed());
    assert_eq!(soup.vertex_count(), 36);
    let normals = soup.attributes.normals.as_ref().expect("facet normals");
    let face_normals = cube_face_normals();
    for (corner, n) in normals.iter().enumerate() {
        assert!(vec_approx_eq(n, &face_normals[corner / 6], 1e-6));
    }
    Ok(())
}

#[test]
fn ascii_stl_is_read_too() -> Result<(), Box<dyn std::error::Error>> {
    let ascii = indexed_cube().to_stl_ascii("cube")?;
    let soup = MeshData::from_stl(ascii.as_bytes())?;
    assert_eq!(soup.vertex_count(), 36);
    Ok(())
}

#[test]
fn imported_soup_welds_and_smooths() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let soup = MeshData::from_stl(&indexed_cube().to_stl_binary()?)?;

    let welded = minimize_verts_with(&soup, MatchConditions::empty())?;
    assert_eq!(welded.mesh.vertex_count(), 8);

    let faceted = minimize_verts_with(&soup, MatchConditions::NORMAL)?;
    assert_eq!(faceted.mesh.vertex_count(), 24);

    let smoothed = NormalGenerator::new(degrees(45.0))
        .generate(&welded.mesh)?
        .expect("triangle list");
    assert_eq!(smoothed.mesh.vertex_count(), 24);
    assert_eq!(smoothed.split_count, 6);
    Ok(())
}

#[test]
fn garbage_is_an_error() {
    assert!(MeshData::from_stl(b"not an stl file").is_err());
}

//! **Mesh preparation** for real-time rendering: vertex deduplication and
//! crease-angle normal generation over plain attribute arrays.
//!
//! - [`dedup::minimize_verts`] collapses vertices that share a position and agree
//!   on the attributes their smoothing group cares about, returning compacted
//!   buffers, a rewritten index buffer and the old → new [`dedup::VertMap`].
//! - [`normals::NormalGenerator`] computes per-vertex normals for indexed triangle
//!   lists, splitting vertices along edges sharper than a crease angle.
//! - [`normals::SoupNormalGenerator`] does the same for unindexed triangle soup
//!   without duplicating anything.
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//! - [**stl-io**](https://en.wikipedia.org/wiki/STL_(file_format)): `.stl` import/export
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//!
//! Diagnostics go through the [`log`] facade; install any logger to see them.

#![forbid(unsafe_code)]
#![warn(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod dedup;
pub mod errors;
pub mod float_types;
pub mod io;
pub mod math;
pub mod mesh;
pub mod normals;

#[cfg(any(
    all(feature = "f64", feature = "f32"),
    not(any(feature = "f64", feature = "f32"))
))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use dedup::{
    Deduplicated, MatchCondition, MatchConditions, VertGroupData, VertMap, minimize_verts,
    minimize_verts_with,
};
pub use errors::MeshError;
pub use float_types::Real;
pub use mesh::{IndexMode, MeshData, VertexAttributes};
pub use normals::{NormalGenerator, SmoothedMesh, SoupNormalGenerator};

//! Mesh file import and export.
//!
//! Formats sit behind cargo feature-flags; failures surface as
//! [`crate::errors::MeshError::Io`] or [`crate::errors::MeshError::MalformedInput`].

#[cfg(feature = "stl-io")]
mod stl;

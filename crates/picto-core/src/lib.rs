#![allow(clippy::must_use_candidate)]

//! Shared types for the Picto gateway crates

mod error;
mod image;

pub use error::{ErrorBody, HttpError};
pub use image::{ImageRef, ImageRefError};

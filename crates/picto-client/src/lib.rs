#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Typed Rust client for the Picto image tools
//!
//! [`PictoClient`] speaks the HTTP API; [`SubmissionFlow`] wraps any
//! [`ImageService`] in the submit/progress/result lifecycle a front end needs.

mod client;
pub mod error;
mod flow;
mod service;
pub mod types;

pub use client::PictoClient;
pub use error::{ClientError, Result};
pub use flow::{
    Artifact, CANCELLED_MESSAGE, CosmeticProgress, DEFAULT_BACKGROUND_COLOR, DEFAULT_TIMEOUT, FlowError, FlowState,
    Submission, SubmissionFlow, Tool,
};
pub use picto_core::ImageRef;
pub use service::ImageService;
pub use types::*;

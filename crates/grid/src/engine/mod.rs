//! Container engine adapter.
//!
//! Jobs run inside container images tracked by a label namespace; this
//! module lists and removes those images through the Docker API and
//! matches them against the job-spec catalog.

pub mod client;
pub mod image;
pub mod jobspec;

pub use client::{EngineClient, EngineError};
pub use image::ImageInfo;
pub use jobspec::JobSpec;

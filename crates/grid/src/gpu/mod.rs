//! GPU telemetry adapter.
//!
//! - `smi.rs`: pure parsing of `nvidia-smi -q -x` output
//! - `client.rs`: telemetry query invocation
//! - `procinfo.rs`: live process metadata for GPU process rows

pub mod client;
pub mod procinfo;
pub mod smi;

pub use client::{GpuClient, GpuError};
pub use procinfo::{ProcessCache, ProcessInfo};
pub use smi::{GpuInfo, GpuProcess, GpuReport};

//! Application services and ports.

#![forbid(unsafe_code)]

mod run_ports;
mod run_service;

pub use run_ports::{ObjectStorage, RunRepository};
pub use run_service::{
    CreateRunInput, DEFAULT_SIGNED_URL_TTL_SECONDS, RunImageUpload, RunListing, RunService,
    RunServiceConfig,
};

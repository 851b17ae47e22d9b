// Domain-driven module structure for the Gridboard grid library.

// Shared infrastructure
pub mod cli;

// Core parsing
pub mod logview;

// Collaborator adapters
pub mod engine;
pub mod gpu;
pub mod sge;

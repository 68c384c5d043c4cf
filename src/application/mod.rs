//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement the
//! prediction pipeline.

mod assembler;
mod inference;
mod service;
mod slot;

pub use assembler::{AssemblyError, ExtraFields, FeatureAssembler, ValueCheck};
pub use inference::{invoke, InferenceError};
pub use service::{PredictionService, ResponseMode, ServiceResponse};
pub use slot::{ModelSlot, ModelState};

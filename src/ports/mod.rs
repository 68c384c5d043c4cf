//! Ports layer: Trait definitions for external collaborators.
//!
//! Following Hexagonal Architecture, these define the boundary between the
//! prediction pipeline and the trained classifier it consumes.

mod classifier;
mod model;

pub use classifier::{check_row, Classifier, ClassifierError};
pub use model::ModelHandle;

//! Model slot: the single-initialization barrier around the loaded model.
//!
//! The candidate sequence runs at most once per slot, even when several
//! requests race on first use. Afterwards the slot is either permanently
//! ready or permanently unavailable; there is no reload on the request path.

use std::sync::{Arc, OnceLock};

use crate::adapters::{LoadAttempt, ModelLoader};
use crate::ports::ModelHandle;

/// Settled state of a slot.
#[derive(Debug, Clone)]
pub enum ModelState {
    Ready(Arc<ModelHandle>),
    Unavailable { attempts: Vec<LoadAttempt> },
}

impl ModelState {
    #[must_use]
    pub fn handle(&self) -> Option<&Arc<ModelHandle>> {
        match self {
            Self::Ready(handle) => Some(handle),
            Self::Unavailable { .. } => None,
        }
    }
}

/// Owner of the process-wide model.
#[derive(Debug)]
pub struct ModelSlot {
    state: OnceLock<ModelState>,
    loader: Option<ModelLoader>,
}

impl ModelSlot {
    /// Slot that loads on first use.
    #[must_use]
    pub fn lazy(loader: ModelLoader) -> Self {
        Self {
            state: OnceLock::new(),
            loader: Some(loader),
        }
    }

    /// Slot that loads immediately.
    #[must_use]
    pub fn eager(loader: ModelLoader) -> Self {
        let slot = Self::lazy(loader);
        slot.get_or_load();
        slot
    }

    /// Slot holding an already-built handle.
    #[must_use]
    pub fn ready(handle: ModelHandle) -> Self {
        Self::settled(ModelState::Ready(Arc::new(handle)))
    }

    /// Slot that will never hold a model.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::settled(ModelState::Unavailable {
            attempts: Vec::new(),
        })
    }

    fn settled(state: ModelState) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(state);
        Self {
            state: cell,
            loader: None,
        }
    }

    /// Current state, running the loader if this is the first access.
    pub fn get_or_load(&self) -> &ModelState {
        self.state.get_or_init(|| match &self.loader {
            Some(loader) => {
                tracing::info!(
                    "Resolving model artifact from {} candidate locations",
                    loader.candidates().len()
                );
                let report = loader.load();
                match report.handle {
                    Some(handle) => ModelState::Ready(Arc::new(handle)),
                    None => ModelState::Unavailable {
                        attempts: report.attempts,
                    },
                }
            }
            None => ModelState::Unavailable {
                attempts: Vec::new(),
            },
        })
    }

    /// Loaded handle, if any.
    #[must_use]
    pub fn handle(&self) -> Option<Arc<ModelHandle>> {
        self.get_or_load().handle().cloned()
    }

    /// Whether the load sequence has already run.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.state.get().is_some()
    }
}

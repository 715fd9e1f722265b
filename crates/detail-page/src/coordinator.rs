//! # Read Coordinator
//!
//! Single-slot cancellation discipline for loads (reads and new-entity
//! initializations). Create/update/delete are user-triggered single actions
//! and are never superseded, so they bypass the coordinator entirely.
//!
//! Beginning a new load cancels the previously outstanding token and bumps a
//! generation counter. A completion carrying a stale generation belongs to a
//! superseded load and must be swallowed without touching page state.

use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
pub struct ReadCoordinator {
    generation: u64,
    current: Option<CancellationToken>,
}

impl ReadCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new load, cancelling any outstanding one.
    ///
    /// Returns the generation of the new load and the token to thread into
    /// the entity service call.
    pub fn begin(&mut self) -> (u64, CancellationToken) {
        if let Some(previous) = self.current.take() {
            previous.cancel();
        }
        self.generation += 1;
        let token = CancellationToken::new();
        self.current = Some(token.clone());
        (self.generation, token)
    }

    /// Whether a completion for `generation` belongs to the live load.
    pub fn is_current(&self, generation: u64) -> bool {
        self.current.is_some() && generation == self.generation
    }

    /// Mark the live load as completed.
    pub fn finish(&mut self, generation: u64) {
        if generation == self.generation {
            self.current = None;
        }
    }
}

//! Error Types
//!
//! The cell graph is a primitive: it surfaces precondition violations to the
//! caller immediately instead of trying to recover from them. Every fallible
//! graph operation returns [`Result`], and the first error raised inside a
//! propagation chain aborts the rest of that chain.

use thiserror::Error;

use crate::reactive::CellId;

/// Errors raised by cell graph operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CellError {
    /// A destroyed cell was read, recomputed, or written.
    ///
    /// This signals a use-after-teardown programming error and is never
    /// worth retrying.
    #[error("cell {id} was used after it was destroyed")]
    Destroyed {
        /// The destroyed cell.
        id: CellId,
    },

    /// A source cell was mutated while a formula or effect was evaluating.
    #[error("cell {id} was mutated while cell {during} was evaluating")]
    ReentrantMutation {
        /// The source cell that was written.
        id: CellId,
        /// The cell whose function was running at the time.
        during: CellId,
    },

    /// An effect was run again from inside its own function.
    #[error("effect {id} was re-entered while it was running")]
    EffectReentered {
        /// The effect cell.
        id: CellId,
    },
}

/// Result alias used throughout the crate.
pub type Result<T, E = CellError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::IdGenerator;

    #[test]
    fn errors_render_cell_ids() {
        let ids = IdGenerator::starting_at(7);
        let id = ids.next_id();
        let during = ids.next_id();

        assert_eq!(
            CellError::Destroyed { id }.to_string(),
            "cell #7 was used after it was destroyed"
        );
        assert_eq!(
            CellError::ReentrantMutation { id, during }.to_string(),
            "cell #7 was mutated while cell #8 was evaluating"
        );
        assert_eq!(
            CellError::EffectReentered { id }.to_string(),
            "effect #7 was re-entered while it was running"
        );
    }
}

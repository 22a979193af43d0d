//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::FillError;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &FillError) -> String {
    match e {
        FillError::MissingColumn { .. }
        | FillError::InvalidValue { .. }
        | FillError::Encoding { .. } => format!("Roster rejected: {}", e),
        FillError::UnresolvedSlots { .. } => {
            format!("{}\nRun without --strict to keep unbound slots in the output.", e)
        }
        _ => e.to_string(),
    }
}

//! Error code re-exports from the program
//!
//! Anchor custom errors start at 6000.

pub use cash_dispatch::errors::DistributionError;

/// Convert DistributionError to u32 for ProgramError::Custom
pub fn error_code(code: DistributionError) -> u32 {
    6000 + code as u32
}

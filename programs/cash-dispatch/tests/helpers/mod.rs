//! Test helpers for Cash Dispatch Mollusk tests
//!
//! NOTE: This module is written for mollusk-svm 0.5.1 with solana-sdk 2.2
//! - All imports from solana_sdk::* (not modular crates like solana_pubkey)
//! - Token accounts MUST have owner explicitly set to spl_token::id()
//! - The program binary must be built first (`cargo build-sbf`, or run the
//!   suite through `cargo test-sbf` which builds it)

#![allow(dead_code)]

pub mod errors;
pub mod fixture;
pub mod serialization;

pub use accounts::*;
pub use errors::*;
pub use fixture::*;
pub use instructions::*;
pub use serialization::*;

use mollusk_svm::Mollusk;
use mollusk_svm_programs_token::{associated_token, token};

/// Unix time the tests run at
pub const NOW: i64 = 1_700_000_000;

/// Setup Mollusk for testing (without Token program)
///
/// Uses SBF_OUT_DIR to tell Mollusk where to find the program binary.
/// For Anchor workspace: tests are in programs/cash-dispatch/tests,
/// binary is at workspace_root/target/deploy/
pub fn setup_mollusk() -> Mollusk {
    // From programs/cash-dispatch/, go up 2 levels to workspace root
    let deploy_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent() // programs/
        .unwrap()
        .parent() // workspace root
        .unwrap()
        .join("target/deploy");

    std::env::set_var("SBF_OUT_DIR", deploy_dir);

    let mut mollusk = Mollusk::new(&instructions::PROGRAM_ID, "cash_dispatch");
    mollusk.sysvars.clock.unix_timestamp = NOW;
    mollusk
}

/// Setup Mollusk with Token and Associated Token programs for testing
///
/// Every instruction except pause/resume/expand/reclaim moves tokens or
/// creates associated token accounts.
pub fn setup_mollusk_with_token() -> Mollusk {
    let mut mollusk = setup_mollusk();
    token::add_program(&mut mollusk);
    associated_token::add_program(&mut mollusk);
    mollusk
}

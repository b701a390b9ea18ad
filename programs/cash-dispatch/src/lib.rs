use anchor_lang::prelude::*;

pub mod bitmap;
pub mod constants;
pub mod errors;
pub mod events;
pub mod gateway;
pub mod instructions;
pub mod merkle;
pub mod processor;
pub mod state;
pub mod utils;

use instructions::*;

declare_id!("8rkeMP9jCyGU6BdRbEYq7k2kWP1gKmvNMVJToMhREMdA");

// Security contact information (embedded on-chain)
#[cfg(not(feature = "no-entrypoint"))]
solana_security_txt::security_txt! {
    name: "Cash Dispatch",
    project_url: "https://github.com/cash-dispatch/cash-dispatch",
    contacts: "link:https://github.com/cash-dispatch/cash-dispatch/security",
    policy: "https://github.com/cash-dispatch/cash-dispatch/blob/main/SECURITY.md",
    source_code: "https://github.com/cash-dispatch/cash-dispatch",
    source_release: "v0.1.0"
}

#[program]
pub mod cash_dispatch {
    use super::*;

    /// Creates a distribution tree for a committed payment manifest and funds its vault
    pub fn initialize(ctx: Context<Initialize>, params: InitializeParams) -> Result<()> {
        instructions::initialize::handler(ctx, params)
    }

    /// Authority pushes one committed payment to its recipient
    pub fn distribute(ctx: Context<Distribute>, params: DistributeParams) -> Result<()> {
        instructions::distribute::handler(ctx, params)
    }

    /// Recipient pulls their own committed payment
    /// Requires allow_claims and the start time to have passed
    pub fn claim(ctx: Context<Claim>, params: ClaimParams) -> Result<()> {
        instructions::claim::handler(ctx, params)
    }

    /// Stops an active or paused distribution and refunds the vault
    pub fn cancel(ctx: Context<Cancel>, batch_id: String) -> Result<()> {
        instructions::cancel::handler(ctx, batch_id)
    }

    /// Grows the settlement bitmap by one step
    /// Repeat until the distribution becomes active
    pub fn expand_distribution_tree(
        ctx: Context<ExpandDistributionTree>,
        batch_id: String,
    ) -> Result<()> {
        instructions::expand_distribution_tree::handler(ctx, batch_id)
    }

    pub fn pause(ctx: Context<PauseResume>, batch_id: String) -> Result<()> {
        instructions::pause_resume::pause_handler(ctx, batch_id)
    }

    pub fn resume(ctx: Context<PauseResume>, batch_id: String) -> Result<()> {
        instructions::pause_resume::resume_handler(ctx, batch_id)
    }

    /// Releases the bitmap rent of a completed distribution
    pub fn reclaim(ctx: Context<Reclaim>, batch_id: String) -> Result<()> {
        instructions::reclaim::handler(ctx, batch_id)
    }

    /// Deletes a completed, reclaimed or cancelled distribution and its vault
    /// Irreversible: the caller must acknowledge it
    pub fn close(
        ctx: Context<CloseDistributionTree>,
        batch_id: String,
        acknowledge_irreversible: bool,
    ) -> Result<()> {
        instructions::close::handler(ctx, batch_id, acknowledge_irreversible)
    }
}

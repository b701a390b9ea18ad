use anchor_lang::prelude::*;

use crate::{
    constants::DISTRIBUTION_TREE_SEED,
    errors::DistributionError,
    events::{DistributionPaused, DistributionResumed},
    processor,
    state::DistributionTree,
};

#[derive(Accounts)]
#[instruction(batch_id: String)]
pub struct PauseResume<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [
            DISTRIBUTION_TREE_SEED,
            distribution_tree.authority.as_ref(),
            batch_id.as_bytes()
        ],
        bump = distribution_tree.bump,
        has_one = authority @ DistributionError::SignerNotAuthorized,
    )]
    pub distribution_tree: Account<'info, DistributionTree>,
}

/// Active -> Paused
pub fn pause_handler(ctx: Context<PauseResume>, _batch_id: String) -> Result<()> {
    let authority = ctx.accounts.authority.key();
    let distribution_tree = &mut ctx.accounts.distribution_tree;

    processor::pause(distribution_tree, &authority)?;
    msg!("Distribution {} paused", distribution_tree.batch_id);

    emit!(DistributionPaused {
        distribution_tree: distribution_tree.key(),
        authority,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

/// Paused -> Active
pub fn resume_handler(ctx: Context<PauseResume>, _batch_id: String) -> Result<()> {
    let authority = ctx.accounts.authority.key();
    let distribution_tree = &mut ctx.accounts.distribution_tree;

    processor::resume(distribution_tree, &authority)?;
    msg!("Distribution {} resumed", distribution_tree.batch_id);

    emit!(DistributionResumed {
        distribution_tree: distribution_tree.key(),
        authority,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

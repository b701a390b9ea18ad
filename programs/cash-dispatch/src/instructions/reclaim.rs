use anchor_lang::prelude::*;

use crate::{
    constants::DISTRIBUTION_TREE_SEED,
    errors::DistributionError,
    events::DistributionReclaimed,
    processor,
    state::DistributionTree,
};

#[derive(Accounts)]
#[instruction(batch_id: String)]
pub struct Reclaim<'info> {
    /// Receives the rent released by the bitmap
    #[account(mut)]
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
        realloc = distribution_tree.space_without_bitmap(),
        realloc::payer = authority,
        realloc::zero = false,
    )]
    pub distribution_tree: Account<'info, DistributionTree>,

    pub system_program: Program<'info, System>,
}

/// Releases the settlement bitmap of a completed batch
pub fn handler(ctx: Context<Reclaim>, _batch_id: String) -> Result<()> {
    let authority = ctx.accounts.authority.key();
    let distribution_tree = &mut ctx.accounts.distribution_tree;

    let bitmap_words_released = processor::reclaim(distribution_tree, &authority)?;
    msg!(
        "Distribution {} reclaimed {} bitmap words",
        distribution_tree.batch_id,
        bitmap_words_released
    );

    emit!(DistributionReclaimed {
        distribution_tree: distribution_tree.key(),
        authority,
        bitmap_words_released: bitmap_words_released as u64,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

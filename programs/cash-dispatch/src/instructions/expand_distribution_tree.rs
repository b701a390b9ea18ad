use anchor_lang::prelude::*;

use crate::{
    constants::DISTRIBUTION_TREE_SEED,
    errors::DistributionError,
    events::DistributionExpanded,
    processor,
    state::{DistributionStatus, DistributionTree},
};

#[derive(Accounts)]
#[instruction(batch_id: String)]
pub struct ExpandDistributionTree<'info> {
    /// Pays rent for the added bitmap words
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
        realloc = distribution_tree.space_after_expansion(),
        realloc::payer = authority,
        realloc::zero = false,
    )]
    pub distribution_tree: Account<'info, DistributionTree>,

    pub system_program: Program<'info, System>,
}

/// Grows the settlement bitmap by one step
pub fn handler(ctx: Context<ExpandDistributionTree>, _batch_id: String) -> Result<()> {
    let authority = ctx.accounts.authority.key();
    let distribution_tree = &mut ctx.accounts.distribution_tree;

    let words_added = processor::expand(distribution_tree, &authority)?;
    let bitmap_words = distribution_tree.recipients_distributed_bitmap.len();
    let active = distribution_tree.status == DistributionStatus::Active;

    msg!(
        "Bitmap expanded by {} words to {}{}",
        words_added,
        bitmap_words,
        if active { ", distribution active" } else { "" }
    );

    emit!(DistributionExpanded {
        distribution_tree: distribution_tree.key(),
        authority,
        words_added: words_added as u64,
        bitmap_words: bitmap_words as u64,
        active,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::{
    constants::DISTRIBUTION_TREE_SEED,
    errors::DistributionError,
    events::DistributionCancelled,
    processor,
    state::DistributionTree,
    utils::{CpiTokenTransfer, TreeSigner},
};

#[derive(Accounts)]
#[instruction(batch_id: String)]
pub struct Cancel<'info> {
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
        has_one = mint @ DistributionError::InvalidTokenMint,
        has_one = token_vault @ DistributionError::InvalidTokenVault,
    )]
    pub distribution_tree: Account<'info, DistributionTree>,

    pub mint: InterfaceAccount<'info, Mint>,

    #[account(mut)]
    pub token_vault: InterfaceAccount<'info, TokenAccount>,

    /// Receives the undistributed balance
    #[account(
        mut,
        associated_token::mint = mint,
        associated_token::authority = authority,
        associated_token::token_program = token_program
    )]
    pub authority_token_account: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Stops an active or paused batch and refunds the vault to the authority
pub fn handler(ctx: Context<Cancel>, _batch_id: String) -> Result<()> {
    let authority = ctx.accounts.authority.key();
    let vault_balance = ctx.accounts.token_vault.amount;
    let refund_destination = ctx.accounts.authority_token_account.key();

    let signer = TreeSigner::new(&ctx.accounts.distribution_tree);
    let seeds = signer.seeds();
    let signer_seeds = &[&seeds[..]];
    let transfers = CpiTokenTransfer::new(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.mint.to_account_info(),
        ctx.accounts.mint.decimals,
        ctx.accounts.distribution_tree.to_account_info(),
        vec![
            ctx.accounts.token_vault.to_account_info(),
            ctx.accounts.authority_token_account.to_account_info(),
        ],
        signer_seeds,
    );

    let distribution_tree = &mut ctx.accounts.distribution_tree;
    let refunded_amount = processor::cancel(
        distribution_tree,
        &authority,
        vault_balance,
        &refund_destination,
        &transfers,
    )?;

    let remaining_recipients = distribution_tree.remaining_recipients();
    msg!(
        "Distribution {} cancelled with {} payments unsettled, refunded {}",
        distribution_tree.batch_id,
        remaining_recipients,
        refunded_amount
    );

    emit!(DistributionCancelled {
        distribution_tree: distribution_tree.key(),
        authority,
        refunded_amount,
        number_distributed: distribution_tree.number_distributed,
        remaining_recipients,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

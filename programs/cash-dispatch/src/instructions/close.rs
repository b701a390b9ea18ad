use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::{
    constants::DISTRIBUTION_TREE_SEED,
    errors::DistributionError,
    events::DistributionClosed,
    processor,
    state::DistributionTree,
    utils::{close_token_account_with_pda, CpiTokenTransfer, TreeSigner},
};

#[derive(Accounts)]
#[instruction(batch_id: String)]
pub struct CloseDistributionTree<'info> {
    /// Receives every lamport of rent and any residual vault balance
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
        has_one = mint @ DistributionError::InvalidTokenMint,
        has_one = token_vault @ DistributionError::InvalidTokenVault,
        close = authority,
    )]
    pub distribution_tree: Account<'info, DistributionTree>,

    pub mint: InterfaceAccount<'info, Mint>,

    #[account(mut)]
    pub token_vault: InterfaceAccount<'info, TokenAccount>,

    #[account(
        mut,
        associated_token::mint = mint,
        associated_token::authority = authority,
        associated_token::token_program = token_program
    )]
    pub authority_token_account: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Deletes a wound-down distribution tree and its vault
pub fn handler(
    ctx: Context<CloseDistributionTree>,
    _batch_id: String,
    acknowledge_irreversible: bool,
) -> Result<()> {
    let authority = ctx.accounts.authority.key();
    let vault_balance = ctx.accounts.token_vault.amount;
    let sweep_destination = ctx.accounts.authority_token_account.key();

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

    let vault_swept = processor::close(
        &ctx.accounts.distribution_tree,
        &authority,
        acknowledge_irreversible,
        vault_balance,
        &sweep_destination,
        &transfers,
    )?;

    let vault_rent = ctx.accounts.token_vault.to_account_info().lamports();
    close_token_account_with_pda(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.token_vault.to_account_info(),
        ctx.accounts.authority.to_account_info(),
        ctx.accounts.distribution_tree.to_account_info(),
        signer_seeds,
    )?;

    let rent_recovered = ctx
        .accounts
        .distribution_tree
        .to_account_info()
        .lamports()
        .checked_add(vault_rent)
        .ok_or(DistributionError::MathOverflow)?;

    msg!(
        "Distribution {} closed, swept {}, recovered {} lamports",
        ctx.accounts.distribution_tree.batch_id,
        vault_swept,
        rent_recovered
    );

    emit!(DistributionClosed {
        distribution_tree: ctx.accounts.distribution_tree.key(),
        authority,
        vault_swept,
        rent_recovered,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

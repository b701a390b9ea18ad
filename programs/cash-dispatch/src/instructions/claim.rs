use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::{
    constants::DISTRIBUTION_TREE_SEED,
    errors::DistributionError,
    events::PaymentDistributed,
    gateway::GatewayTokenGate,
    processor,
    state::{DistributionStatus, DistributionTree},
    utils::{CpiTokenTransfer, TreeSigner},
};

#[derive(Accounts)]
#[instruction(params: ClaimParams)]
pub struct Claim<'info> {
    /// Recipient committed at `params.index`
    #[account(mut)]
    pub claimant: Signer<'info>,

    #[account(
        mut,
        seeds = [
            DISTRIBUTION_TREE_SEED,
            distribution_tree.authority.as_ref(),
            params.batch_id.as_bytes()
        ],
        bump = distribution_tree.bump,
        has_one = mint @ DistributionError::InvalidTokenMint,
        has_one = token_vault @ DistributionError::InvalidTokenVault,
    )]
    pub distribution_tree: Account<'info, DistributionTree>,

    pub mint: InterfaceAccount<'info, Mint>,

    #[account(mut)]
    pub token_vault: InterfaceAccount<'info, TokenAccount>,

    #[account(
        init_if_needed,
        payer = claimant,
        associated_token::mint = mint,
        associated_token::authority = claimant,
        associated_token::token_program = token_program,
    )]
    pub claimant_token_account: InterfaceAccount<'info, TokenAccount>,

    /// CHECK: Parsed and checked by the identity gate when the tree is gated
    pub gateway_token: Option<UncheckedAccount<'info>>,

    pub associated_token_program: Program<'info, AssociatedToken>,
    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct ClaimParams {
    pub batch_id: String,
    pub index: u64,
    pub amount: u64,
    pub proof: Vec<[u8; 32]>,
}

/// Recipient pulls their own committed payment
pub fn handler(ctx: Context<Claim>, params: ClaimParams) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let claimant = ctx.accounts.claimant.key();
    let destination = ctx.accounts.claimant_token_account.key();

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
            ctx.accounts.claimant_token_account.to_account_info(),
        ],
        signer_seeds,
    );
    let gateway_token = ctx
        .accounts
        .gateway_token
        .as_ref()
        .map(|token| token.to_account_info());
    let gate = GatewayTokenGate::new(gateway_token.as_ref(), now);

    let distribution_tree = &mut ctx.accounts.distribution_tree;
    processor::claim(
        distribution_tree,
        &claimant,
        params.index,
        params.amount,
        &params.proof,
        &destination,
        &gate,
        &transfers,
        now,
    )?;

    msg!(
        "Claimed {} by {} (index {})",
        params.amount,
        claimant,
        params.index
    );

    emit!(PaymentDistributed {
        distribution_tree: distribution_tree.key(),
        recipient: claimant,
        index: params.index,
        amount: params.amount,
        claimed: true,
        number_distributed: distribution_tree.number_distributed,
        complete: distribution_tree.status == DistributionStatus::Complete,
        timestamp: now,
    });

    Ok(())
}

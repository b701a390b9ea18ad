use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::{
    constants::{DISTRIBUTION_TREE_SEED, FEES_WALLET},
    errors::DistributionError,
    events::DistributionInitialized,
    processor::{self, Funding},
    state::{DistributionStatus, DistributionTree},
    utils::CpiTokenTransfer,
};

#[derive(Accounts)]
#[instruction(params: InitializeParams)]
pub struct Initialize<'info> {
    /// Administers the new batch and funds its vault
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        init,
        payer = authority,
        space = DistributionTree::initial_space(&params),
        seeds = [
            DISTRIBUTION_TREE_SEED,
            authority.key().as_ref(),
            params.batch_id.as_bytes()
        ],
        bump
    )]
    pub distribution_tree: Account<'info, DistributionTree>,

    #[account(
        constraint = mint.decimals == params.mint_decimals @ DistributionError::InvalidTokenMint
    )]
    pub mint: InterfaceAccount<'info, Mint>,

    #[account(
        mut,
        associated_token::mint = mint,
        associated_token::authority = authority,
        associated_token::token_program = token_program
    )]
    pub token_source: InterfaceAccount<'info, TokenAccount>,

    #[account(
        init,
        payer = authority,
        associated_token::mint = mint,
        associated_token::authority = distribution_tree,
        associated_token::token_program = token_program,
    )]
    pub token_vault: InterfaceAccount<'info, TokenAccount>,

    #[account(
        mut,
        associated_token::mint = mint,
        associated_token::authority = FEES_WALLET,
        associated_token::token_program = token_program
    )]
    pub fees_token_account: InterfaceAccount<'info, TokenAccount>,

    pub associated_token_program: Program<'info, AssociatedToken>,
    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct InitializeParams {
    pub batch_id: String,
    pub merkle_root: [u8; 32],
    pub total_number_recipients: u64,
    /// Sum of every committed payment; the protocol fee is charged on top
    pub transfer_to_vault_amount: u64,
    pub mint_decimals: u8,
    pub start_ts: i64,
    pub end_ts: Option<i64>,
    pub allow_claims: bool,
    pub gatekeeper_network: Option<Pubkey>,
}

/// Creates a distribution tree, funds its vault and charges the protocol fee
pub fn handler(ctx: Context<Initialize>, params: InitializeParams) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let bump = ctx.bumps.distribution_tree;

    let authority = ctx.accounts.authority.key();
    let mint = ctx.accounts.mint.key();
    let token_vault = ctx.accounts.token_vault.key();
    let token_source = ctx.accounts.token_source.key();
    let fees_token_account = ctx.accounts.fees_token_account.key();

    // Funding is signed by the authority itself
    let transfers = CpiTokenTransfer::new(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.mint.to_account_info(),
        ctx.accounts.mint.decimals,
        ctx.accounts.authority.to_account_info(),
        vec![
            ctx.accounts.token_source.to_account_info(),
            ctx.accounts.token_vault.to_account_info(),
            ctx.accounts.fees_token_account.to_account_info(),
        ],
        &[],
    );

    let distribution_tree = &mut ctx.accounts.distribution_tree;
    let fee_amount = processor::initialize(
        distribution_tree,
        bump,
        authority,
        mint,
        token_vault,
        &params,
        Funding {
            source: &token_source,
            fee_destination: &fees_token_account,
        },
        &transfers,
        now,
    )?;

    let awaiting_capacity = distribution_tree.status == DistributionStatus::InsufficientBitmapSpace;

    msg!(
        "Distribution tree {} initialized for {} recipients",
        params.batch_id,
        params.total_number_recipients
    );
    if awaiting_capacity {
        msg!(
            "Bitmap covers {} of {} words; expand before distributing",
            distribution_tree.recipients_distributed_bitmap.len(),
            crate::bitmap::required_words(params.total_number_recipients)
        );
    }

    emit!(DistributionInitialized {
        distribution_tree: distribution_tree.key(),
        authority,
        batch_id: params.batch_id,
        mint,
        token_vault,
        merkle_root: params.merkle_root,
        total_number_recipients: params.total_number_recipients,
        transfer_to_vault_amount: params.transfer_to_vault_amount,
        fee_amount,
        awaiting_capacity,
        timestamp: now,
    });

    Ok(())
}

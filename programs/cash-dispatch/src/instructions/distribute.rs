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
    merkle::PaymentLeaf,
    processor::{self, Payment},
    state::{DistributionStatus, DistributionTree},
    utils::{CpiTokenTransfer, TreeSigner},
};

#[derive(Accounts)]
#[instruction(params: DistributeParams)]
pub struct Distribute<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [
            DISTRIBUTION_TREE_SEED,
            distribution_tree.authority.as_ref(),
            params.batch_id.as_bytes()
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

    /// CHECK: Bound to the payment by the Merkle proof
    pub recipient: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = authority,
        associated_token::mint = mint,
        associated_token::authority = recipient,
        associated_token::token_program = token_program,
    )]
    pub recipient_token_account: InterfaceAccount<'info, TokenAccount>,

    /// CHECK: Parsed and checked by the identity gate when the tree is gated
    pub gateway_token: Option<UncheckedAccount<'info>>,

    pub associated_token_program: Program<'info, AssociatedToken>,
    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct DistributeParams {
    pub batch_id: String,
    pub index: u64,
    pub amount: u64,
    pub proof: Vec<[u8; 32]>,
}

/// Pushes one committed payment from the vault to its recipient
pub fn handler(ctx: Context<Distribute>, params: DistributeParams) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let authority = ctx.accounts.authority.key();
    let recipient = ctx.accounts.recipient.key();
    let destination = ctx.accounts.recipient_token_account.key();

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
            ctx.accounts.recipient_token_account.to_account_info(),
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
    processor::distribute(
        distribution_tree,
        &authority,
        &Payment {
            leaf: PaymentLeaf::new(params.index, recipient, params.amount),
            proof: &params.proof,
        },
        &destination,
        &gate,
        &transfers,
        now,
    )?;

    let complete = distribution_tree.status == DistributionStatus::Complete;
    msg!(
        "Distributed {} to {} (index {}), {}/{} settled",
        params.amount,
        recipient,
        params.index,
        distribution_tree.number_distributed,
        distribution_tree.total_number_recipients
    );

    emit!(PaymentDistributed {
        distribution_tree: distribution_tree.key(),
        recipient,
        index: params.index,
        amount: params.amount,
        claimed: false,
        number_distributed: distribution_tree.number_distributed,
        complete,
        timestamp: now,
    });

    Ok(())
}

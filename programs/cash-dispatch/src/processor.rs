//! Distribution flows independent of the account substrate.
//!
//! Instruction handlers resolve accounts, then call into these functions with
//! the tree record, a [`TokenTransfer`] and an [`IdentityGate`]. The native
//! test suite drives the same functions with an in-memory ledger.

use anchor_lang::prelude::*;

use crate::{
    errors::DistributionError,
    instructions::InitializeParams,
    merkle::PaymentLeaf,
    state::DistributionTree,
    utils::calculate_fee,
};

/// Moves `amount` of the tree's asset between two holding accounts
pub trait TokenTransfer {
    fn transfer(&self, from: &Pubkey, to: &Pubkey, amount: u64) -> Result<()>;
}

/// Answers whether `owner` holds a valid capability token under `network`
pub trait IdentityGate {
    fn verify_gate_token(&self, owner: &Pubkey, network: &Pubkey) -> bool;
}

/// A payment as submitted for settlement: the committed leaf plus its proof
#[derive(Clone, Debug)]
pub struct Payment<'a> {
    pub leaf: PaymentLeaf,
    pub proof: &'a [[u8; 32]],
}

/// Where initialize pulls funds from and sends the protocol fee to
pub struct Funding<'a> {
    pub source: &'a Pubkey,
    pub fee_destination: &'a Pubkey,
}

/// Creates the tree record, funds the vault and charges the protocol fee.
/// Returns the fee charged.
#[allow(clippy::too_many_arguments)]
pub fn initialize<T: TokenTransfer>(
    tree: &mut DistributionTree,
    bump: u8,
    authority: Pubkey,
    mint: Pubkey,
    token_vault: Pubkey,
    params: &InitializeParams,
    funding: Funding<'_>,
    transfers: &T,
    now: i64,
) -> Result<u64> {
    tree.initialize(bump, authority, mint, token_vault, params, now)?;

    transfers.transfer(funding.source, &token_vault, params.transfer_to_vault_amount)?;

    let fee = calculate_fee(params.transfer_to_vault_amount)?;
    if fee > 0 {
        transfers.transfer(funding.source, funding.fee_destination, fee)?;
    }

    Ok(fee)
}

/// Steps shared by distribute and claim, after their own entry checks
fn settle<T: TokenTransfer, G: IdentityGate>(
    tree: &mut DistributionTree,
    payment: &Payment<'_>,
    destination: &Pubkey,
    gate: &G,
    transfers: &T,
    now: i64,
) -> Result<()> {
    let leaf = &payment.leaf;

    tree.require_payable(now)?;

    if let Some(network) = tree.gatekeeper_network {
        require!(
            gate.verify_gate_token(&leaf.recipient, &network),
            DistributionError::InvalidGatewayToken
        );
    }

    require!(
        leaf.index < tree.total_number_recipients,
        DistributionError::InvalidProof
    );
    require!(
        !tree.is_claimed(leaf.index),
        DistributionError::AlreadyClaimed
    );
    tree.verify_proof(leaf, payment.proof)?;

    tree.record_payment(leaf.index)?;

    transfers.transfer(&tree.token_vault, destination, leaf.amount)
}

/// Authority pushes a committed payment to its recipient
pub fn distribute<T: TokenTransfer, G: IdentityGate>(
    tree: &mut DistributionTree,
    signer: &Pubkey,
    payment: &Payment<'_>,
    destination: &Pubkey,
    gate: &G,
    transfers: &T,
    now: i64,
) -> Result<()> {
    tree.require_authority(signer)?;
    settle(tree, payment, destination, gate, transfers, now)
}

/// Recipient pulls their own committed payment. The leaf recipient is the claimant.
#[allow(clippy::too_many_arguments)]
pub fn claim<T: TokenTransfer, G: IdentityGate>(
    tree: &mut DistributionTree,
    claimant: &Pubkey,
    index: u64,
    amount: u64,
    proof: &[[u8; 32]],
    destination: &Pubkey,
    gate: &G,
    transfers: &T,
    now: i64,
) -> Result<()> {
    tree.require_claimable(now)?;
    let payment = Payment {
        leaf: PaymentLeaf::new(index, *claimant, amount),
        proof,
    };
    settle(tree, &payment, destination, gate, transfers, now)
}

/// Stops the batch and refunds the vault balance. Returns the amount refunded.
pub fn cancel<T: TokenTransfer>(
    tree: &mut DistributionTree,
    signer: &Pubkey,
    vault_balance: u64,
    refund_destination: &Pubkey,
    transfers: &T,
) -> Result<u64> {
    tree.require_authority(signer)?;
    tree.cancel()?;
    transfers.transfer(&tree.token_vault, refund_destination, vault_balance)?;
    Ok(vault_balance)
}

/// Returns the number of bitmap words added
pub fn expand(tree: &mut DistributionTree, signer: &Pubkey) -> Result<usize> {
    tree.require_authority(signer)?;
    tree.expand()
}

pub fn pause(tree: &mut DistributionTree, signer: &Pubkey) -> Result<()> {
    tree.require_authority(signer)?;
    tree.pause()
}

pub fn resume(tree: &mut DistributionTree, signer: &Pubkey) -> Result<()> {
    tree.require_authority(signer)?;
    tree.resume()
}

/// Returns the number of bitmap words released
pub fn reclaim(tree: &mut DistributionTree, signer: &Pubkey) -> Result<usize> {
    tree.require_authority(signer)?;
    tree.reclaim()
}

/// Checks the tree may be closed and sweeps any residual vault balance.
/// The caller deletes the record afterwards. Returns the amount swept.
pub fn close<T: TokenTransfer>(
    tree: &DistributionTree,
    signer: &Pubkey,
    acknowledge_irreversible: bool,
    vault_balance: u64,
    sweep_destination: &Pubkey,
    transfers: &T,
) -> Result<u64> {
    tree.require_authority(signer)?;
    tree.require_closable(acknowledge_irreversible)?;
    transfers.transfer(&tree.token_vault, sweep_destination, vault_balance)?;
    Ok(vault_balance)
}

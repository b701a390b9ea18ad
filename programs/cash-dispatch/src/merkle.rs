//! Merkle commitment over payment leaves.
//!
//! Leaves are `keccak256(index_le || recipient || amount_le)`. Interior nodes
//! hash their two children in sorted order, so verification needs no
//! left/right flags and matches the `js-sha3` based client tooling.

use anchor_lang::prelude::*;
use solana_keccak_hasher as keccak;

use crate::errors::DistributionError;

/// One committed payment
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaymentLeaf {
    pub index: u64,
    pub recipient: Pubkey,
    pub amount: u64,
}

impl PaymentLeaf {
    pub fn new(index: u64, recipient: Pubkey, amount: u64) -> Self {
        Self {
            index,
            recipient,
            amount,
        }
    }

    /// Hash preimage: index (8 bytes LE) || recipient (32 bytes) || amount (8 bytes LE)
    pub fn hash(&self) -> [u8; 32] {
        keccak::hashv(&[
            &self.index.to_le_bytes(),
            self.recipient.as_ref(),
            &self.amount.to_le_bytes(),
        ])
        .to_bytes()
    }
}

/// Order-independent parent hash
pub fn combine(first: &[u8; 32], second: &[u8; 32]) -> [u8; 32] {
    if first <= second {
        keccak::hashv(&[first, second]).to_bytes()
    } else {
        keccak::hashv(&[second, first]).to_bytes()
    }
}

/// Returns true if `leaf` folded with `proof` reproduces `root`
pub fn verify(proof: &[[u8; 32]], root: [u8; 32], leaf: [u8; 32]) -> bool {
    proof
        .iter()
        .fold(leaf, |computed, sibling| combine(&computed, sibling))
        == root
}

/// Full tree, kept layer by layer so proofs can be read off directly.
/// Used by off-chain tooling and tests; the program itself only verifies.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    layers: Vec<Vec<[u8; 32]>>,
}

impl MerkleTree {
    /// Builds a tree over arbitrary leaf hashes (sorted and de-duplicated first)
    pub fn new(mut leaves: Vec<[u8; 32]>) -> Result<Self> {
        leaves.sort_unstable();
        leaves.dedup();
        require!(!leaves.is_empty(), DistributionError::NoRecipients);

        let mut layers = vec![leaves];
        while let Some(layer) = layers.last() {
            if layer.len() <= 1 {
                break;
            }
            let next: Vec<[u8; 32]> = layer
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => combine(left, right),
                    // Unpaired trailing node is promoted as-is
                    [single] => *single,
                    _ => unreachable!("chunks(2) yields one or two nodes"),
                })
                .collect();
            layers.push(next);
        }

        Ok(Self { layers })
    }

    /// Builds the tree for a payment manifest
    pub fn from_payments(payments: &[PaymentLeaf]) -> Result<Self> {
        Self::new(payments.iter().map(PaymentLeaf::hash).collect())
    }

    pub fn root(&self) -> [u8; 32] {
        self.layers
            .last()
            .and_then(|layer| layer.first())
            .copied()
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub fn leaf_count(&self) -> usize {
        self.layers.first().map_or(0, Vec::len)
    }

    /// Proof for a leaf hash, or None if the leaf is not committed
    pub fn proof(&self, leaf: &[u8; 32]) -> Option<Vec<[u8; 32]>> {
        let position = self.layers.first()?.binary_search(leaf).ok()?;
        Some(self.proof_for_position(position))
    }

    /// Proof for a payment, or None if the payment is not committed
    pub fn payment_proof(&self, payment: &PaymentLeaf) -> Option<Vec<[u8; 32]>> {
        self.proof(&payment.hash())
    }

    /// Sibling path for the leaf at `position` within the sorted bottom layer
    pub fn proof_for_position(&self, mut position: usize) -> Vec<[u8; 32]> {
        let mut proof = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            let sibling = if position % 2 == 0 {
                position + 1
            } else {
                position - 1
            };
            if let Some(node) = layer.get(sibling) {
                proof.push(*node);
            }
            position /= 2;
        }
        proof
    }
}

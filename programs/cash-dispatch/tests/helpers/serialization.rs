//! Serialization helpers for the DistributionTree account and payment manifests
//!
//! NOTE: This is written for mollusk-svm 0.5.1 with solana-sdk 2.2
//! DistributionTree is a Borsh `#[account]`: 8-byte discriminator, then fields
//! in declaration order. Accounts are allocated with every Option at full size,
//! so serialized data is zero-padded up to `distribution_tree_size`.

use {
    cash_dispatch::merkle::{MerkleTree, PaymentLeaf},
    solana_sdk::pubkey::Pubkey,
};

// Anchor discriminator (sha256("account:DistributionTree")[..8])
pub const DISTRIBUTION_TREE_DISCRIMINATOR: [u8; 8] = [0xa3, 0xea, 0x26, 0x4d, 0x00, 0x26, 0x86, 0x9d];

// Size without batch id bytes and bitmap words
pub const DISTRIBUTION_TREE_BASE_SIZE: usize = 214;

// Matching the program's bitmap constants
pub const BITMAP_WORD_BITS: u64 = 64;
pub const BITMAP_ARRAY_STEP: usize = 64;

pub fn distribution_tree_size(batch_id_len: usize, words: usize) -> usize {
    DISTRIBUTION_TREE_BASE_SIZE + batch_id_len + words * 8
}

pub fn required_words(total_recipients: u64) -> usize {
    total_recipients.div_ceil(BITMAP_WORD_BITS) as usize
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    InsufficientBitmapSpace = 0,
    Active = 1,
    Paused = 2,
    Cancelled = 3,
    Complete = 4,
    Reclaimed = 5,
}

impl Status {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Status::InsufficientBitmapSpace,
            1 => Status::Active,
            2 => Status::Paused,
            3 => Status::Cancelled,
            4 => Status::Complete,
            5 => Status::Reclaimed,
            other => panic!("unknown status {other}"),
        }
    }
}

/// Mirror of the on-chain DistributionTree
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeData {
    pub version: u8,
    pub bump: u8,
    pub authority: Pubkey,
    pub batch_id: String,
    pub status: Status,
    pub allow_claims: bool,
    pub merkle_root: [u8; 32],
    pub mint: Pubkey,
    pub token_vault: Pubkey,
    pub total_number_recipients: u64,
    pub number_distributed: u64,
    pub start_ts: i64,
    pub end_ts: Option<i64>,
    pub bitmap: Vec<u64>,
    pub gatekeeper_network: Option<Pubkey>,
}

impl TreeData {
    /// Freshly initialized tree: claims allowed, no window, bitmap at its initial size
    pub fn new(
        authority: Pubkey,
        batch_id: &str,
        bump: u8,
        mint: Pubkey,
        token_vault: Pubkey,
        merkle_root: [u8; 32],
        total_number_recipients: u64,
    ) -> Self {
        let words = required_words(total_number_recipients).min(BITMAP_ARRAY_STEP);
        let status = if words == required_words(total_number_recipients) {
            Status::Active
        } else {
            Status::InsufficientBitmapSpace
        };
        Self {
            version: 1,
            bump,
            authority,
            batch_id: batch_id.to_string(),
            status,
            allow_claims: true,
            merkle_root,
            mint,
            token_vault,
            total_number_recipients,
            number_distributed: 0,
            start_ts: 0,
            end_ts: None,
            bitmap: vec![0; words],
            gatekeeper_network: None,
        }
    }

    pub fn size(&self) -> usize {
        distribution_tree_size(self.batch_id.len(), self.bitmap.len())
    }

    pub fn is_set(&self, index: u64) -> bool {
        self.bitmap
            .get((index / BITMAP_WORD_BITS) as usize)
            .is_some_and(|word| word & (1 << (index % BITMAP_WORD_BITS)) != 0)
    }

    pub fn mark(&mut self, index: u64) {
        self.bitmap[(index / BITMAP_WORD_BITS) as usize] |= 1 << (index % BITMAP_WORD_BITS);
        self.number_distributed += 1;
    }
}

/// Serialize DistributionTree for test account data
pub fn serialize_distribution_tree(tree: &TreeData) -> Vec<u8> {
    let mut data = Vec::with_capacity(tree.size());

    data.extend_from_slice(&DISTRIBUTION_TREE_DISCRIMINATOR);
    data.push(tree.version);
    data.push(tree.bump);
    data.extend_from_slice(&tree.authority.to_bytes());
    data.extend_from_slice(&(tree.batch_id.len() as u32).to_le_bytes());
    data.extend_from_slice(tree.batch_id.as_bytes());
    data.push(tree.status as u8);
    data.push(tree.allow_claims as u8);
    data.extend_from_slice(&tree.merkle_root);
    data.extend_from_slice(&tree.mint.to_bytes());
    data.extend_from_slice(&tree.token_vault.to_bytes());
    data.extend_from_slice(&tree.total_number_recipients.to_le_bytes());
    data.extend_from_slice(&tree.number_distributed.to_le_bytes());
    data.extend_from_slice(&tree.start_ts.to_le_bytes());
    match tree.end_ts {
        Some(end_ts) => {
            data.push(1);
            data.extend_from_slice(&end_ts.to_le_bytes());
        }
        None => data.push(0),
    }
    data.extend_from_slice(&(tree.bitmap.len() as u32).to_le_bytes());
    for word in &tree.bitmap {
        data.extend_from_slice(&word.to_le_bytes());
    }
    match tree.gatekeeper_network {
        Some(network) => {
            data.push(1);
            data.extend_from_slice(&network.to_bytes());
        }
        None => data.push(0),
    }

    data.resize(tree.size(), 0);
    data
}

/// Parse DistributionTree account data
pub fn deserialize_distribution_tree(data: &[u8]) -> TreeData {
    assert_eq!(&data[0..8], &DISTRIBUTION_TREE_DISCRIMINATOR, "not a DistributionTree");
    let mut reader = Reader { data, offset: 8 };

    let version = reader.u8();
    let bump = reader.u8();
    let authority = reader.pubkey();
    let batch_id_len = reader.u32() as usize;
    let batch_id = String::from_utf8(reader.bytes(batch_id_len).to_vec()).unwrap();
    let status = Status::from_u8(reader.u8());
    let allow_claims = reader.u8() == 1;
    let merkle_root: [u8; 32] = reader.bytes(32).try_into().unwrap();
    let mint = reader.pubkey();
    let token_vault = reader.pubkey();
    let total_number_recipients = reader.u64();
    let number_distributed = reader.u64();
    let start_ts = reader.u64() as i64;
    let end_ts = (reader.u8() == 1).then(|| reader.u64() as i64);
    let words = reader.u32() as usize;
    let bitmap = (0..words).map(|_| reader.u64()).collect();
    let gatekeeper_network = (reader.u8() == 1).then(|| reader.pubkey());

    TreeData {
        version,
        bump,
        authority,
        batch_id,
        status,
        allow_claims,
        merkle_root,
        mint,
        token_vault,
        total_number_recipients,
        number_distributed,
        start_ts,
        end_ts,
        bitmap,
        gatekeeper_network,
    }
}

struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl Reader<'_> {
    fn bytes(&mut self, len: usize) -> &[u8] {
        let slice = &self.data[self.offset..self.offset + len];
        self.offset += len;
        slice
    }

    fn u8(&mut self) -> u8 {
        self.bytes(1)[0]
    }

    fn u32(&mut self) -> u32 {
        u32::from_le_bytes(self.bytes(4).try_into().unwrap())
    }

    fn u64(&mut self) -> u64 {
        u64::from_le_bytes(self.bytes(8).try_into().unwrap())
    }

    fn pubkey(&mut self) -> Pubkey {
        Pubkey::new_from_array(self.bytes(32).try_into().unwrap())
    }
}

/// Serialize a Civic gateway token
///
/// Layout: features u8, parent Option<Pubkey>, owner_wallet, owner_identity
/// Option<Pubkey>, gatekeeper_network, issuing_gatekeeper, state u8,
/// expire_time Option<i64>
pub fn serialize_gateway_token(
    owner: Pubkey,
    network: Pubkey,
    state: u8,
    expire_time: Option<i64>,
) -> Vec<u8> {
    let mut data = Vec::new();
    data.push(0); // features
    data.push(0); // parent_gateway_token: None
    data.extend_from_slice(&owner.to_bytes());
    data.push(0); // owner_identity: None
    data.extend_from_slice(&network.to_bytes());
    data.extend_from_slice(&Pubkey::new_unique().to_bytes()); // issuing_gatekeeper
    data.push(state);
    match expire_time {
        Some(expiry) => {
            data.push(1);
            data.extend_from_slice(&expiry.to_le_bytes());
        }
        None => data.push(0),
    }
    data
}

/// A payment manifest and its Merkle tree, built with the program's own tree code
pub struct Manifest {
    pub payments: Vec<(u64, Pubkey, u64)>,
    tree: MerkleTree,
}

impl Manifest {
    pub fn new(amounts: &[u64]) -> Self {
        let payments: Vec<(u64, Pubkey, u64)> = amounts
            .iter()
            .enumerate()
            .map(|(index, amount)| (index as u64, Pubkey::new_unique(), *amount))
            .collect();
        Self::from_payments(payments)
    }

    pub fn from_payments(payments: Vec<(u64, Pubkey, u64)>) -> Self {
        let leaves: Vec<PaymentLeaf> = payments
            .iter()
            .map(|(index, recipient, amount)| leaf(*index, recipient, *amount))
            .collect();
        let tree = MerkleTree::from_payments(&leaves).unwrap();
        Self { payments, tree }
    }

    pub fn root(&self) -> [u8; 32] {
        self.tree.root()
    }

    pub fn total_amount(&self) -> u64 {
        self.payments.iter().map(|(_, _, amount)| amount).sum()
    }

    pub fn len(&self) -> u64 {
        self.payments.len() as u64
    }

    pub fn recipient(&self, position: usize) -> Pubkey {
        self.payments[position].1
    }

    pub fn amount(&self, position: usize) -> u64 {
        self.payments[position].2
    }

    pub fn proof(&self, position: usize) -> Vec<[u8; 32]> {
        let (index, recipient, amount) = &self.payments[position];
        self.tree
            .payment_proof(&leaf(*index, recipient, *amount))
            .unwrap()
    }
}

fn leaf(index: u64, recipient: &Pubkey, amount: u64) -> PaymentLeaf {
    PaymentLeaf::new(
        index,
        anchor_lang::prelude::Pubkey::new_from_array(recipient.to_bytes()),
        amount,
    )
}

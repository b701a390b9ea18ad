use anchor_lang::prelude::*;

// PDA seeds
#[constant]
pub const DISTRIBUTION_TREE_SEED: &[u8] = b"DISTRIBUTION_TREE";

#[constant]
pub const CURRENT_VERSION: u8 = 1;

// Batch id bounds (bytes); the id is a PDA seed so it must stay under 32
pub const BATCH_ID_MINIMUM_LENGTH: usize = 6;
pub const BATCH_ID_MAXIMUM_LENGTH: usize = 20;

// Settlement bitmap
pub const BITMAP_WORD_BITS: u64 = 64;
/// Words appended per expand call (and the initial allocation cap).
/// 64 words = 512 bytes, well under the 10 KiB per-instruction realloc limit.
pub const BITMAP_ARRAY_STEP: usize = 64;

// Civic gateway program (identity gate issuer)
pub const GATEWAY_PROGRAM_ID: Pubkey = anchor_lang::pubkey!("gatem74V238djXdzWnJf94Wo1DcnuGkfijbf3AuBhfs");

// Protocol fee, charged on top of the vault funding at initialize.
// Thresholds are in base units of a 6-decimal stablecoin.
pub const FEE_TIERS: [(u64, u64); 4] = [
    (10_000_000_000_000, 1), // >= 10,000,000: 1 bp
    (1_000_000_000_000, 2),  // >= 1,000,000: 2 bps
    (100_000_000_000, 5),    // >= 100,000: 5 bps
    (10_000_000_000, 10),    // >= 10,000: 10 bps
];
pub const BPS_DENOMINATOR: u64 = 10_000;
pub const MAX_FEE_AMOUNT: u64 = 5_000_000_000; // 5,000 tokens

#[cfg(feature = "mainnet")]
pub const FEES_WALLET: Pubkey = anchor_lang::pubkey!("FPWbPFvTHhL2ChMAquhrGKJnVaVcJXt5thXy95TfULuX");

#[cfg(all(feature = "devnet", not(feature = "mainnet")))]
pub const FEES_WALLET: Pubkey = anchor_lang::pubkey!("2P9bEhXofSW5UbLm3QQexVgFnS47dh5ZCCRg2CVTGLUL");

#[cfg(not(any(feature = "mainnet", feature = "devnet")))]
pub const FEES_WALLET: Pubkey = anchor_lang::pubkey!("2EqSNCRzDofyFgWeHX2LwEJnADNBBDw87KhF23YLdaiw");

// DistributionTree size calculation (Borsh, options counted at full size):
// - discriminator: 8
// - version: 1
// - bump: 1
// - authority: 32
// - batch_id: 4 + len
// - status: 1
// - allow_claims: 1
// - merkle_root: 32
// - mint: 32
// - token_vault: 32
// - total_number_recipients: 8
// - number_distributed: 8
// - start_ts: 8
// - end_ts: 1 + 8
// - recipients_distributed_bitmap: 4 + 8 * words
// - gatekeeper_network: 1 + 32
pub const DISTRIBUTION_TREE_BASE_SIZE: usize =
    8 + 1 + 1 + 32 + 4 + 1 + 1 + 32 + 32 + 32 + 8 + 8 + 8 + 9 + 4 + 33; // 214 bytes

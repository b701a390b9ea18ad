use anchor_lang::prelude::*;

#[event]
pub struct DistributionInitialized {
    pub distribution_tree: Pubkey,
    pub authority: Pubkey,
    pub batch_id: String,
    pub mint: Pubkey,
    pub token_vault: Pubkey,
    pub merkle_root: [u8; 32],
    pub total_number_recipients: u64,
    pub transfer_to_vault_amount: u64,
    pub fee_amount: u64,
    pub awaiting_capacity: bool,
    pub timestamp: i64,
}

#[event]
pub struct PaymentDistributed {
    pub distribution_tree: Pubkey,
    pub recipient: Pubkey,
    pub index: u64,
    pub amount: u64,
    /// True when the recipient pulled the payment, false when the authority pushed it
    pub claimed: bool,
    pub number_distributed: u64,
    pub complete: bool,
    pub timestamp: i64,
}

#[event]
pub struct DistributionCancelled {
    pub distribution_tree: Pubkey,
    pub authority: Pubkey,
    pub refunded_amount: u64,
    pub number_distributed: u64,
    /// Payments left unsettled by the cancellation
    pub remaining_recipients: u64,
    pub timestamp: i64,
}

#[event]
pub struct DistributionExpanded {
    pub distribution_tree: Pubkey,
    pub authority: Pubkey,
    pub words_added: u64,
    pub bitmap_words: u64,
    pub active: bool,
    pub timestamp: i64,
}

#[event]
pub struct DistributionPaused {
    pub distribution_tree: Pubkey,
    pub authority: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct DistributionResumed {
    pub distribution_tree: Pubkey,
    pub authority: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct DistributionReclaimed {
    pub distribution_tree: Pubkey,
    pub authority: Pubkey,
    pub bitmap_words_released: u64,
    pub timestamp: i64,
}

#[event]
pub struct DistributionClosed {
    pub distribution_tree: Pubkey,
    pub authority: Pubkey,
    pub vault_swept: u64,
    pub rent_recovered: u64,
    pub timestamp: i64,
}

use anchor_lang::prelude::*;

use crate::{
    bitmap,
    constants::{
        BATCH_ID_MAXIMUM_LENGTH, BATCH_ID_MINIMUM_LENGTH, CURRENT_VERSION,
        DISTRIBUTION_TREE_BASE_SIZE,
    },
    errors::DistributionError,
    instructions::InitializeParams,
    merkle::{self, PaymentLeaf},
};

/// Lifecycle of a distribution tree.
///
/// ```text
/// initialize -> InsufficientBitmapSpace --expand--> Active <-> Paused
///                                                   |           |
///                                                   v           v
///                                        Complete | Cancelled (terminal)
///                                            |
///                                            v
///                                        Reclaimed
/// ```
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistributionStatus {
    /// Bitmap does not yet cover every recipient; expand before paying out
    InsufficientBitmapSpace,
    Active,
    Paused,
    Cancelled,
    Complete,
    /// Complete, with the bitmap released for rent
    Reclaimed,
}

/// One batch of committed payments, keyed by ["DISTRIBUTION_TREE", authority, batch_id]
#[account]
#[derive(Debug)]
pub struct DistributionTree {
    /// Schema version for future upgrades
    pub version: u8,
    /// Bump seed for PDA derivation
    pub bump: u8,
    /// Administers the batch: distribute, cancel, pause/resume, expand, reclaim, close
    pub authority: Pubkey,
    /// Human-chosen tag, part of the PDA seeds
    pub batch_id: String,
    pub status: DistributionStatus,
    /// Whether recipients may pull their own payment
    pub allow_claims: bool,
    /// Root committing to every (index, recipient, amount) leaf
    pub merkle_root: [u8; 32],
    pub mint: Pubkey,
    /// Holding account (ATA owned by this PDA)
    pub token_vault: Pubkey,
    pub total_number_recipients: u64,
    pub number_distributed: u64,
    pub start_ts: i64,
    pub end_ts: Option<i64>,
    /// Bit i set = leaf index i has been paid
    pub recipients_distributed_bitmap: Vec<u64>,
    /// When set, every payment requires a gateway token under this network
    pub gatekeeper_network: Option<Pubkey>,
}

impl DistributionTree {
    /// Account size for a batch id of `batch_id_len` bytes and `words` bitmap words
    pub fn space(batch_id_len: usize, words: usize) -> usize {
        DISTRIBUTION_TREE_BASE_SIZE + batch_id_len + words * 8
    }

    /// Size allocated at initialize
    pub fn initial_space(params: &InitializeParams) -> usize {
        Self::space(
            params.batch_id.len(),
            bitmap::initial_words(params.total_number_recipients),
        )
    }

    #[cfg(test)]
    pub fn current_space(&self) -> usize {
        Self::space(self.batch_id.len(), self.recipients_distributed_bitmap.len())
    }

    /// Size after one expand step (unchanged when no growth is needed)
    pub fn space_after_expansion(&self) -> usize {
        Self::space(self.batch_id.len(), self.words_after_expansion())
    }

    /// Size once the bitmap has been released
    pub fn space_without_bitmap(&self) -> usize {
        Self::space(self.batch_id.len(), 0)
    }

    fn words_after_expansion(&self) -> usize {
        let required = bitmap::required_words(self.total_number_recipients);
        let current = self.recipients_distributed_bitmap.len();
        required.min(current.saturating_add(crate::constants::BITMAP_ARRAY_STEP)).max(current)
    }

    /// Checks initialize parameters in the documented order
    pub fn validate_params(params: &InitializeParams, now: i64) -> Result<()> {
        require!(
            params.total_number_recipients > 0,
            DistributionError::NoRecipients
        );
        require!(
            params.transfer_to_vault_amount > 0,
            DistributionError::ZeroTransferAmount
        );
        require!(
            params.batch_id.len() >= BATCH_ID_MINIMUM_LENGTH,
            DistributionError::BatchIdTooShort
        );
        require!(
            params.batch_id.len() <= BATCH_ID_MAXIMUM_LENGTH,
            DistributionError::BatchIdTooLong
        );
        if let Some(end_ts) = params.end_ts {
            require!(
                params.start_ts <= end_ts,
                DistributionError::StartTimestampAfterEnd
            );
            require!(end_ts >= now, DistributionError::TimestampsNotInFuture);
        }
        Ok(())
    }

    pub fn initialize(
        &mut self,
        bump: u8,
        authority: Pubkey,
        mint: Pubkey,
        token_vault: Pubkey,
        params: &InitializeParams,
        now: i64,
    ) -> Result<()> {
        Self::validate_params(params, now)?;

        self.version = CURRENT_VERSION;
        self.bump = bump;
        self.authority = authority;
        self.batch_id = params.batch_id.clone();
        self.allow_claims = params.allow_claims;
        self.merkle_root = params.merkle_root;
        self.mint = mint;
        self.token_vault = token_vault;
        self.total_number_recipients = params.total_number_recipients;
        self.number_distributed = 0;
        self.start_ts = params.start_ts;
        self.end_ts = params.end_ts;
        self.recipients_distributed_bitmap =
            vec![0; bitmap::initial_words(params.total_number_recipients)];
        self.gatekeeper_network = params.gatekeeper_network;
        self.status = if self.has_capacity() {
            DistributionStatus::Active
        } else {
            DistributionStatus::InsufficientBitmapSpace
        };

        Ok(())
    }

    pub fn has_capacity(&self) -> bool {
        bitmap::covers(
            &self.recipients_distributed_bitmap,
            self.total_number_recipients,
        )
    }

    pub fn require_authority(&self, signer: &Pubkey) -> Result<()> {
        require_keys_eq!(
            *signer,
            self.authority,
            DistributionError::SignerNotAuthorized
        );
        Ok(())
    }

    /// Status and end-of-window gate shared by distribute and claim
    pub fn require_payable(&self, now: i64) -> Result<()> {
        require!(
            self.status == DistributionStatus::Active,
            DistributionError::DistributionNotActive
        );
        if let Some(end_ts) = self.end_ts {
            require!(now <= end_ts, DistributionError::DistributionNotActive);
        }
        Ok(())
    }

    /// Extra gates for recipient-initiated claims
    pub fn require_claimable(&self, now: i64) -> Result<()> {
        require!(self.allow_claims, DistributionError::ClaimsNotAllowed);
        require!(
            now >= self.start_ts,
            DistributionError::DistributionNotStarted
        );
        Ok(())
    }

    pub fn is_claimed(&self, index: u64) -> bool {
        bitmap::is_set(&self.recipients_distributed_bitmap, index)
    }

    pub fn verify_proof(&self, leaf: &PaymentLeaf, proof: &[[u8; 32]]) -> Result<()> {
        require!(
            leaf.index < self.total_number_recipients,
            DistributionError::InvalidProof
        );
        require!(
            merkle::verify(proof, self.merkle_root, leaf.hash()),
            DistributionError::InvalidProof
        );
        Ok(())
    }

    /// Marks `index` paid and advances the settled count, completing the
    /// tree when the last recipient is paid
    pub fn record_payment(&mut self, index: u64) -> Result<()> {
        let newly_set = bitmap::set(&mut self.recipients_distributed_bitmap, index)?;
        require!(newly_set, DistributionError::AlreadyClaimed);

        self.number_distributed = self
            .number_distributed
            .checked_add(1)
            .ok_or(DistributionError::MathOverflow)?;

        if self.number_distributed == self.total_number_recipients {
            self.status = DistributionStatus::Complete;
        }
        Ok(())
    }

    pub fn pause(&mut self) -> Result<()> {
        require!(
            self.status == DistributionStatus::Active,
            DistributionError::InvalidDistributionStatus
        );
        self.status = DistributionStatus::Paused;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        require!(
            self.status == DistributionStatus::Paused,
            DistributionError::InvalidDistributionStatus
        );
        self.status = DistributionStatus::Active;
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<()> {
        require!(
            matches!(
                self.status,
                DistributionStatus::Active | DistributionStatus::Paused
            ),
            DistributionError::DistributionNotActive
        );
        self.status = DistributionStatus::Cancelled;
        Ok(())
    }

    /// Grows the bitmap by one bounded step. Returns the number of words added.
    pub fn expand(&mut self) -> Result<usize> {
        let required = bitmap::required_words(self.total_number_recipients);
        require!(
            self.status == DistributionStatus::InsufficientBitmapSpace
                && self.recipients_distributed_bitmap.len() < required,
            DistributionError::InvalidDistributionStatus
        );

        let added = bitmap::grow(&mut self.recipients_distributed_bitmap, required);
        if self.has_capacity() {
            self.status = DistributionStatus::Active;
        }
        Ok(added)
    }

    /// Releases the bitmap once every recipient is paid. Returns the words released.
    pub fn reclaim(&mut self) -> Result<usize> {
        require!(
            self.status == DistributionStatus::Complete,
            DistributionError::DistributionNotComplete
        );
        let released = self.recipients_distributed_bitmap.len();
        self.recipients_distributed_bitmap = Vec::new();
        self.status = DistributionStatus::Reclaimed;
        Ok(released)
    }

    pub fn require_closable(&self, acknowledge_irreversible: bool) -> Result<()> {
        require!(
            acknowledge_irreversible,
            DistributionError::MustAcknowledgeIrreversible
        );
        require!(
            matches!(
                self.status,
                DistributionStatus::Complete
                    | DistributionStatus::Reclaimed
                    | DistributionStatus::Cancelled
            ),
            DistributionError::DistributionNotComplete
        );
        Ok(())
    }

    pub fn remaining_recipients(&self) -> u64 {
        self.total_number_recipients
            .saturating_sub(self.number_distributed)
    }
}

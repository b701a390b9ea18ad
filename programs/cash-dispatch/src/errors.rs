use anchor_lang::prelude::*;

#[error_code]
pub enum DistributionError {
    #[msg("Distribution must have at least one recipient")]
    NoRecipients,

    #[msg("Transfer amount must be greater than zero")]
    ZeroTransferAmount,

    #[msg("Batch ID is too short")]
    BatchIdTooShort,

    #[msg("Batch ID is too long")]
    BatchIdTooLong,

    #[msg("Start timestamp is after end timestamp")]
    StartTimestampAfterEnd,

    #[msg("End timestamp is already in the past")]
    TimestampsNotInFuture,

    #[msg("Invalid Merkle proof")]
    InvalidProof,

    #[msg("Payment at this index has already been settled")]
    AlreadyClaimed,

    #[msg("Signer is not authorized for this distribution tree")]
    SignerNotAuthorized,

    #[msg("Distribution is not active")]
    DistributionNotActive,

    #[msg("Invalid distribution status for this operation")]
    InvalidDistributionStatus,

    #[msg("Self-service claims are not allowed for this distribution")]
    ClaimsNotAllowed,

    #[msg("Distribution has not started")]
    DistributionNotStarted,

    #[msg("Invalid gateway token")]
    InvalidGatewayToken,

    #[msg("Distribution is not complete")]
    DistributionNotComplete,

    #[msg("Must acknowledge that closing the distribution tree is irreversible")]
    MustAcknowledgeIrreversible,

    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Index is outside the settlement bitmap")]
    IndexOutOfBounds,

    #[msg("Invalid token mint")]
    InvalidTokenMint,

    #[msg("Invalid token vault")]
    InvalidTokenVault,

    #[msg("Transfer account was not provided")]
    InvalidTransferAccount,
}

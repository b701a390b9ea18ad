//! Identity gate backed by Civic gateway tokens.
//!
//! Tokens are read directly from the gateway program's account layout and
//! verified the way the gateway client does it: owner, network, state, then
//! expiry with an optional tolerance.

use anchor_lang::prelude::*;

use crate::{constants::GATEWAY_PROGRAM_ID, processor::IdentityGate};

/// Feature bit marking a token that expires
pub const FEATURE_EXPIRABLE: u8 = 1 << 0;
/// Feature bit marking a single-use session token
pub const FEATURE_SESSION: u8 = 1 << 1;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GatewayTokenState {
    Active,
    Frozen,
    Revoked,
}

/// On-chain gateway token, in the gateway program's Borsh layout
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct GatewayToken {
    pub features: u8,
    pub parent_gateway_token: Option<Pubkey>,
    pub owner_wallet: Pubkey,
    pub owner_identity: Option<Pubkey>,
    pub gatekeeper_network: Pubkey,
    pub issuing_gatekeeper: Pubkey,
    pub state: GatewayTokenState,
    pub expire_time: Option<i64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerificationOptions {
    pub check_expiry: bool,
    pub expiry_tolerance_seconds: u32,
}

impl Default for VerificationOptions {
    fn default() -> Self {
        Self {
            check_expiry: true,
            expiry_tolerance_seconds: 0,
        }
    }
}

/// Why a gateway token was refused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GatewayTokenError {
    InvalidOwner,
    IncorrectGatekeeper,
    TokenNotActive,
    TokenExpired,
}

impl GatewayToken {
    /// Parses a gateway token from raw account data. Trailing bytes are ignored.
    pub fn parse(program_owner: &Pubkey, data: &[u8]) -> Option<Self> {
        if *program_owner != GATEWAY_PROGRAM_ID {
            return None;
        }
        Self::deserialize(&mut &data[..]).ok()
    }

    pub fn is_session(&self) -> bool {
        self.features & FEATURE_SESSION != 0
    }

    /// A token stays valid through its expire time plus the tolerance
    pub fn has_expired(&self, now: i64, tolerance_seconds: u32) -> bool {
        self.expire_time
            .is_some_and(|expiry| now > expiry.saturating_add(i64::from(tolerance_seconds)))
    }

    pub fn verify(
        &self,
        owner: &Pubkey,
        network: &Pubkey,
        now: i64,
        options: VerificationOptions,
    ) -> std::result::Result<(), GatewayTokenError> {
        if self.owner_wallet != *owner {
            return Err(GatewayTokenError::InvalidOwner);
        }
        if self.gatekeeper_network != *network {
            return Err(GatewayTokenError::IncorrectGatekeeper);
        }
        if self.state != GatewayTokenState::Active {
            return Err(GatewayTokenError::TokenNotActive);
        }
        if options.check_expiry && self.has_expired(now, options.expiry_tolerance_seconds) {
            return Err(GatewayTokenError::TokenExpired);
        }
        Ok(())
    }
}

/// Gate over an optional gateway token account supplied with the instruction
pub struct GatewayTokenGate<'a, 'info> {
    token: Option<&'a AccountInfo<'info>>,
    now: i64,
    options: VerificationOptions,
}

impl<'a, 'info> GatewayTokenGate<'a, 'info> {
    pub fn new(token: Option<&'a AccountInfo<'info>>, now: i64) -> Self {
        Self::with_options(token, now, VerificationOptions::default())
    }

    pub fn with_options(
        token: Option<&'a AccountInfo<'info>>,
        now: i64,
        options: VerificationOptions,
    ) -> Self {
        Self {
            token,
            now,
            options,
        }
    }
}

impl IdentityGate for GatewayTokenGate<'_, '_> {
    fn verify_gate_token(&self, owner: &Pubkey, network: &Pubkey) -> bool {
        let Some(info) = self.token else {
            msg!("Gateway token account missing");
            return false;
        };
        let Ok(data) = info.try_borrow_data() else {
            return false;
        };
        let Some(token) = GatewayToken::parse(info.owner, &data) else {
            msg!("Account {} is not a gateway token", info.key);
            return false;
        };
        match token.verify(owner, network, self.now, self.options) {
            Ok(()) => true,
            Err(reason) => {
                msg!("Gateway token {} refused: {:?}", info.key, reason);
                false
            }
        }
    }
}

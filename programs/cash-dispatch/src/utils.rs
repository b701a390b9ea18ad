use anchor_lang::prelude::*;
use anchor_spl::token_interface::{self, CloseAccount, TransferChecked};

use crate::{
    constants::{BPS_DENOMINATOR, DISTRIBUTION_TREE_SEED, FEE_TIERS, MAX_FEE_AMOUNT},
    errors::DistributionError,
    processor::TokenTransfer,
    state::DistributionTree,
};

/// Protocol fee on a vault funding amount.
/// Tiered basis points, zero below the lowest tier, capped at MAX_FEE_AMOUNT.
pub fn calculate_fee(amount: u64) -> Result<u64> {
    let Some(&(_, bps)) = FEE_TIERS.iter().find(|(threshold, _)| amount >= *threshold) else {
        return Ok(0);
    };

    let fee: u64 = (amount as u128)
        .checked_mul(bps as u128)
        .and_then(|scaled| scaled.checked_div(BPS_DENOMINATOR as u128))
        .and_then(|fee| fee.try_into().ok())
        .ok_or(DistributionError::MathOverflow)?;

    Ok(fee.min(MAX_FEE_AMOUNT))
}

/// Owned copy of a distribution tree's PDA seeds, so the tree can be
/// mutably borrowed while a signing CPI is prepared
pub struct TreeSigner {
    authority: Pubkey,
    batch_id: String,
    bump: [u8; 1],
}

impl TreeSigner {
    pub fn new(tree: &DistributionTree) -> Self {
        Self {
            authority: tree.authority,
            batch_id: tree.batch_id.clone(),
            bump: [tree.bump],
        }
    }

    pub fn seeds(&self) -> [&[u8]; 4] {
        [
            DISTRIBUTION_TREE_SEED,
            self.authority.as_ref(),
            self.batch_id.as_bytes(),
            &self.bump,
        ]
    }
}

/// `TokenTransfer` over `transfer_checked` CPIs.
///
/// `from`/`to` keys are resolved against the token accounts handed in at
/// construction; all transfers are signed by `authority` (with `signer_seeds`
/// when the authority is the distribution PDA).
pub struct CpiTokenTransfer<'a, 'info> {
    token_program: AccountInfo<'info>,
    mint: AccountInfo<'info>,
    decimals: u8,
    authority: AccountInfo<'info>,
    token_accounts: Vec<AccountInfo<'info>>,
    signer_seeds: &'a [&'a [&'a [u8]]],
}

impl<'a, 'info> CpiTokenTransfer<'a, 'info> {
    pub fn new(
        token_program: AccountInfo<'info>,
        mint: AccountInfo<'info>,
        decimals: u8,
        authority: AccountInfo<'info>,
        token_accounts: Vec<AccountInfo<'info>>,
        signer_seeds: &'a [&'a [&'a [u8]]],
    ) -> Self {
        Self {
            token_program,
            mint,
            decimals,
            authority,
            token_accounts,
            signer_seeds,
        }
    }

    fn account(&self, key: &Pubkey) -> Result<AccountInfo<'info>> {
        self.token_accounts
            .iter()
            .find(|info| info.key == key)
            .cloned()
            .ok_or_else(|| error!(DistributionError::InvalidTransferAccount))
    }
}

impl TokenTransfer for CpiTokenTransfer<'_, '_> {
    fn transfer(&self, from: &Pubkey, to: &Pubkey, amount: u64) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }

        let cpi_accounts = TransferChecked {
            from: self.account(from)?,
            mint: self.mint.clone(),
            to: self.account(to)?,
            authority: self.authority.clone(),
        };
        let cpi_ctx = CpiContext::new_with_signer(
            self.token_program.clone(),
            cpi_accounts,
            self.signer_seeds,
        );
        token_interface::transfer_checked(cpi_ctx, amount, self.decimals)
    }
}

/// Closes a PDA-owned token account, returning its rent to `destination`
pub fn close_token_account_with_pda<'info>(
    token_program: AccountInfo<'info>,
    account: AccountInfo<'info>,
    destination: AccountInfo<'info>,
    authority: AccountInfo<'info>,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    let cpi_accounts = CloseAccount {
        account,
        destination,
        authority,
    };
    let cpi_ctx = CpiContext::new_with_signer(token_program, cpi_accounts, signer_seeds);
    token_interface::close_account(cpi_ctx)
}

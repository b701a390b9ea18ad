//! A distribution tree with its vault and manifest, ready to be loaded into Mollusk

use {
    super::{
        accounts::{derive_ata, mint_account, program_account, token_account},
        instructions::{derive_distribution_tree, derive_vault, PaymentInput, PROGRAM_ID},
        serialization::{serialize_distribution_tree, Manifest, TreeData},
    },
    solana_sdk::{account::Account, pubkey::Pubkey, rent::Rent},
};

pub const BATCH_ID: &str = "payroll-2024";
pub const DECIMALS: u8 = 6;

pub struct Fixture {
    pub authority: Pubkey,
    pub batch_id: String,
    pub mint: Pubkey,
    pub distribution_tree: Pubkey,
    pub bump: u8,
    pub vault: Pubkey,
    pub authority_ata: Pubkey,
    pub manifest: Manifest,
    pub tree: TreeData,
}

impl Fixture {
    /// Active tree committing to one payment per amount
    pub fn new(amounts: &[u64]) -> Self {
        Self::from_manifest(Manifest::new(amounts))
    }

    pub fn from_manifest(manifest: Manifest) -> Self {
        let authority = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let (distribution_tree, bump) = derive_distribution_tree(&authority, BATCH_ID);
        let vault = derive_vault(&distribution_tree, &mint);
        let tree = TreeData::new(
            authority,
            BATCH_ID,
            bump,
            mint,
            vault,
            manifest.root(),
            manifest.len(),
        );

        Self {
            authority,
            batch_id: BATCH_ID.to_string(),
            mint,
            distribution_tree,
            bump,
            vault,
            authority_ata: derive_ata(&authority, &mint),
            manifest,
            tree,
        }
    }

    pub fn tree_account(&self, rent: &Rent) -> Account {
        program_account(
            rent.minimum_balance(self.tree.size()),
            serialize_distribution_tree(&self.tree),
            PROGRAM_ID,
        )
    }

    /// Vault holding whatever the unsettled payments still owe
    pub fn funded_vault(&self, rent: &Rent) -> Account {
        let owed: u64 = self
            .manifest
            .payments
            .iter()
            .filter(|(index, _, _)| !self.tree.is_set(*index))
            .map(|(_, _, amount)| amount)
            .sum();
        self.vault_account(owed, rent)
    }

    pub fn vault_account(&self, amount: u64, rent: &Rent) -> Account {
        token_account(self.mint, self.distribution_tree, amount, rent)
    }

    pub fn mint_account(&self, rent: &Rent) -> Account {
        mint_account(Some(self.authority), DECIMALS, u64::MAX / 2, rent)
    }

    pub fn recipient_ata(&self, position: usize) -> Pubkey {
        derive_ata(&self.manifest.recipient(position), &self.mint)
    }

    pub fn payment(&self, position: usize) -> PaymentInput {
        let (index, _, amount) = self.manifest.payments[position];
        PaymentInput {
            batch_id: self.batch_id.clone(),
            index,
            amount,
            proof: self.manifest.proof(position),
        }
    }

    /// Marks every payment settled
    pub fn complete(&mut self) {
        for index in 0..self.manifest.len() {
            self.tree.mark(index);
        }
        self.tree.status = super::serialization::Status::Complete;
    }
}

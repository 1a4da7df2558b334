//! Registry of participating banks.
//!
//! Built once at startup and shared by reference with every generator and
//! processor; replaces ambient global state with an explicit collaborator.

use crate::bank::Bank;
use bank_core::{AccountRef, BankId};
use std::sync::Arc;

/// All banks participating in a run, indexed by [`BankId`].
#[derive(Debug)]
pub struct BankRegistry {
    banks: Vec<Arc<Bank>>,
}

impl BankRegistry {
    /// Wrap the fully constructed banks. Bank IDs must equal their
    /// positions.
    pub fn new(banks: Vec<Bank>) -> Self {
        let banks: Vec<Arc<Bank>> = banks.into_iter().map(Arc::new).collect();
        debug_assert!(banks
            .iter()
            .enumerate()
            .all(|(position, bank)| bank.id().index() == position));
        Self { banks }
    }

    /// Look up a bank.
    pub fn bank(&self, id: BankId) -> Option<&Arc<Bank>> {
        self.banks.get(id.index())
    }

    /// All banks, in ID order.
    pub fn banks(&self) -> &[Arc<Bank>] {
        &self.banks
    }

    /// Number of registered banks.
    pub fn len(&self) -> usize {
        self.banks.len()
    }

    /// Whether the registry holds no banks.
    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }

    /// Whether `target` names an existing bank and account.
    pub fn contains(&self, target: AccountRef) -> bool {
        self.bank(target.bank)
            .is_some_and(|bank| bank.account(target.account).is_some())
    }
}

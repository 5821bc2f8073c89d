//! Per-account in-flight submission guard.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

/// Accounts that currently have a submission in flight.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    accounts: Arc<DashMap<String, Uuid>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `address` for submission `id`. `None` if already claimed.
    pub fn try_claim(&self, address: &str, id: Uuid) -> Option<InFlightGuard> {
        match self.accounts.entry(address.to_string()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                slot.insert(id);
                Some(InFlightGuard {
                    accounts: self.accounts.clone(),
                    address: address.to_string(),
                })
            }
        }
    }

    pub fn is_busy(&self, address: &str) -> bool {
        self.accounts.contains_key(address)
    }
}

/// Releases the claim on drop.
#[derive(Debug)]
pub struct InFlightGuard {
    accounts: Arc<DashMap<String, Uuid>>,
    address: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.accounts.remove(&self.address);
    }
}

//! Static Session Adapter
//!
//! Implements `SessionProvider` from an address set at login.

use crate::domain::Address;
use crate::ports::outbound::SessionProvider;
use parking_lot::RwLock;
use tracing::info;

/// Session holding the connected wallet address.
#[derive(Default)]
pub struct StaticSession {
    address: RwLock<Option<Address>>,
}

impl StaticSession {
    /// Session with `address` already connected.
    pub fn connected(address: Address) -> Self {
        Self {
            address: RwLock::new(Some(address)),
        }
    }

    /// Session with nobody logged in.
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Record a login.
    pub fn login(&self, address: Address) {
        info!(%address, "Wallet session connected");
        *self.address.write() = Some(address);
    }

    /// Record a logout.
    pub fn logout(&self) {
        info!("Wallet session disconnected");
        *self.address.write() = None;
    }
}

impl SessionProvider for StaticSession {
    fn active_address(&self) -> Option<Address> {
        *self.address.read()
    }
}

//! Remote email-assistant service
//!
//! The service owns the email and account lists and exposes a single bulk
//! delete endpoint. Session acquisition happens elsewhere; this module only
//! needs a bearer token.

mod client;
#[cfg(test)]
pub mod mock;
mod types;

use anyhow::Result;
use async_trait::async_trait;

use crate::deferred::ItemId;

pub use client::HttpRemote;
pub use types::{Account, Email};

/// Operations the application needs from the remote service
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Fetch the current email list
    async fn fetch_emails(&self) -> Result<Vec<Email>>;

    /// Fetch the linked accounts
    async fn fetch_accounts(&self) -> Result<Vec<Account>>;

    /// Irreversibly delete the given emails. Safe to repeat for the same ids.
    async fn delete_emails(&self, ids: &[ItemId]) -> Result<()>;

    /// Unlink an account; its emails stop appearing in the list
    async fn remove_account(&self, account_id: &str) -> Result<()>;
}

//! Mock remote service for unit testing.
//!
//! Records every delete call, can be told to fail, and can hold a delete
//! in flight until released.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Notify;

use super::{Account, Email, RemoteService};
use crate::deferred::ItemId;

pub struct MockRemote {
    emails: Mutex<Vec<Email>>,
    accounts: Mutex<Vec<Account>>,
    deletes: Mutex<Vec<Vec<ItemId>>>,
    removed_accounts: Mutex<Vec<String>>,
    delete_error: Mutex<Option<String>>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl Default for MockRemote {
    fn default() -> Self {
        Self {
            emails: Mutex::new(Vec::new()),
            accounts: Mutex::new(vec![account("acc-1", "google", "me@example.com")]),
            deletes: Mutex::new(Vec::new()),
            removed_accounts: Mutex::new(Vec::new()),
            delete_error: Mutex::new(None),
            gate: Mutex::new(None),
        }
    }
}

fn account(id: &str, provider: &str, email: &str) -> Account {
    Account {
        id: id.to_string(),
        provider: provider.to_string(),
        email: email.to_string(),
    }
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_emails(self, ids: &[&str]) -> Self {
        self.set_emails(ids);
        self
    }

    /// Replace what the service reports as the inbox
    pub fn set_emails(&self, ids: &[&str]) {
        *self.emails.lock().unwrap() = ids
            .iter()
            .map(|id| Email {
                id: ItemId::from(*id),
                sender: format!("sender-{id}"),
                account: "me@example.com".to_string(),
                subject: format!("subject-{id}"),
                summary: None,
                time: None,
                web_link: None,
            })
            .collect();
    }

    /// Link a second account whose inbox holds `ids`
    pub fn with_account(self, id: &str, provider: &str, email: &str, ids: &[&str]) -> Self {
        self.accounts
            .lock()
            .unwrap()
            .push(account(id, provider, email));
        self.emails
            .lock()
            .unwrap()
            .extend(ids.iter().map(|item| Email {
                id: ItemId::from(*item),
                sender: format!("sender-{item}"),
                account: email.to_string(),
                subject: format!("subject-{item}"),
                summary: None,
                time: None,
                web_link: None,
            }));
        self
    }

    /// Make every following delete fail with `reason`
    pub fn fail_deletes(&self, reason: &str) {
        *self.delete_error.lock().unwrap() = Some(reason.to_string());
    }

    pub fn succeed_deletes(&self) {
        *self.delete_error.lock().unwrap() = None;
    }

    /// Hold deletes until the returned handle is notified
    pub fn hold_deletes(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn delete_calls(&self) -> Vec<Vec<ItemId>> {
        self.deletes.lock().unwrap().clone()
    }

    pub fn removed_accounts(&self) -> Vec<String> {
        self.removed_accounts.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteService for MockRemote {
    async fn fetch_emails(&self) -> Result<Vec<Email>> {
        Ok(self.emails.lock().unwrap().clone())
    }

    async fn fetch_accounts(&self) -> Result<Vec<Account>> {
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn delete_emails(&self, ids: &[ItemId]) -> Result<()> {
        self.deletes.lock().unwrap().push(ids.to_vec());

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let error = self.delete_error.lock().unwrap().clone();
        match error {
            Some(reason) => Err(anyhow::anyhow!(reason)),
            None => {
                let mut emails = self.emails.lock().unwrap();
                emails.retain(|e| !ids.contains(&e.id));
                Ok(())
            }
        }
    }

    async fn remove_account(&self, account_id: &str) -> Result<()> {
        self.removed_accounts
            .lock()
            .unwrap()
            .push(account_id.to_string());

        let mut accounts = self.accounts.lock().unwrap();
        let Some(pos) = accounts.iter().position(|a| a.id == account_id) else {
            anyhow::bail!("API error (404 Not Found): unknown account");
        };
        let removed = accounts.remove(pos);
        drop(accounts);

        self.emails
            .lock()
            .unwrap()
            .retain(|e| e.account != removed.email);
        Ok(())
    }
}

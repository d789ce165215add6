//! HTTP client for the email-assistant API

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use super::RemoteService;
use super::types::{
    Account, AccountsResponse, DeleteRequest, Email, EmailsResponse, RemoveAccountRequest,
};
use crate::deferred::ItemId;

/// Remote service reached over HTTP with a bearer token
#[derive(Clone)]
pub struct HttpRemote {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpRemote {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", path))?;

        let response = check_status(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", path))
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        anyhow::bail!("API error ({}): {}", status, error_text);
    }
    Ok(response)
}

#[async_trait]
impl RemoteService for HttpRemote {
    async fn fetch_emails(&self) -> Result<Vec<Email>> {
        let response: EmailsResponse = self.get_json("/api/emails").await?;
        Ok(response.emails)
    }

    async fn fetch_accounts(&self) -> Result<Vec<Account>> {
        let response: AccountsResponse = self.get_json("/api/accounts").await?;
        Ok(response.accounts)
    }

    async fn delete_emails(&self, ids: &[ItemId]) -> Result<()> {
        let response = self
            .client
            .post(self.url("/api/emails/delete"))
            .bearer_auth(&self.token)
            .json(&DeleteRequest { email_ids: ids })
            .send()
            .await
            .context("Failed to send delete request")?;

        check_status(response).await?;
        tracing::debug!("Deleted {} emails on remote", ids.len());
        Ok(())
    }

    async fn remove_account(&self, account_id: &str) -> Result<()> {
        let response = self
            .client
            .post(self.url("/api/accounts/remove"))
            .bearer_auth(&self.token)
            .json(&RemoveAccountRequest { account_id })
            .send()
            .await
            .context("Failed to send remove account request")?;

        check_status(response).await?;
        tracing::debug!(account_id, "Removed account on remote");
        Ok(())
    }
}

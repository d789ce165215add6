use serde::{Deserialize, Serialize};

use crate::deferred::ItemId;

/// An email summary as returned by the service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    pub id: ItemId,
    #[serde(default)]
    pub sender: String,
    /// Address of the linked account the email arrived in
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub subject: String,
    /// AI-generated summary
    #[serde(default)]
    pub summary: Option<String>,
    /// Human readable receive time, preformatted by the service
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub web_link: Option<String>,
}

impl Email {
    /// Link to the email in the provider's web client
    pub fn web_url(&self) -> String {
        self.web_link
            .clone()
            .unwrap_or_else(|| format!("https://mail.google.com/mail/u/0/#inbox/{}", self.id.as_str()))
    }
}

/// A linked mailbox
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub provider: String,
    pub email: String,
}

impl Account {
    pub fn provider_name(&self) -> &str {
        match self.provider.as_str() {
            "google" => "Gmail",
            "microsoft" => "Outlook",
            other => other,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct EmailsResponse {
    #[serde(default)]
    pub emails: Vec<Email>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AccountsResponse {
    #[serde(default)]
    pub accounts: Vec<Account>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DeleteRequest<'a> {
    pub email_ids: &'a [ItemId],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RemoveAccountRequest<'a> {
    pub account_id: &'a str,
}

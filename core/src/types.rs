//! Account resource and the JSON envelopes it travels in.
//!
//! # Design
//! Identifiers are plain strings: the server owns UUID, country and
//! classification validation, so the client must be able to send values the
//! server will reject. Attribute fields are all optional and omitted from the
//! body when unset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Resource type discriminator for accounts.
pub const ACCOUNT_TYPE: &str = "accounts";

/// A bank account record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub organisation_id: String,
    #[serde(rename = "type", default)]
    pub resource_type: String,
    #[serde(default)]
    pub version: i64,
    /// Assigned by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,
    /// Assigned by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub attributes: Attributes,
}

impl Account {
    /// An account ready to be created: type `accounts`, version 0, no timestamps.
    pub fn new(id: impl Into<String>, organisation_id: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            id: id.into(),
            organisation_id: organisation_id.into(),
            resource_type: ACCOUNT_TYPE.to_string(),
            version: 0,
            created_on: None,
            modified_on: None,
            attributes,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attributes {
    /// `Personal` or `Business`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_classification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_matching_opt_out: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_bank_account_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_account_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_id_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bic: Option<String>,
    /// ISO 3166-1 alpha-2 code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joint_account: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_identification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// JSON:API style wrapper: `{"data": ...}`.
///
/// Single resources travel as `Envelope<Account>`, lists as
/// `Envelope<Option<Vec<Account>>>` so that `"data": null` reads as empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }

    pub fn into_inner(self) -> T {
        self.data
    }
}

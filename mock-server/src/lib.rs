use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const ACCOUNTS_PATH: &str = "/v1/organisation/accounts";

/// Page size used when `page[size]` is not given.
pub const DEFAULT_PAGE_SIZE: i64 = 100;

const CLASSIFICATIONS: [&str; 2] = ["Personal", "Business"];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub organisation_id: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub version: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAccount {
    pub data: Account,
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub version: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServerError {
    #[error("validation failure list:\n{}", .0.join("\n"))]
    Validation(Vec<String>),
    #[error("Account cannot be created as it violates a duplicate constraint")]
    Duplicate,
    #[error("id is not a valid uuid")]
    InvalidId,
    #[error("record {0} does not exist")]
    NotFound(String),
    #[error("invalid version number")]
    InvalidVersion,
    #[error("invalid version")]
    VersionConflict,
    #[error("{0} must be a non-negative integer")]
    InvalidPage(&'static str),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Duplicate | ServerError::VersionConflict => StatusCode::CONFLICT,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Validation(_)
            | ServerError::InvalidId
            | ServerError::InvalidVersion
            | ServerError::InvalidPage(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        debug!(%status, error = %self, "rejecting request");
        (status, Json(json!({ "error_message": self.to_string() }))).into_response()
    }
}

/// Accounts in creation order.
pub type Db = Arc<RwLock<Vec<Account>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route(ACCOUNTS_PATH, get(list_accounts).post(create_account))
        .route(
            &format!("{ACCOUNTS_PATH}/{{id}}"),
            get(fetch_account).delete(delete_account),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn self_link(id: &str) -> Value {
    json!({ "self": format!("{ACCOUNTS_PATH}/{id}") })
}

async fn create_account(
    State(db): State<Db>,
    Json(input): Json<CreateAccount>,
) -> Result<(StatusCode, Json<Value>), ServerError> {
    let mut account = input.data;
    validate(&account)?;

    let mut accounts = db.write().await;
    if accounts.iter().any(|existing| existing.id == account.id) {
        return Err(ServerError::Duplicate);
    }

    let now = Utc::now();
    account.version = 0;
    account.created_on = Some(now);
    account.modified_on = Some(now);
    accounts.push(account.clone());
    info!(id = %account.id, organisation_id = %account.organisation_id, "account created");

    let links = self_link(&account.id);
    Ok((StatusCode::CREATED, Json(json!({ "data": account, "links": links }))))
}

async fn fetch_account(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ServerError> {
    parse_id(&id)?;
    let accounts = db.read().await;
    let account = accounts
        .iter()
        .find(|account| account.id == id)
        .ok_or_else(|| ServerError::NotFound(id.clone()))?;
    Ok(Json(json!({ "data": account, "links": self_link(&id) })))
}

/// Deleting a record that no longer exists answers 204, like the first delete did.
async fn delete_account(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> Result<StatusCode, ServerError> {
    parse_id(&id)?;
    let version = params
        .version
        .as_deref()
        .and_then(|v| v.parse::<i64>().ok())
        .filter(|v| *v >= 0)
        .ok_or(ServerError::InvalidVersion)?;

    let mut accounts = db.write().await;
    let Some(index) = accounts.iter().position(|account| account.id == id) else {
        debug!(%id, "delete of missing account");
        return Ok(StatusCode::NO_CONTENT);
    };
    if accounts[index].version != version {
        return Err(ServerError::VersionConflict);
    }
    accounts.remove(index);
    info!(%id, version, "account deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn list_accounts(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ServerError> {
    let size = page_param(&params, "page[size]", DEFAULT_PAGE_SIZE)?;
    let number = page_param(&params, "page[number]", 0)?;

    let accounts = db.read().await;
    let page = paginate(&accounts, size, number);
    Ok(Json(json!({
        "data": page,
        "links": { "self": format!("{ACCOUNTS_PATH}?page[number]={number}&page[size]={size}") }
    })))
}

fn page_param(
    params: &HashMap<String, String>,
    key: &'static str,
    default: i64,
) -> Result<i64, ServerError> {
    match params.get(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<i64>()
            .ok()
            .filter(|v| *v >= 0)
            .ok_or(ServerError::InvalidPage(key)),
    }
}

/// A page size of 0 returns every account.
pub fn paginate(accounts: &[Account], size: i64, number: i64) -> &[Account] {
    if size == 0 {
        return accounts;
    }
    let size = size as usize;
    let start = (number as usize).saturating_mul(size).min(accounts.len());
    let end = start.saturating_add(size).min(accounts.len());
    &accounts[start..end]
}

fn parse_id(id: &str) -> Result<Uuid, ServerError> {
    Uuid::parse_str(id).map_err(|_| ServerError::InvalidId)
}

fn attribute<'a>(
    account: &'a Account,
    name: &str,
    errors: &mut Vec<String>,
) -> Option<&'a str> {
    match account.attributes.get(name)? {
        Value::String(value) => Some(value),
        Value::Null => None,
        _ => {
            errors.push(format!("{name} in body must be of type string"));
            None
        }
    }
}

fn is_upper_alpha(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_uppercase())
}

fn is_bic(value: &str) -> bool {
    value.is_ascii()
        && (value.len() == 8 || value.len() == 11)
        && value[..6].chars().all(|c| c.is_ascii_uppercase())
        && value[6..]
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// Server-side rules for a new account, reported all at once.
pub fn validate(account: &Account) -> Result<(), ServerError> {
    let mut errors = Vec::new();

    if Uuid::parse_str(&account.id).is_err() {
        errors.push(format!("id in body must be of type uuid: {:?}", account.id));
    }
    if Uuid::parse_str(&account.organisation_id).is_err() {
        errors.push(format!(
            "organisation_id in body must be of type uuid: {:?}",
            account.organisation_id
        ));
    }
    if account.resource_type != "accounts" {
        errors.push("type in body should be one of [accounts]".to_string());
    }

    match attribute(account, "country", &mut errors) {
        Some(country) if is_upper_alpha(country, 2) => {}
        Some(_) => errors.push("country in body should match '^[A-Z]{2}$'".to_string()),
        None => errors.push("country in body is required".to_string()),
    }
    if let Some(classification) = attribute(account, "account_classification", &mut errors) {
        if !CLASSIFICATIONS.contains(&classification) {
            errors.push(format!(
                "account_classification in body should be one of [{}]",
                CLASSIFICATIONS.join(" ")
            ));
        }
    }
    if let Some(currency) = attribute(account, "base_currency", &mut errors) {
        if !is_upper_alpha(currency, 3) {
            errors.push("base_currency in body should match '^[A-Z]{3}$'".to_string());
        }
    }
    if let Some(bic) = attribute(account, "bic", &mut errors) {
        if !is_bic(bic) {
            errors.push(
                "bic in body should match '^([A-Z]{6}[A-Z0-9]{2}|[A-Z]{6}[A-Z0-9]{5})$'".to_string(),
            );
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ServerError::Validation(errors))
    }
}

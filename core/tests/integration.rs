//! Account client against a live account API.
//!
//! # Design
//! With `API_HOST_ADDR` set, every test targets that server through
//! `AccountClient::from_env`. Otherwise each test starts the mock server on a
//! random port with its own store. The server may be shared, so assertions
//! only rely on records the test itself created.

use accountapi::config::ENV_VAR_HOST_ADDR;
use accountapi::{Account, AccountClient, ApiError, Attributes};
use uuid::Uuid;

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn client() -> AccountClient {
    match std::env::var(ENV_VAR_HOST_ADDR) {
        Ok(addr) if !addr.trim().is_empty() => AccountClient::from_env(),
        _ => AccountClient::new(&start_server()),
    }
}

fn new_account() -> Account {
    Account::new(
        Uuid::new_v4().to_string(),
        Uuid::new_v4().to_string(),
        Attributes {
            country: Some("GB".to_string()),
            account_classification: Some("Personal".to_string()),
            bank_id: Some("400300".to_string()),
            bic: Some("NWBKGB22".to_string()),
            iban: Some("GB11NWBK40030041426819".to_string()),
            title: Some("Ms".to_string()),
            first_name: Some("Samantha".to_string()),
            bank_account_name: Some("Samantha Holder".to_string()),
            alternative_bank_account_names: Some(vec!["Sam Holder".to_string()]),
            ..Default::default()
        },
    )
}

fn assert_rejected(result: accountapi::Result<Account>, status: u16) {
    match result {
        Err(ApiError::Rejected { status: got, .. }) => assert_eq!(got, status),
        other => panic!("expected {status} rejection, got {other:?}"),
    }
}

#[test]
fn create_echoes_identity_and_attributes() {
    let client = client();
    let expected = new_account();

    let created = client.create(&expected).unwrap();
    assert_eq!(created.id, expected.id);
    assert_eq!(created.organisation_id, expected.organisation_id);
    assert_eq!(created.attributes, expected.attributes);
    assert_eq!(created.version, 0);
    assert!(created.created_on.is_some());
}

#[test]
fn create_business_classification() {
    let client = client();
    let mut expected = new_account();
    expected.attributes.account_classification = Some("Business".to_string());

    let created = client.create(&expected).unwrap();
    assert_eq!(created.attributes.account_classification.as_deref(), Some("Business"));
}

#[test]
fn fetch_returns_created_account() {
    let client = client();
    let created = client.create(&new_account()).unwrap();
    assert_eq!(client.fetch(&created.id).unwrap(), created);
}

#[test]
fn fetch_unknown_id_is_not_found() {
    let client = client();
    let err = client.fetch(&Uuid::new_v4().to_string()).unwrap_err();
    assert!(err.is_not_found());
    assert!(err.error_message().unwrap().contains("does not exist"));
}

#[test]
fn duplicate_id_is_rejected() {
    let client = client();
    let account = new_account();
    client.create(&account).unwrap();
    assert_rejected(client.create(&account), 409);
}

#[test]
fn invalid_inputs_are_rejected_by_the_server() {
    let client = client();

    let mut account = new_account();
    account.attributes.country = Some("gb".to_string());
    assert_rejected(client.create(&account), 400);

    let mut account = new_account();
    account.attributes.account_classification = Some("IncorrectClassification".to_string());
    assert_rejected(client.create(&account), 400);

    let mut account = new_account();
    account.id = "invaliduuid".to_string();
    assert_rejected(client.create(&account), 400);

    let mut account = new_account();
    account.organisation_id = "invaliduuid".to_string();
    assert_rejected(client.create(&account), 400);

    let mut account = new_account();
    account.attributes.country = Some("gb".to_string());
    assert_rejected(client.create(&account), 400);
    assert!(client.fetch(&account.id).unwrap_err().is_not_found());
}

#[test]
fn delete_lifecycle() {
    let client = client();
    let created = client.create(&new_account()).unwrap();

    client.delete(&created).unwrap();
    assert!(client.fetch(&created.id).unwrap_err().is_not_found());

    // The server answers 204 for records that are already gone.
    client.delete(&created).unwrap();
}

#[test]
fn delete_with_stale_version_is_rejected() {
    let client = client();
    let mut created = client.create(&new_account()).unwrap();
    created.version += 1;

    let err = client.delete(&created).unwrap_err();
    assert_eq!(err.status(), Some(409));
    created.version -= 1;
    assert!(client.fetch(&created.id).is_ok());
}

#[test]
fn list_paginates() {
    let client = client();
    for _ in 0..15 {
        client.create(&new_account()).unwrap();
    }

    assert_eq!(client.list(1, 0).unwrap().len(), 1);
    assert_eq!(client.list(3, 1).unwrap().len(), 3);
    assert_eq!(client.list(5, 2).unwrap().len(), 5);
    assert_eq!(client.list(10, 0).unwrap().len(), 10);
    assert!(client.list(0, 0).unwrap().len() >= 15);
}

#[test]
fn list_preserves_creation_order() {
    let client = client();
    let first = client.create(&new_account()).unwrap();
    let second = client.create(&new_account()).unwrap();

    let all = client.list(0, 0).unwrap();
    let position = |id: &str| all.iter().position(|a| a.id == id).unwrap();
    assert!(position(&first.id) < position(&second.id));
    assert_eq!(all[position(&first.id)], first);
    assert_eq!(all[position(&second.id)], second);
}

#[test]
fn list_rejects_negative_pages() {
    let client = client();
    let err = client.list(-1, 0).unwrap_err();
    assert_eq!(err.status(), Some(400));
    let err = client.list(0, -1).unwrap_err();
    assert_eq!(err.status(), Some(400));
}

#[test]
fn shared_client_across_threads() {
    let client = std::sync::Arc::new(client());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let client = std::sync::Arc::clone(&client);
            std::thread::spawn(move || client.create(&new_account()).unwrap())
        })
        .collect();
    let created: Vec<Account> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let listed = client.list(0, 0).unwrap();
    for account in &created {
        assert!(listed.iter().any(|a| a.id == account.id));
    }
}

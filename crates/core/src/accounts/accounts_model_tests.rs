//! Tests for account domain models.

use super::*;

#[test]
fn test_new_account_validate() {
    let account = NewAccount {
        id: None,
        name: "Chequing".to_string(),
        classification: AccountClassification::Asset,
        currency: "CAD".to_string(),
        provider: None,
        provider_account_id: None,
    };
    assert!(account.validate().is_ok());
}

#[test]
fn test_new_account_rejects_empty_name() {
    let account = NewAccount {
        id: None,
        name: "   ".to_string(),
        classification: AccountClassification::Asset,
        currency: "USD".to_string(),
        provider: None,
        provider_account_id: None,
    };
    assert!(account.validate().is_err());
}

#[test]
fn test_new_account_rejects_empty_currency() {
    let account = NewAccount {
        id: None,
        name: "Brokerage".to_string(),
        classification: AccountClassification::Asset,
        currency: "".to_string(),
        provider: Some("SNAPTRADE".to_string()),
        provider_account_id: Some("abc-1".to_string()),
    };
    assert!(account.validate().is_err());
}

#[test]
fn test_is_linked() {
    let mut account = Account {
        id: "acc-1".to_string(),
        name: "Credit Card".to_string(),
        classification: AccountClassification::Liability,
        currency: "USD".to_string(),
        ..Default::default()
    };
    assert!(!account.is_linked());

    account.provider = Some("PLAID".to_string());
    assert!(account.is_linked());
}

#[test]
fn test_classification_serialization() {
    let asset = serde_json::to_string(&AccountClassification::Asset).unwrap();
    let liability = serde_json::to_string(&AccountClassification::Liability).unwrap();
    assert_eq!(asset, "\"ASSET\"");
    assert_eq!(liability, "\"LIABILITY\"");

    let parsed: AccountClassification = serde_json::from_str(&liability).unwrap();
    assert_eq!(parsed, AccountClassification::Liability);
}

#[test]
fn test_status_serialization() {
    let statuses = vec![
        (AccountStatus::Ok, "\"OK\""),
        (AccountStatus::Syncing, "\"SYNCING\""),
        (AccountStatus::Error, "\"ERROR\""),
    ];
    for (status, expected) in statuses {
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, expected);
        let parsed: AccountStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, status);
    }
}

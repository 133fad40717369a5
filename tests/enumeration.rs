//! Integration tests for instance- and class-scoped enumeration.

use std::sync::Arc;

use strongbox::{ItemClass, Keychain, MemoryStore, ProtocolType};
use url::Url;

fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

#[test]
fn all_items_projects_the_configured_scope() {
    let keychain = Keychain::generic_password("example.com").with_store(store());
    keychain.set("1", "alpha").unwrap();
    keychain.set("2", "beta").unwrap();

    let items = keychain.all_items();
    assert_eq!(items.len(), 2);

    for item in &items {
        assert_eq!(item.class, "GenericPassword");
        assert_eq!(item.service.as_deref(), Some("example.com"));
        assert_eq!(item.synchronizable.as_deref(), Some("false"));
        assert_eq!(item.accessibility.as_deref(), Some("AfterFirstUnlock"));
        assert!(item.server.is_none());
    }

    let mut keys: Vec<String> = items.into_iter().filter_map(|item| item.key).collect();
    keys.sort();
    assert_eq!(keys, vec!["alpha".to_string(), "beta".to_string()]);
}

#[test]
fn enumeration_of_an_empty_scope_is_empty() {
    let keychain = Keychain::generic_password("example.com").with_store(store());
    assert!(keychain.all_items().is_empty());
    assert!(keychain.all_keys().is_empty());
}

#[test]
fn class_scoped_enumeration_ignores_the_service_binding() {
    let shared = store();
    let first = Keychain::generic_password("first.example").with_store(shared.clone());
    let second = Keychain::generic_password("second.example").with_store(shared.clone());

    first.set("1", "alpha").unwrap();
    second.set("2", "beta").unwrap();

    // Instance scope sees only its own service.
    assert_eq!(first.all_keys(), vec!["alpha".to_string()]);

    // Class scope sees both.
    let mut pairs = first.all_keys_of_class(ItemClass::GenericPassword);
    pairs.sort();
    assert_eq!(
        pairs,
        vec![
            ("first.example".to_string(), "alpha".to_string()),
            ("second.example".to_string(), "beta".to_string()),
        ]
    );
}

#[test]
fn class_scoped_listing_of_internet_passwords_reports_servers() {
    let shared = store();
    let keychain = Keychain::internet_password(
        Url::parse("https://login.example.com").unwrap(),
        ProtocolType::Https,
    )
    .with_store(shared.clone());
    keychain.set("pw", "alice").unwrap();

    let items = keychain.all_items_of_class(ItemClass::InternetPassword);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].class, "InternetPassword");
    assert_eq!(items[0].server.as_deref(), Some("login.example.com"));
    assert_eq!(items[0].protocol.as_deref(), Some("https"));
    assert_eq!(items[0].authentication_type.as_deref(), Some("default"));

    let pairs = keychain.all_keys_of_class(ItemClass::InternetPassword);
    assert_eq!(
        pairs,
        vec![("login.example.com".to_string(), "alice".to_string())]
    );

    // Password classes do not leak into each other's class scope.
    assert!(keychain
        .all_keys_of_class(ItemClass::GenericPassword)
        .is_empty());
}

#[test]
fn display_lists_items_as_json_lines() {
    let keychain = Keychain::generic_password("example.com").with_store(store());
    keychain.set("1", "alpha").unwrap();

    let rendered = keychain.to_string();
    assert!(rendered.starts_with("[\n"));
    assert!(rendered.ends_with(']'));
    assert!(rendered.contains("\"class\":\"GenericPassword\""));
    assert!(rendered.contains("\"key\":\"alpha\""));
}

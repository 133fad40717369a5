//! Integration tests for item read/write/remove lifecycles.
//!
//! Everything here runs against the in-memory store so the suites are
//! hermetic: no OS keyring, no platform prompts.

use std::sync::Arc;

use strongbox::{
    Accessibility, AttrValue, AuthenticationContext, AuthenticationPolicy, Error, ItemClass,
    Keychain, MemoryStore, ProtocolType, Status,
};
use url::Url;

fn store() -> Arc<MemoryStore> {
    init_logging();
    Arc::new(MemoryStore::new())
}

/// Route facade diagnostics through the test harness when RUST_LOG asks
/// for them.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn generic(service: &str) -> Keychain {
    Keychain::generic_password(service).with_store(store())
}

#[test]
fn set_then_get_returns_identical_bytes() {
    let keychain = generic("example.com");
    let payload = vec![0x00, 0x01, 0xfe, 0xff, 0x42];

    keychain.set_data(payload.clone(), "blob").unwrap();

    assert_eq!(keychain.get_data("blob").unwrap(), Some(payload));
}

#[test]
fn set_overwrites_without_manual_delete() {
    let keychain = generic("example.com");

    keychain.set("first", "api-token").unwrap();
    keychain.set("second", "api-token").unwrap();

    assert_eq!(
        keychain.get("api-token").unwrap().as_deref(),
        Some("second")
    );
    assert_eq!(keychain.all_keys(), vec!["api-token".to_string()]);
}

#[test]
fn get_missing_key_is_absent_not_an_error() {
    let keychain = generic("example.com");
    assert_eq!(keychain.get("api-token").unwrap(), None);
}

#[test]
fn remove_is_idempotent() {
    let keychain = generic("example.com");

    keychain.remove("never-existed").unwrap();

    keychain.set("secret123", "api-token").unwrap();
    keychain.remove("api-token").unwrap();
    keychain.remove("api-token").unwrap();

    assert_eq!(keychain.get("api-token").unwrap(), None);
}

#[test]
fn contains_tracks_set_and_remove() {
    let keychain = generic("example.com");

    assert!(!keychain.contains("api-token").unwrap());

    keychain.set("secret123", "api-token").unwrap();
    assert!(keychain.contains("api-token").unwrap());

    keychain.remove("api-token").unwrap();
    assert!(!keychain.contains("api-token").unwrap());

    keychain.set("secret456", "api-token").unwrap();
    assert!(keychain.contains("api-token").unwrap());
}

#[test]
fn string_setter_round_trips_through_byte_getter() {
    let keychain = generic("example.com");
    let text = "pässwörd \u{1F511}";

    keychain.set(text, "unicode").unwrap();

    let bytes = keychain.get_data("unicode").unwrap().unwrap();
    assert_eq!(bytes, text.as_bytes());
    assert_eq!(keychain.get_string("unicode").unwrap().as_deref(), Some(text));
}

#[test]
fn non_utf8_data_is_a_conversion_error_when_read_as_text() {
    let keychain = generic("example.com");

    keychain.set_data(vec![0xff, 0xfe, 0x00], "blob").unwrap();

    assert_eq!(keychain.get_string("blob"), Err(Error::Conversion));
    // The byte path stays usable.
    assert_eq!(
        keychain.get_data("blob").unwrap(),
        Some(vec![0xff, 0xfe, 0x00])
    );
}

#[test]
fn account_keys_are_rejected_for_non_password_classes() {
    for keychain in [
        Keychain::certificate().with_store(store()),
        Keychain::identity().with_store(store()),
        Keychain::for_item_class(ItemClass::Key).with_store(store()),
    ] {
        assert!(matches!(
            keychain.get_data("account"),
            Err(Error::BadRequest { .. })
        ));
        assert!(matches!(
            keychain.set("value", "account"),
            Err(Error::BadRequest { .. })
        ));
        assert!(matches!(
            keychain.remove("account"),
            Err(Error::BadRequest { .. })
        ));
    }
}

#[test]
fn all_keys_reflects_live_items_only() {
    let keychain = generic("example.com");

    keychain.set("1", "alpha").unwrap();
    keychain.set("2", "beta").unwrap();
    keychain.set("3", "gamma").unwrap();
    keychain.remove("beta").unwrap();

    let mut keys = keychain.all_keys();
    keys.sort();
    assert_eq!(keys, vec!["alpha".to_string(), "gamma".to_string()]);
}

#[test]
fn services_are_isolated_within_one_store() {
    let shared = store();
    let first = Keychain::generic_password("first.example").with_store(shared.clone());
    let second = Keychain::generic_password("second.example").with_store(shared);

    first.set("one", "api-token").unwrap();
    second.set("two", "api-token").unwrap();

    assert_eq!(first.get("api-token").unwrap().as_deref(), Some("one"));
    assert_eq!(second.get("api-token").unwrap().as_deref(), Some("two"));

    first.remove_all().unwrap();
    assert_eq!(first.get("api-token").unwrap(), None);
    assert_eq!(second.get("api-token").unwrap().as_deref(), Some("two"));
}

#[test]
fn internet_passwords_round_trip() {
    let server = Url::parse("https://login.example.com:8443").unwrap();
    let keychain =
        Keychain::internet_password(server, ProtocolType::Https).with_store(store());

    keychain.set("secret123", "alice").unwrap();

    assert_eq!(keychain.get("alice").unwrap().as_deref(), Some("secret123"));
    assert!(keychain.contains("alice").unwrap());

    keychain.remove("alice").unwrap();
    assert_eq!(keychain.get("alice").unwrap(), None);
}

#[test]
fn remove_all_clears_the_configured_scope() {
    let keychain = generic("example.com");

    keychain.remove_all().unwrap();

    keychain.set("1", "alpha").unwrap();
    keychain.set("2", "beta").unwrap();
    keychain.remove_all().unwrap();

    assert!(keychain.all_keys().is_empty());
}

#[test]
fn exact_synchronizable_matching_narrows_lookups() {
    let shared = store();
    let writer = Keychain::generic_password("example.com")
        .with_store(shared.clone())
        .with_synchronizable(true);
    writer.set("synced", "api-token").unwrap();

    let reader = Keychain::generic_password("example.com").with_store(shared);

    // Default matching ignores the attribute.
    assert_eq!(reader.get("api-token").unwrap().as_deref(), Some("synced"));

    // Exact matching against the configured (false) flag misses.
    let exact = reader.ignoring_synchronizable(false);
    assert_eq!(exact.get("api-token").unwrap(), None);

    // Exact matching with the matching flag hits again.
    let exact_synced = exact.with_synchronizable(true);
    assert_eq!(
        exact_synced.get("api-token").unwrap().as_deref(),
        Some("synced")
    );
}

#[test]
fn set_persistent_value_returns_a_handle_for_non_password_classes() {
    let keychain = Keychain::certificate().with_store(store());

    let reference = keychain
        .set_persistent_value(AttrValue::from("issued"), strongbox::keys::ATTR_LABEL)
        .unwrap();
    assert!(!reference.as_bytes().is_empty());
}

#[test]
fn class_only_reads_take_no_key() {
    let keychain = Keychain::certificate().with_store(store());
    assert_eq!(keychain.get_data(None).unwrap(), None);
}

#[test]
fn raw_value_writes_are_readable_through_the_data_path() {
    let keychain = Keychain::certificate().with_store(store());
    let der = vec![0x30, 0x82, 0x01, 0x0a];

    keychain
        .set_persistent_value(AttrValue::from(der.clone()), strongbox::keys::VALUE_DATA)
        .unwrap();

    assert_eq!(keychain.get_data(None).unwrap(), Some(der));
}

#[test]
fn set_persistent_value_rejects_password_classes() {
    let keychain = generic("example.com");
    let result = keychain.set_persistent_value(AttrValue::from("value"), "key");
    assert!(matches!(result, Err(Error::BadRequest { .. })));
}

#[test]
fn duplicate_persistent_insert_surfaces_the_status() {
    let keychain = Keychain::certificate().with_store(store());

    keychain
        .set_persistent_value(AttrValue::from("issued"), strongbox::keys::ATTR_LABEL)
        .unwrap();
    let result =
        keychain.set_persistent_value(AttrValue::from("issued"), strongbox::keys::ATTR_LABEL);

    assert_eq!(result, Err(Error::Platform(Status::DuplicateItem)));
}

#[test]
fn protected_items_report_existence_only_when_interaction_is_waived() {
    let shared = store();
    let writer = Keychain::generic_password("vault.example")
        .with_store(shared.clone())
        .with_access_control(
            Accessibility::WhenPasscodeSetThisDeviceOnly,
            AuthenticationPolicy::BIOMETRY_ANY,
        )
        .with_authentication_context(AuthenticationContext::new());
    writer.set("secret123", "guarded").unwrap();

    let reader = Keychain::generic_password("vault.example").with_store(shared);

    // Blocked matches read as absent on the plain probe and as present
    // once the caller waives interactive authentication.
    assert!(!reader.contains("guarded").unwrap());
    assert!(reader.contains_without_authentication_ui("guarded").unwrap());

    // Value reads surface the blocked status.
    assert_eq!(
        reader.get_data("guarded"),
        Err(Error::Platform(Status::InteractionNotAllowed))
    );

    // A caller holding an authentication context reads through.
    let authenticated = reader.with_authentication_context(AuthenticationContext::new());
    assert_eq!(
        authenticated.get("guarded").unwrap().as_deref(),
        Some("secret123")
    );
}

#[test]
fn attribute_snapshot_carries_item_metadata() {
    let keychain = generic("example.com")
        .with_label("api token")
        .with_comment("rotated quarterly");
    keychain.set("secret123", "api-token").unwrap();

    keychain
        .get_with("api-token", |attributes| {
            let attributes = attributes.expect("item should exist");
            assert_eq!(attributes.class(), Some(ItemClass::GenericPassword));
            assert_eq!(attributes.service(), Some("example.com"));
            assert_eq!(attributes.account(), Some("api-token"));
            assert_eq!(attributes.label(), Some("api token"));
            assert_eq!(attributes.comment(), Some("rotated quarterly"));
            assert_eq!(attributes.synchronizable(), Some(false));
            assert_eq!(
                attributes.accessible(),
                Some(Accessibility::AfterFirstUnlock)
            );
            assert!(attributes.creation_date().is_some());
            assert!(attributes.modification_date().is_some());
            assert!(attributes.persistent_ref().is_some());
            assert_eq!(attributes.data(), Some(b"secret123".as_slice()));
        })
        .unwrap();
}

#[test]
fn best_effort_accessors_mirror_the_throwing_api() {
    let keychain = generic("example.com");

    keychain.put("api-token", Some("secret123"));
    assert_eq!(keychain.value_for("api-token").as_deref(), Some("secret123"));
    assert_eq!(
        keychain.data_for("api-token").as_deref(),
        Some(b"secret123".as_slice())
    );
    assert!(keychain.attributes_for("api-token").is_some());

    keychain.put("api-token", None);
    assert_eq!(keychain.value_for("api-token"), None);
    assert!(keychain.attributes_for("api-token").is_none());
}

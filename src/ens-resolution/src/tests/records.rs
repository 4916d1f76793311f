use std::sync::Arc;

use super::fake_chain::*;
use crate::{
    controller::{configure_resolution, ResolutionRequest},
    errors::ResolutionError,
    records::{
        lookup_address, owner_of_name, read_text_record, register_fifs, resolve_name,
        set_text_record,
    },
};

#[tokio::test]
async fn test_register_fifs_label() {
    let chain = FakeChain::new();
    let registration = register_fifs(&chain, &config(), "bob", None).await.unwrap();
    assert_eq!(registration.name, "bob.users.iexec.eth");
    assert!(registration.register_tx.is_some());
    assert_eq!(chain.owner("bob.users.iexec.eth"), CALLER);

    // Already ours: no transaction.
    let again = register_fifs(&chain, &config(), "bob", Some(BASE_DOMAIN))
        .await
        .unwrap();
    assert_eq!(again.register_tx, None);
    assert_eq!(chain.sent().len(), 1);
}

#[tokio::test]
async fn test_register_fifs_taken_label() {
    let chain = FakeChain::new();
    chain.set_owner("bob.users.iexec.eth", STRANGER);
    let err = register_fifs(&chain, &config(), "bob", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ResolutionError::Authorization(_)));
    assert!(chain.sent().is_empty());
}

#[tokio::test]
async fn test_register_fifs_requires_contract_registrar() {
    let chain = FakeChain::new();
    chain.set_owner("team.eth", STRANGER);
    let err = register_fifs(&chain, &config(), "bob", Some("team.eth"))
        .await
        .unwrap_err();
    assert!(matches!(err, ResolutionError::Configuration(_)));
}

#[tokio::test]
async fn test_register_fifs_rejects_dotted_label() {
    let chain = FakeChain::new();
    let err = register_fifs(&chain, &config(), "bob.alice", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ResolutionError::Validation(_)));
}

#[tokio::test]
async fn test_text_records() {
    let chain = Arc::new(FakeChain::new());

    // No resolver yet.
    let err = read_text_record(chain.as_ref(), &config(), NAME, "url")
        .await
        .unwrap_err();
    assert!(matches!(err, ResolutionError::Configuration(_)));

    configure_resolution(chain.clone(), config(), ResolutionRequest::new(NAME))
        .await
        .unwrap();

    assert_eq!(
        read_text_record(chain.as_ref(), &config(), NAME, "url")
            .await
            .unwrap(),
        ""
    );
    set_text_record(chain.as_ref(), &config(), NAME, "url", "https://pool.example")
        .await
        .unwrap();
    assert_eq!(
        read_text_record(chain.as_ref(), &config(), NAME, "url")
            .await
            .unwrap(),
        "https://pool.example"
    );

    chain.set_owner(NAME, STRANGER);
    let err = set_text_record(chain.as_ref(), &config(), NAME, "url", "x")
        .await
        .unwrap_err();
    assert!(matches!(err, ResolutionError::Authorization(_)));
}

#[tokio::test]
async fn test_read_helpers() {
    let chain = Arc::new(FakeChain::new());
    assert_eq!(
        owner_of_name(chain.as_ref(), &config(), NAME).await.unwrap(),
        CALLER
    );
    assert_eq!(
        owner_of_name(chain.as_ref(), &config(), "nobody.eth")
            .await
            .unwrap(),
        alloy_primitives::Address::ZERO
    );
    assert_eq!(
        resolve_name(chain.as_ref(), &config(), NAME).await.unwrap(),
        None
    );
    assert_eq!(
        lookup_address(chain.as_ref(), &config(), CALLER)
            .await
            .unwrap(),
        None
    );

    configure_resolution(chain.clone(), config(), ResolutionRequest::new(NAME))
        .await
        .unwrap();
    assert_eq!(
        resolve_name(chain.as_ref(), &config(), NAME).await.unwrap(),
        Some(CALLER)
    );
}

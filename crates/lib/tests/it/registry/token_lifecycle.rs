//! Token lifecycle tests
//!
//! Tokens validate from the moment they are issued and never stop validating;
//! strings that were never issued are rejected consistently by `validate` and
//! `resolve`.

use std::collections::HashSet;
use std::sync::Arc;

use tokenlist::{ItemPayload, Registry, Token, constants::TOKEN_LEN};

#[test]
fn test_created_tokens_are_distinct_lowercase_hex() {
    let registry = Registry::new();
    let tokens: HashSet<Token> = (0..64)
        .map(|_| registry.create().expect("Failed to create collection"))
        .collect();

    assert_eq!(tokens.len(), 64);
    assert_eq!(registry.len(), 64);
    for token in &tokens {
        assert_eq!(token.as_str().len(), TOKEN_LEN);
        assert!(
            token
                .as_str()
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        );
        assert!(registry.validate(token.as_str()));
    }
}

#[test]
fn test_tokens_stay_valid_after_activity() {
    let registry = Registry::new();
    let token = registry.create().expect("Failed to create collection");

    let collection = registry.resolve(token.as_str()).unwrap();
    let item = collection.add(ItemPayload::named("temporary")).unwrap();
    collection.remove(item.id).unwrap();
    for _ in 0..10 {
        registry.create().unwrap();
    }

    assert!(registry.validate(token.as_str()));
    assert!(registry.resolve(token.as_str()).is_ok());
}

#[test]
fn test_validate_and_resolve_agree() {
    let registry = Registry::new();
    let issued = registry.create().unwrap();

    let mut flipped = issued.as_str().to_string();
    let last = if flipped.ends_with('0') { "1" } else { "0" };
    flipped.replace_range(TOKEN_LEN - 1.., last);

    let candidates = [
        issued.as_str().to_string(),
        flipped,
        issued.as_str().to_uppercase(),
        issued.as_str()[..TOKEN_LEN - 1].to_string(),
        format!("{} ", issued.as_str()),
        String::new(),
    ];
    for candidate in &candidates {
        assert_eq!(
            registry.validate(candidate),
            registry.resolve(candidate).is_ok(),
            "validate and resolve disagree on {candidate:?}"
        );
    }
    assert!(registry.validate(issued.as_str()));
    assert!(!registry.validate(&candidates[1]));
    assert!(!registry.validate(&candidates[2]));
}

#[test]
fn test_unknown_token_error_does_not_leak_full_token() {
    let registry = Registry::new();
    let unknown = "0123456789abcdef0123456789abcdef";

    let err = registry.resolve(unknown).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.module(), "registry");
    assert!(!err.to_string().contains(unknown));
}

#[test]
fn test_parse_accepts_issued_tokens_only_shape() {
    let registry = Registry::new();
    let issued = registry.create().unwrap();

    let parsed = Token::parse(issued.as_str()).expect("Issued tokens are well formed");
    assert_eq!(parsed, issued);

    let err: tokenlist::Error = Token::parse("Bearer abc").unwrap_err().into();
    assert!(err.is_malformed_token());
}

#[test]
fn test_registry_shared_between_threads() {
    let registry = Arc::new(Registry::new());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                (0..16)
                    .map(|_| registry.create().unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let tokens: Vec<Token> = handles
        .into_iter()
        .flat_map(|handle| handle.join().unwrap())
        .collect();

    assert_eq!(registry.len(), 128);
    assert_eq!(tokens.iter().collect::<HashSet<_>>().len(), 128);
    assert!(tokens.iter().all(|token| registry.validate(token.as_str())));
}

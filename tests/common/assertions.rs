//! Custom assertion macros
//!
//! Provides assertion macros with more descriptive failure output than the
//! plain `assert!` family.

/// Assert that a result is ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $message:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $message, e),
        }
    };
}

/// Assert that a result is an error, optionally of a given shape
#[macro_export]
macro_rules! assert_err {
    ($result:expr) => {
        assert!($result.is_err(), "Expected Err, got Ok");
    };
    ($result:expr, $pattern:pat) => {
        match $result {
            Err($pattern) => {}
            Ok(value) => panic!("Expected Err, got Ok: {:?}", value),
            Err(e) => panic!("Expected different error variant, got: {:?}", e),
        }
    };
}

/// Assert that a string contains a substring
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        assert!(
            $haystack.contains($needle),
            "Expected '{}' to contain '{}'",
            $haystack,
            $needle
        );
    };
}

/// Assert that a slice of message-like items is ordered by `(sent_at, id)`
#[macro_export]
macro_rules! assert_chronological {
    ($items:expr, |$item:ident| $key:expr) => {
        let keys: Vec<_> = $items.iter().map(|$item| $key).collect();
        for pair in keys.windows(2) {
            assert!(
                pair[0] < pair[1],
                "Expected strictly ascending order, found {:?} before {:?}",
                pair[0],
                pair[1]
            );
        }
    };
}

//! Property-based tests for conversation identity and aggregation
//!
//! Uses proptest to generate random feeds and verify ordering and grouping
//! invariants

use crate::common::record;
use courier::shared::messaging::{
    aggregate_inbox, build_thread, conversation_key, group_for_moderation, MessageRecord,
};
use proptest::prelude::*;
use std::collections::HashSet;

/// Feeds over a small id space so conversations and timestamp ties recur
fn feed() -> impl Strategy<Value = Vec<MessageRecord>> {
    prop::collection::vec((1i64..6, 1i64..6, 0i64..20, any::<bool>()), 0..40).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(index, (from, to, secs, seen))| MessageRecord {
                seen,
                ..record(index as i64 + 1, from, to, "m", secs)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn test_conversation_key_is_symmetric(a in any::<i64>(), b in any::<i64>()) {
        prop_assert_eq!(conversation_key(a, b), conversation_key(b, a));
    }

    #[test]
    fn test_conversation_key_distinguishes_partners(a in 1i64..1000, b in 1i64..1000, c in 1i64..1000) {
        prop_assume!(b != c);
        prop_assert_ne!(conversation_key(a, b), conversation_key(a, c));
    }

    #[test]
    fn test_inbox_is_sorted_and_unique(records in feed(), user in 1i64..6) {
        let entries = aggregate_inbox(records.clone(), user);

        let counterparts: HashSet<i64> = entries.iter().map(|e| e.counterpart_id).collect();
        prop_assert_eq!(counterparts.len(), entries.len());
        prop_assert!(!counterparts.contains(&user));
        for pair in entries.windows(2) {
            prop_assert!(pair[0].latest.order_key() >= pair[1].latest.order_key());
        }

        let again = aggregate_inbox(records.into_iter().rev(), user);
        prop_assert_eq!(entries, again);
    }

    #[test]
    fn test_inbox_unread_matches_feed(records in feed(), user in 1i64..6) {
        for entry in aggregate_inbox(records.clone(), user) {
            let expected = records.iter().any(|r| {
                r.sender_id == Some(entry.counterpart_id) && r.receiver_id == Some(user) && !r.seen
            });
            prop_assert_eq!(entry.has_unread, expected);
        }
    }

    #[test]
    fn test_thread_is_strictly_ascending(records in feed()) {
        let thread = build_thread(records, 1);
        for pair in thread.windows(2) {
            prop_assert!(pair[0].message.order_key() < pair[1].message.order_key());
        }
    }

    #[test]
    fn test_moderation_never_drops_records(records in feed()) {
        let groups = group_for_moderation(records.clone());
        let grouped: usize = groups.iter().map(|g| g.len()).sum();
        prop_assert_eq!(grouped, records.len());
    }
}

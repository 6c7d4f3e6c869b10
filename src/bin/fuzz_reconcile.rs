//! AFL Fuzz harness for reconciliation
//!
//! The input bytes are split into an old and a new list of small records.
//! For every pair the harness checks that:
//! 1. Applying the script to old reproduces new, with and without move detection
//! 2. Keyed and predicate pairing agree
//! 3. Replaying the positional notifications lands on the new length

use afl::fuzz;
use reconcile::{reconcile_by_key_with, reconcile_with, Notification, ReconcileOptions};

/// Record decoded from one input byte: the high nibble is the identity, the
/// low two bits the content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Record {
    id: u8,
    content: u8,
}

impl Record {
    fn from_byte(byte: u8) -> Record {
        return Record {
            id: byte >> 4,
            content: byte & 0b11,
        };
    }
}

/// The first byte says how many of the remaining bytes belong to old.
fn decode(data: &[u8]) -> (Vec<Record>, Vec<Record>) {
    let Some((&split, rest)) = data.split_first() else {
        return (Vec::new(), Vec::new());
    };
    let split = (split as usize).min(rest.len());
    let old = rest[..split].iter().map(|&b| Record::from_byte(b)).collect();
    let new = rest[split..].iter().map(|&b| Record::from_byte(b)).collect();
    return (old, new);
}

fn main() {
    fuzz!(|data: &[u8]| {
        let (old, new) = decode(data);
        let same_id = |a: &Record, b: &Record| a.id == b.id;
        let same_content = |a: &Record, b: &Record| a.content == b.content;

        for detect_moves in [true, false] {
            let options = ReconcileOptions::new().detect_moves(detect_moves);
            let by_predicate = reconcile_with(&old, &new, same_id, same_content, options);
            let by_key = reconcile_by_key_with(&old, &new, |r| r.id, same_content, options);

            assert_eq!(by_predicate, by_key, "Pairing disagreement");
            assert_eq!(by_predicate.apply(&old).unwrap(), new, "Round-trip failure");

            // Track only the length: every notification must fit the list.
            let mut len = old.len();
            for notification in by_predicate.notifications().unwrap() {
                match notification {
                    Notification::Inserted { position, count } => {
                        assert!(position <= len, "Insert past end");
                        len += count;
                    }
                    Notification::Removed { position, count } => {
                        assert!(position + count <= len, "Remove past end");
                        len -= count;
                    }
                    Notification::Moved { from, to } => {
                        assert!(from < len && to < len, "Move past end");
                    }
                    Notification::Changed { position, count } => {
                        assert!(position + count <= len, "Change past end");
                    }
                }
            }
            assert_eq!(len, new.len(), "Length mismatch after replay");
        }
    });
}

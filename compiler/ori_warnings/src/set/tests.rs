use super::*;
use crate::opaque::Opaque;
use crate::test_helpers::{limit, record, seq_ids, texts};
use pretty_assertions::assert_eq;

fn tokens(n: usize) -> Vec<Opaque> {
    (0..n).map(|i| Opaque::new(format!("w{i}"))).collect()
}

// Insert

#[test]
fn test_empty_set() {
    let set = WarningSet::empty(limit(3));
    assert!(set.is_empty());
    assert_eq!(set.len(), 0);
    assert_eq!(set.limit().get(), 3);
    assert!(set.latest().is_none());
}

#[test]
fn test_insert_adds_and_orders_by_recency() {
    let origin = Opaque::new("o");
    let p = tokens(3);
    let set = WarningSet::empty(limit(10));

    let set = set.insert(record(5, &p[0], &origin)).set;
    let set = set.insert(record(9, &p[1], &origin)).set;
    let inserted = set.insert(record(2, &p[2], &origin));

    assert!(inserted.accepted());
    assert_eq!(inserted.outcome, InsertOutcome::Added);
    assert_eq!(seq_ids(&inserted.set), vec![9, 5, 2]);
    assert_eq!(texts(&inserted.set), vec!["w1", "w0", "w2"]);
}

#[test]
fn test_insert_does_not_mutate_original() {
    let origin = Opaque::new("o");
    let p = tokens(2);
    let base = WarningSet::singleton(record(1, &p[0], &origin), limit(5));
    let grown = base.insert(record(2, &p[1], &origin)).set;

    assert_eq!(seq_ids(&base), vec![1]);
    assert_eq!(seq_ids(&grown), vec![2, 1]);
}

#[test]
fn test_insert_duplicate_keeps_earliest() {
    let payload = Opaque::new("p");
    let origin = Opaque::new("o");
    let set = WarningSet::singleton(record(3, &payload, &origin), limit(5));

    let again = set.insert(record(7, &payload, &origin));

    assert!(!again.accepted());
    assert_eq!(again.outcome, InsertOutcome::Duplicate);
    assert_eq!(again.set.len(), 1);
    assert_eq!(seq_ids(&again.set), vec![3]);
}

#[test]
fn test_insert_over_capacity_rejects_new() {
    let origin = Opaque::new("o");
    let p = tokens(3);
    let set = WarningSet::empty(limit(2));
    let set = set.insert(record(1, &p[0], &origin)).set;
    let set = set.insert(record(2, &p[1], &origin)).set;
    assert!(set.is_full());

    let rejected = set.insert(record(3, &p[2], &origin));

    assert_eq!(rejected.outcome, InsertOutcome::OverCapacity);
    assert!(!rejected.accepted());
    assert_eq!(seq_ids(&rejected.set), vec![2, 1]);
}

#[test]
fn test_duplicate_on_full_set_is_duplicate_not_overflow() {
    let origin = Opaque::new("o");
    let p = tokens(1);
    let set = WarningSet::singleton(record(1, &p[0], &origin), limit(1));
    let again = set.insert(record(4, &p[0], &origin));
    assert_eq!(again.outcome, InsertOutcome::Duplicate);
}

// Union

#[test]
fn test_union_keeps_most_recent_duplicate() {
    let origin = Opaque::new("o");
    let w1 = Opaque::new("w1");
    let w2 = Opaque::new("w2");
    let w3 = Opaque::new("w3");

    let a = WarningSet::from_records(
        [record(1, &w1, &origin), record(3, &w2, &origin)],
        limit(3),
    )
    .set;
    let b = WarningSet::from_records(
        [record(5, &w2, &origin), record(2, &w3, &origin)],
        limit(3),
    )
    .set;

    let merged = a.union(&b);

    assert!(!merged.overflowed());
    assert_eq!(merged.dropped, 0);
    assert_eq!(texts(&merged.set), vec!["w2", "w3", "w1"]);
    assert_eq!(seq_ids(&merged.set), vec![5, 2, 1]);
}

#[test]
fn test_union_drops_oldest_over_capacity() {
    let origin = Opaque::new("o");
    let p = tokens(4);
    let a = WarningSet::from_records(
        [record(1, &p[0], &origin), record(6, &p[1], &origin)],
        limit(2),
    )
    .set;
    let b = WarningSet::from_records(
        [record(4, &p[2], &origin), record(2, &p[3], &origin)],
        limit(2),
    )
    .set;

    let merged = a.union(&b);

    assert!(merged.overflowed());
    assert_eq!(merged.dropped, 2);
    assert_eq!(seq_ids(&merged.set), vec![6, 4]);
    assert_eq!(merged.set.len(), 2);
}

#[test]
fn test_union_with_empty_is_identity() {
    let origin = Opaque::new("o");
    let p = tokens(1);
    let a = WarningSet::singleton(record(1, &p[0], &origin), limit(2));
    let merged = a.union(&WarningSet::empty(limit(2)));
    assert_eq!(seq_ids(&merged.set), vec![1]);
    assert_eq!(merged.dropped, 0);

    let merged = WarningSet::empty(limit(2)).union(&a);
    assert_eq!(seq_ids(&merged.set), vec![1]);
}

#[test]
fn test_union_leaves_operands_unchanged() {
    let origin = Opaque::new("o");
    let p = tokens(2);
    let a = WarningSet::singleton(record(1, &p[0], &origin), limit(4));
    let b = WarningSet::singleton(record(2, &p[1], &origin), limit(4));
    let _ = a.union(&b);
    assert_eq!(seq_ids(&a), vec![1]);
    assert_eq!(seq_ids(&b), vec![2]);
}

#[test]
fn test_from_records_dedups_and_sorts() {
    let origin = Opaque::new("o");
    let p = tokens(2);
    let merged = WarningSet::from_records(
        vec![
            record(2, &p[0], &origin),
            record(8, &p[1], &origin),
            record(5, &p[0], &origin),
        ],
        limit(10),
    );
    assert_eq!(seq_ids(&merged.set), vec![8, 5]);
    assert_eq!(texts(&merged.set), vec!["w1", "w0"]);
}

// Queries

#[test]
fn test_contains_and_get_by_identity() {
    let payload = Opaque::new("p");
    let origin = Opaque::new("o");
    let set = WarningSet::singleton(record(3, &payload, &origin), limit(2));

    let same = record(10, &payload, &origin);
    let other = record(3, &Opaque::new("p"), &origin);

    assert!(set.contains(&same));
    assert_eq!(set.get(&same).map(|w| w.sequence_id().raw()), Some(3));
    assert!(!set.contains(&other));
    assert!(set.get(&other).is_none());
}

#[test]
fn test_iterator_is_restartable_and_exact() {
    let origin = Opaque::new("o");
    let p = tokens(3);
    let set = WarningSet::from_records(
        [
            record(1, &p[0], &origin),
            record(2, &p[1], &origin),
            record(3, &p[2], &origin),
        ],
        limit(3),
    )
    .set;

    let iter = set.iter();
    assert_eq!(iter.len(), 3);
    assert_eq!(seq_ids(iter.clone()), vec![3, 2, 1]);
    assert_eq!(seq_ids(iter), vec![3, 2, 1]);
    assert_eq!(seq_ids(set.iter().rev()), vec![1, 2, 3]);
    assert_eq!(seq_ids(&set.to_vec()), vec![3, 2, 1]);
}

#[test]
fn test_map_records_reassigns_in_place() {
    let origin = Opaque::new("o");
    let p = tokens(2);
    let set = WarningSet::from_records(
        [record(1, &p[0], &origin), record(2, &p[1], &origin)],
        limit(2),
    )
    .set;

    let moved = set.map_records(|w| w.reassign("caller", None));

    assert_eq!(seq_ids(&moved), vec![2, 1]);
    assert!(moved.iter().all(|w| w.reassignments().len() == 1));
    assert!(set.iter().all(|w| w.reassignments().len() == 0));
}

mod proptest_set {
    use super::super::WarningSet;
    use crate::opaque::Opaque;
    use crate::test_helpers::{limit, record};
    use proptest::prelude::*;

    /// Distinct sequence ids in random order.
    fn shuffled_ids(max_len: usize) -> impl Strategy<Value = Vec<u64>> {
        prop::collection::btree_set(1u64..100_000, 0..max_len)
            .prop_flat_map(|ids| Just(ids.into_iter().collect::<Vec<_>>()).prop_shuffle())
    }

    proptest! {
        #[test]
        fn inserts_always_iterate_descending(ids in shuffled_ids(40)) {
            let origin = Opaque::new("o");
            let mut set = WarningSet::empty(limit(64));
            for id in &ids {
                set = set.insert(record(*id, &Opaque::new(*id), &origin)).set;
            }
            let seen: Vec<u64> = set.iter().map(|w| w.sequence_id().raw()).collect();
            prop_assert_eq!(seen.len(), ids.len());
            prop_assert!(seen.windows(2).all(|w| w[0] > w[1]));
        }

        #[test]
        fn sequential_inserts_respect_capacity(k in 1usize..6, n in 0usize..12) {
            let origin = Opaque::new("o");
            let mut set = WarningSet::empty(limit(k));
            let mut rejected = 0usize;
            for id in 1..=n {
                let insertion = set.insert(record(id as u64, &Opaque::new(id), &origin));
                if !insertion.accepted() {
                    rejected += 1;
                }
                set = insertion.set;
            }
            prop_assert_eq!(set.len(), n.min(k));
            prop_assert_eq!(rejected, n.saturating_sub(k));
            // The first `k` accepted records are the ones kept.
            let kept: Vec<u64> = set.iter().map(|w| w.sequence_id().raw()).collect();
            let expected: Vec<u64> = (1..=n.min(k) as u64).rev().collect();
            prop_assert_eq!(kept, expected);
        }

        #[test]
        fn duplicates_keep_first_sequence_id(
            choices in prop::collection::vec((0usize..3, 0usize..2), 1..30),
        ) {
            let payloads: Vec<Opaque> = (0..3).map(|i| Opaque::new(format!("p{i}"))).collect();
            let origins: Vec<Opaque> = (0..2).map(|i| Opaque::new(format!("o{i}"))).collect();

            let mut set = WarningSet::empty(limit(16));
            let mut first_seen: Vec<((usize, usize), u64)> = Vec::new();
            for (seq, (p, o)) in choices.iter().enumerate() {
                let seq = seq as u64 + 1;
                set = set.insert(record(seq, &payloads[*p], &origins[*o])).set;
                if !first_seen.iter().any(|(key, _)| *key == (*p, *o)) {
                    first_seen.push(((*p, *o), seq));
                }
            }

            prop_assert_eq!(set.len(), first_seen.len());
            for ((p, o), seq) in first_seen {
                let probe = record(0, &payloads[p], &origins[o]);
                prop_assert_eq!(set.get(&probe).map(|w| w.sequence_id().raw()), Some(seq));
            }
        }

        #[test]
        fn union_caps_and_keeps_most_recent(
            a_ids in shuffled_ids(10),
            b_ids in shuffled_ids(10),
            k in 1usize..8,
        ) {
            let origin = Opaque::new("o");
            let a = WarningSet::from_records(
                a_ids.iter().map(|id| record(*id, &Opaque::new(*id), &origin)),
                limit(k),
            ).set;
            let b = WarningSet::from_records(
                b_ids.iter().map(|id| record(*id, &Opaque::new(*id), &origin)),
                limit(k),
            ).set;

            let merged = a.union(&b);
            let total = a.len() + b.len();

            prop_assert_eq!(merged.set.len(), total.min(k));
            prop_assert_eq!(merged.dropped, total.saturating_sub(k));

            let mut all: Vec<u64> = a
                .iter()
                .chain(b.iter())
                .map(|w| w.sequence_id().raw())
                .collect();
            all.sort_unstable_by(|x, y| y.cmp(x));
            all.truncate(k);
            let kept: Vec<u64> = merged.set.iter().map(|w| w.sequence_id().raw()).collect();
            prop_assert_eq!(kept, all);
        }
    }
}

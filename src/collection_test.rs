use {
    super::*,
    proptest::prelude::*,
    std::{sync::Arc, thread},
};

fn value(leading: u8, fill: u8) -> HashValue {
    let mut bytes = [fill; HASH_LEN];
    bytes[0] = leading;
    HashValue::from_array(bytes)
}

fn span(first: (u8, u8), last: (u8, u8)) -> HashSpan {
    HashSpan::new(value(first.0, first.1), value(last.0, last.1))
}

/// Spans with end points drawn from a small alphabet, so that overlaps and
/// adjacency are frequent.
fn point() -> impl Strategy<Value = (u8, u8)> {
    (any::<u8>(), prop::sample::select(vec![0x7f, 0x80, 0x00]))
}

fn hash_span() -> impl Strategy<Value = HashSpan> {
    (point(), point()).prop_map(|(a, b)| span(a, b))
}

fn spans() -> impl Strategy<Value = Vec<HashSpan>> {
    prop::collection::vec(hash_span(), 0..12)
}

#[test]
fn empty_collection_misses_everything() {
    let collection = HashSpanCollection::new();
    assert!(collection.is_empty());
    assert_eq!(collection.missing_spans(), vec![HashSpan::FULL]);
    assert!(!collection.is_full());
    assert!(collection.merged().is_empty());
}

#[test]
fn adjacent_halves_merge_into_full() {
    let x = value(0x00, 0x12);
    let collection: HashSpanCollection = vec![
        HashSpan::new(x.successor().unwrap(), HashValue::LAST),
        HashSpan::new(HashValue::FIRST, x),
    ]
    .into();

    assert_eq!(collection.len(), 2);
    assert_eq!(collection.merged(), vec![HashSpan::FULL]);
    assert!(collection.missing_spans().is_empty());
    assert!(collection.is_full());
}

#[test]
fn merge_collapses_overlapping_and_adjacent() {
    let a = span((0x10, 0x80), (0x20, 0x80));
    let b = span((0x18, 0x80), (0x30, 0x80));
    // Adjacent to `b`.
    let c = HashSpan::new(value(0x30, 0x80).successor().unwrap(), value(0x40, 0x80));
    // Apart from the rest.
    let d = span((0x50, 0x80), (0x60, 0x80));

    let mut spans = vec![d, c, a, b];
    HashSpanCollection::merge(&mut spans);
    assert_eq!(spans, vec![span((0x10, 0x80), (0x40, 0x80)), d]);
}

#[test]
fn merge_trivial_inputs() {
    let mut spans = vec![];
    HashSpanCollection::merge(&mut spans);
    assert!(spans.is_empty());

    let single = span((0x10, 0), (0x20, 0));
    let mut spans = vec![single];
    HashSpanCollection::merge(&mut spans);
    assert_eq!(spans, vec![single]);
}

#[test]
fn missing_spans_with_gaps() {
    let a = span((0x10, 0x80), (0x20, 0x80));
    let b = span((0x30, 0x80), (0x40, 0x80));
    let collection: HashSpanCollection = [b, a].into_iter().collect();

    let missing = collection.missing_spans();
    assert_eq!(
        missing,
        vec![
            HashSpan::new(HashValue::FIRST, value(0x10, 0x80).predecessor().unwrap()),
            HashSpan::new(
                value(0x20, 0x80).successor().unwrap(),
                value(0x30, 0x80).predecessor().unwrap()
            ),
            HashSpan::new(value(0x40, 0x80).successor().unwrap(), HashValue::LAST),
        ]
    );
}

#[test]
fn missing_spans_at_edges_only() {
    let collection = HashSpanCollection::new();
    collection.add(HashSpan::new(HashValue::FIRST, value(0x00, 0x00)));
    assert_eq!(
        collection.missing_spans(),
        vec![HashSpan::new(value(0x00, 0x00).successor().unwrap(), HashValue::LAST)]
    );

    collection.clear();
    collection.add(HashSpan::new(value(0x00, 0x00), HashValue::LAST));
    assert_eq!(
        collection.missing_spans(),
        vec![HashSpan::new(HashValue::FIRST, value(0x00, 0x00).predecessor().unwrap())]
    );
}

#[test]
fn add_remove() {
    let a = span((0x10, 0), (0x20, 0));
    let b = span((0x30, 0), (0x40, 0));
    let collection = HashSpanCollection::new();

    assert!(collection.add(a));
    assert!(!collection.add(a));
    collection.add_all([b, a]);
    assert_eq!(collection.len(), 2);
    assert!(collection.contains(&b));
    assert!(collection.covers(&value(0x15, 0)));
    assert!(!collection.covers(&value(0x25, 0)));

    collection.remove_all(&[a]);
    assert_eq!(collection.spans(), vec![b]);
    assert!(!collection.remove(&a));
    assert!(collection.remove(&b));
    assert!(collection.is_empty());
}

#[test]
fn compact_keeps_coverage() {
    let collection: HashSpanCollection = vec![
        span((0x10, 0), (0x20, 0)),
        span((0x15, 0), (0x25, 0)),
        span((0x50, 0), (0x60, 0)),
    ]
    .into();
    let before = collection.clone();

    collection.compact();
    assert_eq!(collection.len(), 2);
    assert_eq!(collection, before);
}

#[test]
fn equality_ignores_fragmentation() {
    let x = value(0x00, 0x00);
    let whole: HashSpanCollection = vec![HashSpan::FULL].into();
    let halves: HashSpanCollection = vec![
        HashSpan::new(HashValue::FIRST, x),
        HashSpan::new(x.successor().unwrap(), HashValue::LAST),
    ]
    .into();
    let overlapping: HashSpanCollection = vec![
        HashSpan::new(HashValue::FIRST, x),
        HashSpan::new(HashValue::FIRST, HashValue::LAST),
        HashSpan::new(x, HashValue::LAST),
    ]
    .into();

    assert!(HashSpanCollection::are_equal(&whole, &halves));
    assert_eq!(halves, overlapping);
    assert_ne!(whole, HashSpanCollection::new());
    assert_ne!(
        halves,
        HashSpanCollection::from(vec![HashSpan::new(HashValue::FIRST, x)])
    );
}

#[test]
fn shared_between_threads() {
    let collection = Arc::new(HashSpanCollection::new());
    let handles: Vec<_> = (0u16..4)
        .map(|i| {
            let collection = Arc::clone(&collection);
            thread::spawn(move || {
                for unit in (i * 64)..(i * 64 + 64) {
                    collection.add(HashSpan::of_units(unit as u8, unit as u8));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(collection.len(), 256);
    assert!(collection.is_full());
}

proptest! {
    #[test]
    fn merge_is_idempotent(mut spans in spans()) {
        HashSpanCollection::merge(&mut spans);
        let once = spans.clone();
        HashSpanCollection::merge(&mut spans);
        prop_assert_eq!(once, spans);
    }

    #[test]
    fn merge_is_minimal(spans in spans()) {
        let merged = HashSpanCollection::from(spans).merged();
        for pair in merged.windows(2) {
            prop_assert!(pair[0].last() < pair[1].first());
            prop_assert!(!pair[0].overlaps(&pair[1]));
            prop_assert!(!pair[0].is_adjacent_to(&pair[1]));
        }
    }

    #[test]
    fn merge_keeps_coverage(spans in spans(), probe in hash_span()) {
        let collection = HashSpanCollection::from(spans);
        let merged: HashSpanCollection = collection.merged().into();
        for point in [probe.first(), probe.last()] {
            prop_assert_eq!(collection.covers(point), merged.covers(point));
        }
    }

    #[test]
    fn missing_spans_complete_the_hash_space(spans in spans()) {
        let collection = HashSpanCollection::from(spans);
        let missing = collection.missing_spans();
        let merged = collection.merged();

        // No overlap between what is covered and what is missing.
        for gap in &missing {
            prop_assert!(merged.iter().all(|span| !span.overlaps(gap)));
        }
        for pair in missing.windows(2) {
            prop_assert!(!pair[0].overlaps(&pair[1]));
        }

        // Together they cover everything.
        let union: HashSpanCollection = merged.into_iter().chain(missing).collect();
        prop_assert!(union.is_full());
        prop_assert_eq!(union.merged(), vec![HashSpan::FULL]);
    }

    #[test]
    fn merge_order_does_not_matter(spans in spans()) {
        let mut forward = spans.clone();
        let mut backward: Vec<_> = spans.into_iter().rev().collect();
        HashSpanCollection::merge(&mut forward);
        HashSpanCollection::merge(&mut backward);
        prop_assert_eq!(forward, backward);
    }
}

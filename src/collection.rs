use {
    super::{HashSpan, HashValue},
    parking_lot::RwLock,
    rapidhash::RapidBuildHasher,
    std::{collections::HashSet, fmt},
};

/// A set of hash spans.
///
/// Spans are kept as inserted: overlapping or adjacent spans are not merged
/// until asked to (see [`merged()`](Self::merged) and
/// [`compact()`](Self::compact)).
///
/// The collection can be shared between threads: reads run concurrently,
/// writes are exclusive. Derived computations (merge, missing spans) work on a
/// snapshot taken under the read lock.
#[derive(Default)]
pub struct HashSpanCollection {
    spans: RwLock<HashSet<HashSpan, RapidBuildHasher>>,
}

impl HashSpanCollection {
    /// Creates a new empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a span. Returns `false` if the exact span was already present.
    pub fn add(&self, span: HashSpan) -> bool {
        self.spans.write().insert(span)
    }

    /// Adds all the given spans.
    pub fn add_all<I: IntoIterator<Item = HashSpan>>(&self, spans: I) {
        self.spans.write().extend(spans);
    }

    /// Removes a span. Returns `false` if the exact span was not present.
    ///
    /// Only the very span is removed: no partial subtraction from other spans
    /// takes place.
    pub fn remove(&self, span: &HashSpan) -> bool {
        self.spans.write().remove(span)
    }

    /// Removes all the given spans.
    pub fn remove_all<'a, I: IntoIterator<Item = &'a HashSpan>>(&self, spans: I) {
        let mut guard = self.spans.write();
        for span in spans {
            guard.remove(span);
        }
    }

    /// Removes all spans.
    pub fn clear(&self) {
        self.spans.write().clear();
    }

    /// Number of spans in the collection (as inserted, not merged).
    pub fn len(&self) -> usize {
        self.spans.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.read().is_empty()
    }

    /// Returns `true` if the exact span is in the collection.
    pub fn contains(&self, span: &HashSpan) -> bool {
        self.spans.read().contains(span)
    }

    /// Returns `true` if any span of the collection contains the hash.
    pub fn covers(&self, hash: &HashValue) -> bool {
        self.spans.read().iter().any(|span| span.contains(hash))
    }

    /// Snapshot of the spans, sorted by position in the hash space.
    pub fn spans(&self) -> Vec<HashSpan> {
        let mut spans: Vec<_> = self.spans.read().iter().copied().collect();
        spans.sort();
        spans
    }

    /// Collapses overlapping and adjacent spans into the minimal set of
    /// disjoint spans covering the same values.
    ///
    /// The result is sorted by position in the hash space. Empty and singleton
    /// lists are left untouched.
    pub fn merge(spans: &mut Vec<HashSpan>) {
        if spans.len() < 2 {
            return;
        }
        spans.sort();

        let mut merged: Vec<HashSpan> = Vec::with_capacity(spans.len());
        for span in spans.drain(..) {
            match merged.last_mut() {
                Some(prev) if prev.overlaps(&span) || prev.is_adjacent_to(&span) => {
                    *prev = prev.union(&span);
                }
                _ => merged.push(span),
            }
        }
        *spans = merged;
    }

    /// Minimal set of disjoint spans covering the same values as the
    /// collection, sorted.
    pub fn merged(&self) -> Vec<HashSpan> {
        let mut spans = self.spans();
        Self::merge(&mut spans);
        spans
    }

    /// Replaces the contents of the collection with its merged form.
    pub fn compact(&self) {
        let mut guard = self.spans.write();
        let mut spans: Vec<_> = guard.drain().collect();
        Self::merge(&mut spans);
        guard.extend(spans);
    }

    /// Returns the spans of the hash space not covered by the collection.
    ///
    /// The returned spans are sorted and pairwise disjoint; together with the
    /// collection they cover the whole hash space. An empty collection misses
    /// exactly [`HashSpan::FULL`].
    pub fn missing_spans(&self) -> Vec<HashSpan> {
        let merged = self.merged();
        let (Some(head), Some(tail)) = (merged.first(), merged.last()) else {
            return vec![HashSpan::FULL];
        };

        let mut missing = Vec::new();
        if let Some(before) = head.first().predecessor() {
            missing.push(HashSpan::new(HashValue::FIRST, before));
        }
        for pair in merged.windows(2) {
            // Merged spans are disjoint and not adjacent: there is at least one
            // value in between.
            if let (Some(start), Some(end)) =
                (pair[0].last().successor(), pair[1].first().predecessor())
            {
                missing.push(HashSpan::new(start, end));
            }
        }
        if let Some(after) = tail.last().successor() {
            missing.push(HashSpan::new(after, HashValue::LAST));
        }
        missing
    }

    /// Returns `true` if the collection covers the whole hash space.
    pub fn is_full(&self) -> bool {
        self.missing_spans().is_empty()
    }

    /// Returns `true` if both collections cover exactly the same values,
    /// regardless of how they are fragmented.
    pub fn are_equal(a: &Self, b: &Self) -> bool {
        a.merged() == b.merged()
    }
}

impl PartialEq for HashSpanCollection {
    fn eq(&self, other: &Self) -> bool {
        Self::are_equal(self, other)
    }
}

impl Eq for HashSpanCollection {}

impl Clone for HashSpanCollection {
    fn clone(&self) -> Self {
        Self {
            spans: RwLock::new(self.spans.read().clone()),
        }
    }
}

impl fmt::Debug for HashSpanCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.spans()).finish()
    }
}

impl FromIterator<HashSpan> for HashSpanCollection {
    fn from_iter<I: IntoIterator<Item = HashSpan>>(iter: I) -> Self {
        let collection = Self::new();
        collection.add_all(iter);
        collection
    }
}

impl From<Vec<HashSpan>> for HashSpanCollection {
    fn from(spans: Vec<HashSpan>) -> Self {
        spans.into_iter().collect()
    }
}

use {super::HashValue, std::fmt};

/// An inclusive range of the hash space, i.e. `[first..=last]`.
///
/// The invariant `first <= last` always holds: the constructor silently swaps
/// reversed end points.
///
/// Spans are ordered by `first`, ties broken by `last`, so sorting a list of
/// spans yields them in hash-space order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HashSpan {
    first: HashValue,
    last: HashValue,
}

impl HashSpan {
    /// Span covering the whole hash space.
    pub const FULL: Self = Self {
        first: HashValue::FIRST,
        last: HashValue::LAST,
    };

    /// Creates a new span from the given end points (in any order).
    pub fn new(first: HashValue, last: HashValue) -> Self {
        if first <= last {
            Self { first, last }
        } else {
            Self {
                first: last,
                last: first,
            }
        }
    }

    /// Span covering the leading-byte units `first_unit..=last_unit`.
    pub(crate) fn of_units(first_unit: u8, last_unit: u8) -> Self {
        Self::new(
            HashValue::unit_start(first_unit),
            HashValue::unit_end(last_unit),
        )
    }

    /// First (smallest) value of the span.
    pub fn first(&self) -> &HashValue {
        &self.first
    }

    /// Last (largest) value of the span.
    pub fn last(&self) -> &HashValue {
        &self.last
    }

    /// Returns `true` if the span covers the whole hash space.
    pub fn is_full(&self) -> bool {
        *self == Self::FULL
    }

    /// Check if the given hash is within the span (both ends inclusive).
    pub fn contains(&self, hash: &HashValue) -> bool {
        self.first <= *hash && *hash <= self.last
    }

    /// Returns `true` if the two spans share at least one value.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.contains(&other.first)
            || self.contains(&other.last)
            || other.contains(&self.first)
            || other.contains(&self.last)
    }

    /// Returns `true` if one span is a continuation of the other.
    ///
    /// That is, spans do not intersect, but there is no value between them:
    /// `[a, b]` and `[b + 1, c]` are adjacent.
    pub fn is_adjacent_to(&self, other: &Self) -> bool {
        let continues_after = self.last != HashValue::LAST
            && self.last.successor().as_ref() == Some(&other.first);
        let continues_before = self.first != HashValue::FIRST
            && self.first.predecessor().as_ref() == Some(&other.last);
        continues_after || continues_before
    }

    /// Smallest span covering both spans.
    ///
    /// Only meaningful for overlapping or adjacent spans, otherwise the values
    /// between the two are covered as well.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            first: self.first.min(other.first),
            last: self.last.max(other.last),
        }
    }
}

impl fmt::Debug for HashSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HashSpan")
            .field(&self.first)
            .field(&self.last)
            .finish()
    }
}

impl From<HashValue> for HashSpan {
    fn from(hash: HashValue) -> Self {
        Self::new(hash, hash)
    }
}

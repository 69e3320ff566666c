use {
    super::{HASH_LEN, HashSpan, HashValue, SpanError, SpanResult},
    std::ops::Deref,
};

/// Largest bucket index. Bucket coordinates are in `[0, MAX_BUCKET]`.
pub const MAX_BUCKET: u32 = 1 << 16;

/// Width of a bucket: the hash space size divided by [`MAX_BUCKET`], `2^592`.
const STEP: HashValue = {
    let mut bytes = [0x80u8; HASH_LEN];
    bytes[1] = 0x81;
    HashValue::from_array(bytes)
};

/// `STEP - 1`.
const STEP_LESS_ONE: HashValue = {
    let mut bytes = [0x7fu8; HASH_LEN];
    bytes[0] = 0x80;
    bytes[1] = 0x80;
    HashValue::from_array(bytes)
};

/// Span of the hash space expressed in coarse bucket coordinates.
///
/// Bucket `i` maps onto the hash value [`value_of(i)`](Self::value_of); the
/// span itself covers `[value_of(first_bucket), value_of(last_bucket)]`.
/// Useful for reasoning about the hash space without full-precision
/// arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AbstractHashSpan {
    first_bucket: u32,
    last_bucket: u32,
    span: HashSpan,
}

impl AbstractHashSpan {
    /// Creates a span over the given buckets (in any order).
    pub fn new(first_bucket: u32, last_bucket: u32) -> SpanResult<Self> {
        for bucket in [first_bucket, last_bucket] {
            if bucket > MAX_BUCKET {
                return Err(SpanError::BucketOutOfRange(bucket));
            }
        }
        let (first_bucket, last_bucket) = if first_bucket <= last_bucket {
            (first_bucket, last_bucket)
        } else {
            (last_bucket, first_bucket)
        };

        Ok(Self::from_buckets(first_bucket, last_bucket))
    }

    /// Smallest bucket span enclosing the given concrete span.
    ///
    /// End points are rounded outwards: the lower one down and the upper one
    /// up, so the result never excludes a value of `span`.
    pub fn from_span(span: &HashSpan) -> Self {
        Self::from_buckets(floor_bucket(span.first()), ceil_bucket(span.last()))
    }

    fn from_buckets(first_bucket: u32, last_bucket: u32) -> Self {
        Self {
            first_bucket,
            last_bucket,
            span: HashSpan::new(bucket_value(first_bucket), bucket_value(last_bucket)),
        }
    }

    /// Hash value of the given bucket index.
    ///
    /// Bucket `0` is [`HashValue::FIRST`], bucket `i > 0` is `i * STEP - 1`,
    /// with [`MAX_BUCKET`] landing exactly on [`HashValue::LAST`].
    pub fn value_of(bucket: u32) -> SpanResult<HashValue> {
        if bucket > MAX_BUCKET {
            return Err(SpanError::BucketOutOfRange(bucket));
        }
        Ok(bucket_value(bucket))
    }

    /// First bucket of the span.
    pub fn first_bucket(&self) -> u32 {
        self.first_bucket
    }

    /// Last bucket of the span.
    pub fn last_bucket(&self) -> u32 {
        self.last_bucket
    }

    /// Concrete span covered by the buckets.
    pub fn span(&self) -> &HashSpan {
        &self.span
    }
}

impl Deref for AbstractHashSpan {
    type Target = HashSpan;

    fn deref(&self) -> &Self::Target {
        &self.span
    }
}

impl From<&HashSpan> for AbstractHashSpan {
    fn from(span: &HashSpan) -> Self {
        Self::from_span(span)
    }
}

/// `(bucket - 1) * STEP + (STEP - 1)`, which is `bucket * STEP - 1` without
/// overflowing at `MAX_BUCKET`.
fn bucket_value(bucket: u32) -> HashValue {
    if bucket == 0 {
        return HashValue::FIRST;
    }
    STEP.checked_mul(bucket - 1)
        .and_then(|base| base.checked_add(&STEP_LESS_ONE))
        .unwrap_or(HashValue::LAST)
}

/// Largest bucket whose value is not above `value`.
fn floor_bucket(value: &HashValue) -> u32 {
    let (mut lo, mut hi) = (0, MAX_BUCKET);
    while lo < hi {
        let mid = lo + (hi - lo).div_ceil(2);
        if bucket_value(mid) <= *value {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    lo
}

/// Smallest bucket whose value is not below `value`.
fn ceil_bucket(value: &HashValue) -> u32 {
    let (mut lo, mut hi) = (0, MAX_BUCKET);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if bucket_value(mid) >= *value {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    lo
}

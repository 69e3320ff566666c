//! Hash-space partitioning for content-addressed chunk storage.
//!
//! Chunks are identified by a fixed-width [`HashValue`]. Servers own spans of
//! the hash space ([`HashSpan`]); [`SpanCalculator`] distributes the hash space
//! across servers proportionally to their free space, and
//! [`HashSpanCollection`] answers which parts of the hash space a set of spans
//! leaves uncovered.

mod assignment;
mod bucket;
mod builder;
mod calculator;
mod collection;
mod error;
mod hash;
mod server;
mod span;

#[cfg(test)]
mod collection_test;

pub use {
    assignment::{ServerSpans, SpanAssignment},
    bucket::{AbstractHashSpan, MAX_BUCKET},
    builder::{CalculatorBuilder, DEFAULT_REPLICATION_FACTOR},
    calculator::SpanCalculator,
    collection::HashSpanCollection,
    error::{SpanError, SpanResult},
    hash::{HASH_LEN, HashValue},
    server::{CapacityError, CapacitySource, Server},
    span::HashSpan,
};

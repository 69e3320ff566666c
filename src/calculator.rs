use {
    super::{
        CapacitySource,
        HashSpan,
        HashValue,
        Server,
        SpanAssignment,
        SpanError,
        SpanResult,
    },
    tracing::{debug, trace, warn},
};

/// Number of distinct values of the leading byte.
///
/// Spans are assigned in whole units, a unit being the block of hash values
/// sharing the same leading byte.
const UNITS: usize = 256;

/// Partitions the hash space across servers proportionally to their free
/// space.
///
/// Servers are walked in order, each one claiming the next stretch of the hash
/// space. With a replication factor `R`, the walk goes `R` times around the
/// hash space, so that each value is owned by `R` servers. The last server
/// absorbs whatever is left up to [`HashValue::LAST`], which keeps the
/// coverage complete regardless of rounding.
///
/// Use [`CalculatorBuilder`](crate::CalculatorBuilder) to create one.
#[derive(Debug, Clone)]
pub struct SpanCalculator<N: Server> {
    servers: Vec<N>,
    replication_factor: usize,
}

impl<N: Server> SpanCalculator<N> {
    pub(crate) fn new(servers: Vec<N>, replication_factor: usize) -> Self {
        Self {
            servers,
            replication_factor,
        }
    }

    /// Servers, in the order they are walked.
    pub fn servers(&self) -> &[N] {
        &self.servers
    }

    /// Number of servers holding each value of the hash space.
    pub fn replication_factor(&self) -> usize {
        self.replication_factor
    }

    /// Computes the spans owned by each server.
    ///
    /// Free space of every server is requested from `source`. Any lookup
    /// failure aborts the calculation, no partial assignment is returned.
    ///
    /// When the replication factor is not below the number of servers, every
    /// server owns the whole hash space.
    pub fn calculate_spans<C>(&self, source: C) -> SpanResult<SpanAssignment<N>>
    where
        C: CapacitySource<N>,
    {
        let (last, head) = self.servers.split_last().ok_or(SpanError::NoServers)?;
        let shares = self.shares(&source)?;
        let mut assignment = SpanAssignment::with_capacity(self.servers.len());

        if self.replication_factor >= self.servers.len() {
            debug!(
                "replication factor {} covers all {} server(s), assigning full hash space",
                self.replication_factor,
                self.servers.len()
            );
            for server in &self.servers {
                assignment.insert(server.clone(), vec![HashSpan::FULL], 100.0);
            }
            return Ok(assignment);
        }

        // Boundaries are rounded cumulatively, so that rounding errors do not
        // add up along the walk.
        let lap = UNITS * self.replication_factor;
        let mut start = 0;
        let mut cumulative = 0.0_f64;
        for (i, (server, &share)) in head.iter().zip(&shares).enumerate() {
            cumulative += share;
            let remaining = head.len() - i;
            let target = (cumulative * lap as f64).round() as usize;
            // At least one unit, at most the whole hash space, and leave a unit
            // for each of the remaining servers where possible.
            let end = target
                .min(lap.saturating_sub(remaining))
                .clamp(start + 1, start + UNITS);

            let spans = unit_spans(start, end);
            debug!(
                "server {server:?}: {:.2}% of capacity, units {start}..{end}, {} span(s)",
                share * 100.0,
                spans.len()
            );
            assignment.insert(server.clone(), spans, share * 100.0);
            start = end;
        }

        let share = shares[head.len()];
        let span = HashSpan::new(
            HashValue::unit_start((start % UNITS) as u8),
            HashValue::LAST,
        );
        debug!(
            "server {last:?}: {:.2}% of capacity, remainder from unit {}",
            share * 100.0,
            start % UNITS
        );
        assignment.insert(last.clone(), vec![span], share * 100.0);

        let missing = assignment.coverage().missing_spans();
        if !missing.is_empty() {
            return Err(SpanError::IncompleteCoverage(missing.len()));
        }
        Ok(assignment)
    }

    /// Fraction of the total capacity contributed by each server.
    fn shares<C: CapacitySource<N>>(&self, source: &C) -> SpanResult<Vec<f64>> {
        let capacities = self
            .servers
            .iter()
            .map(|server| {
                let capacity = source
                    .available_space(server)
                    .map_err(|source| SpanError::Capacity {
                        server: format!("{server:?}"),
                        source,
                    })?;
                trace!("server {server:?} reports {capacity} byte(s) available");
                Ok(capacity)
            })
            .collect::<SpanResult<Vec<_>>>()?;

        let total: u128 = capacities.iter().map(|c| *c as u128).sum();
        if total == 0 {
            warn!("no capacity reported by any server, splitting hash space evenly");
            let share = 1.0 / capacities.len() as f64;
            return Ok(vec![share; capacities.len()]);
        }
        Ok(capacities
            .into_iter()
            .map(|c| c as f64 / total as f64)
            .collect())
    }
}

/// Spans covering the units `start..end`, counted along the walk.
///
/// A stretch running past the last unit is split in two: the tail of the hash
/// space, and the wraparound from [`HashValue::FIRST`].
fn unit_spans(start: usize, end: usize) -> Vec<HashSpan> {
    let first = start % UNITS;
    let last = first + (end - start) - 1;
    if last < UNITS {
        vec![HashSpan::of_units(first as u8, last as u8)]
    } else {
        vec![
            HashSpan::of_units(first as u8, (UNITS - 1) as u8),
            HashSpan::of_units(0, (last - UNITS) as u8),
        ]
    }
}

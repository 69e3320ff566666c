use {
    super::{Server, SpanCalculator, SpanError, SpanResult},
    rapidhash::RapidBuildHasher,
    std::collections::HashSet,
};

/// Default number of servers holding each value of the hash space.
pub const DEFAULT_REPLICATION_FACTOR: usize = 1;

/// Span calculator builder.
///
/// Servers are kept in the given order: the order determines where in the
/// hash space each server's spans land.
pub struct CalculatorBuilder<N: Server> {
    servers: Vec<N>,
    replication_factor: usize,
}

impl<N: Server> CalculatorBuilder<N> {
    /// Create new calculator builder.
    pub fn new<I: IntoIterator<Item = N>>(servers: I) -> Self {
        Self {
            servers: servers.into_iter().collect(),
            replication_factor: DEFAULT_REPLICATION_FACTOR,
        }
    }

    /// Set the number of servers that hold each value of the hash space.
    pub fn with_replication_factor(self, replication_factor: usize) -> Self {
        Self {
            replication_factor,
            ..self
        }
    }

    /// Build the calculator.
    ///
    /// Fails if there are no servers, a server is listed twice, or the
    /// replication factor is zero.
    pub fn build(self) -> SpanResult<SpanCalculator<N>> {
        if self.servers.is_empty() {
            return Err(SpanError::NoServers);
        }
        if self.replication_factor == 0 {
            return Err(SpanError::InvalidReplicationFactor(self.replication_factor));
        }

        if let Some(duplicate) = find_duplicate(&self.servers) {
            return Err(SpanError::DuplicateServer(format!("{duplicate:?}")));
        }

        Ok(SpanCalculator::new(self.servers, self.replication_factor))
    }
}

/// First server listed more than once, if any.
fn find_duplicate<N: Server>(servers: &[N]) -> Option<&N> {
    let mut seen =
        HashSet::with_capacity_and_hasher(servers.len(), RapidBuildHasher::default());
    servers.iter().find(|server| !seen.insert(*server))
}

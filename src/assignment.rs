use {
    super::{HashSpan, HashSpanCollection, HashValue, Server},
    rapidhash::RapidBuildHasher,
    std::collections::HashMap,
};

/// Spans owned by a single server.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSpans<N> {
    server: N,
    spans: Vec<HashSpan>,
    percentage: f64,
}

impl<N> ServerSpans<N> {
    /// The server.
    pub fn server(&self) -> &N {
        &self.server
    }

    /// Spans owned by the server: one, or two when the server's stretch wraps
    /// around the end of the hash space.
    pub fn spans(&self) -> &[HashSpan] {
        &self.spans
    }

    /// Share of the total capacity contributed by the server, in percent.
    ///
    /// Informational only: the last server owns whatever is left of the hash
    /// space, which may differ from its share by rounding.
    pub fn percentage(&self) -> f64 {
        self.percentage
    }
}

/// Result of a span calculation: spans owned by each server.
///
/// Servers are kept in the order they were walked.
#[derive(Debug, Clone)]
pub struct SpanAssignment<N: Server> {
    entries: Vec<ServerSpans<N>>,

    /// Position of each server in `entries`.
    index: HashMap<N, usize, RapidBuildHasher>,
}

impl<N: Server> SpanAssignment<N> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity_and_hasher(capacity, RapidBuildHasher::default()),
        }
    }

    pub(crate) fn insert(&mut self, server: N, spans: Vec<HashSpan>, percentage: f64) {
        self.index.insert(server.clone(), self.entries.len());
        self.entries.push(ServerSpans {
            server,
            spans,
            percentage,
        });
    }

    /// Spans owned by the given server.
    ///
    /// Whenever the server took no part in the calculation, `None` is
    /// returned.
    pub fn spans(&self, server: &N) -> Option<&[HashSpan]> {
        self.get(server).map(ServerSpans::spans)
    }

    /// Share of the total capacity contributed by the given server, in percent.
    pub fn percentage(&self, server: &N) -> Option<f64> {
        self.get(server).map(ServerSpans::percentage)
    }

    /// Returns the entry of the given server.
    pub fn get(&self, server: &N) -> Option<&ServerSpans<N>> {
        self.index.get(server).map(|idx| &self.entries[*idx])
    }

    /// Iterator over the servers and their spans, in walk order.
    pub fn iter(&self) -> impl Iterator<Item = &ServerSpans<N>> {
        self.entries.iter()
    }

    /// Number of servers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Servers owning the given hash, in walk order.
    ///
    /// With replication factor `R` there are normally `R` of them.
    pub fn servers_for<'a>(&'a self, hash: &'a HashValue) -> impl Iterator<Item = &'a N> {
        self.entries
            .iter()
            .filter(move |entry| entry.spans.iter().any(|span| span.contains(hash)))
            .map(|entry| &entry.server)
    }

    /// Union of the spans owned by all servers.
    pub fn coverage(&self) -> HashSpanCollection {
        self.entries
            .iter()
            .flat_map(|entry| entry.spans.iter().copied())
            .collect()
    }
}

impl<'a, N: Server> IntoIterator for &'a SpanAssignment<N> {
    type Item = &'a ServerSpans<N>;
    type IntoIter = std::slice::Iter<'a, ServerSpans<N>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

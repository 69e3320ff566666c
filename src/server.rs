use {
    auto_impl::auto_impl,
    std::{
        collections::{BTreeMap, HashMap},
        error::Error,
        fmt::Debug,
        hash::{BuildHasher, Hash},
    },
};

/// Server that stores chunks.
///
/// Server owns one or two spans of the hash space. Chunks whose hash falls
/// into such a span are stored on the server (and its replicas).
pub trait Server: Hash + Eq + Clone + Debug {}

/// Blanket implementation of `Server` for all types that implement the
/// necessary traits.
impl<T> Server for T where T: Hash + Eq + Clone + Debug {}

/// Error returned by a capacity lookup.
pub type CapacityError = Box<dyn Error + Send + Sync + 'static>;

/// Source of the free space advertised by servers.
///
/// Capacities of all servers are summed up to determine the total capacity of
/// the network. The relative capacity of a server is then ratio of the
/// server's capacity to the total, and determines what portion of the hash
/// space the server will own.
///
/// Normally this requires a round-trip to the server; any failure aborts the
/// whole calculation.
#[auto_impl(&, Box, Arc)]
pub trait CapacitySource<N: Server> {
    /// Free space available on the server, in bytes.
    fn available_space(&self, server: &N) -> Result<u64, CapacityError>;
}

impl<N: Server, S: BuildHasher> CapacitySource<N> for HashMap<N, u64, S> {
    fn available_space(&self, server: &N) -> Result<u64, CapacityError> {
        self.get(server)
            .copied()
            .ok_or_else(|| format!("no capacity reported by {server:?}").into())
    }
}

impl<N: Server + Ord> CapacitySource<N> for BTreeMap<N, u64> {
    fn available_space(&self, server: &N) -> Result<u64, CapacityError> {
        self.get(server)
            .copied()
            .ok_or_else(|| format!("no capacity reported by {server:?}").into())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::sync::Arc};

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct TestServer {
        host: String,
        port: u16,
    }

    struct Fixed(u64);

    impl<N: Server> CapacitySource<N> for Fixed {
        fn available_space(&self, _server: &N) -> Result<u64, CapacityError> {
            Ok(self.0)
        }
    }

    fn check_capacity<N: Server>(source: impl CapacitySource<N>, server: &N, expected: u64) {
        assert_eq!(source.available_space(server).unwrap(), expected);
    }

    #[test]
    fn map_sources() {
        let server = TestServer {
            host: "10.0.0.1".to_string(),
            port: 1500,
        };
        let other = TestServer {
            port: 1501,
            ..server.clone()
        };

        let capacities = HashMap::from([(server.clone(), 100u64)]);
        check_capacity(&capacities, &server, 100);
        let err = capacities.available_space(&other).unwrap_err();
        assert!(err.to_string().contains("1501"));

        let capacities = BTreeMap::from([("a", 7u64)]);
        check_capacity(Box::new(capacities.clone()), &"a", 7);
        assert!(capacities.available_space(&"b").is_err());
    }

    #[test]
    fn wrapped_sources() {
        check_capacity(Fixed(42), &"a", 42);
        check_capacity(&Fixed(42), &"a", 42);
        check_capacity(Arc::new(Fixed(42)), &1u32, 42);
    }
}

//! Error types for the percolation core library.
//!
//! Defines the error enum exposed by the public API, its stable error codes,
//! and a convenient result alias. Invariant violations are classified
//! separately so drivers can treat them as unrecoverable.

use std::fmt;

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error type produced by graph mutation, construction, and percolation.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PercolationError {
    /// A node identifier fell outside `0..node_count`.
    #[error("node {node} is out of bounds for a graph of {node_count} nodes")]
    NodeOutOfBounds {
        /// The offending identifier.
        node: usize,
        /// Number of nodes in the graph.
        node_count: usize,
    },
    /// An edge from a node to itself was requested.
    #[error("refusing to insert a self-loop on node {node}")]
    SelfLoop {
        /// Node the loop would attach to.
        node: usize,
    },
    /// The requested edge already exists.
    #[error("edge ({left}, {right}) already exists")]
    DuplicateEdge {
        /// First endpoint.
        left: usize,
        /// Second endpoint.
        right: usize,
    },
    /// A neighbour expected in an adjacency list was absent.
    #[error("node {node} has no neighbour {neighbour}")]
    MissingNeighbour {
        /// Node whose adjacency was searched.
        node: usize,
        /// Neighbour that should have been present.
        neighbour: usize,
    },
    /// A dependant expected in a coupling list was absent.
    #[error("node {node} has no dependant {dependant}")]
    MissingDependant {
        /// Node whose dependant list was searched.
        node: usize,
        /// Dependant that should have been present.
        dependant: usize,
    },
    /// An edge is recorded on one endpoint only.
    #[error("edge {source_node} -> {target} has no backlink")]
    AsymmetricEdge {
        /// Endpoint holding the edge.
        source_node: usize,
        /// Endpoint missing the reverse edge.
        target: usize,
    },
    /// A neighbour is listed more than once, or a node lists itself.
    #[error("node {node} lists neighbour {neighbour} more than once or as itself")]
    DuplicateNeighbour {
        /// Node with the malformed adjacency.
        node: usize,
        /// Repeated neighbour.
        neighbour: usize,
    },
    /// A probability lay outside its permitted range.
    #[error("{name} must lie in {range} (got {value})")]
    InvalidProbability {
        /// Name of the parameter.
        name: &'static str,
        /// Human-readable permitted range.
        range: &'static str,
        /// Supplied value.
        value: f64,
    },
    /// Two complementary probabilities did not sum to one.
    #[error("threshold probabilities must sum to 1 (got {first} + {second})")]
    ProbabilitiesDoNotSum {
        /// Probability of the first threshold.
        first: f64,
        /// Probability of the second threshold.
        second: f64,
    },
    /// Mean degree was negative or non-finite.
    #[error("mean degree must be finite and non-negative (got {value})")]
    InvalidMeanDegree {
        /// Supplied mean degree.
        value: f64,
    },
    /// The requested edge count exceeds the simple-graph maximum.
    #[error("cannot place {target} edges in a simple graph holding at most {max_edges}")]
    EdgeTargetUnreachable {
        /// Requested edge count.
        target: usize,
        /// Largest edge count the graph can hold.
        max_edges: usize,
    },
    /// An operation required at least one node.
    #[error("graph contains no nodes")]
    EmptyGraph,
    /// Two graphs that must share an index space differ in size.
    #[error("graph has {actual} nodes but {expected} were expected")]
    GraphSizeMismatch {
        /// Required node count.
        expected: usize,
        /// Observed node count.
        actual: usize,
    },
    /// The occupation-probability schedule is malformed.
    #[error("invalid sweep: {reason}")]
    InvalidSweep {
        /// Description of the problem.
        reason: String,
    },
    /// A caller-supplied scan order is not a permutation of the node set.
    #[error("scan order is not a permutation of 0..{node_count}: {reason}")]
    InvalidScanOrder {
        /// Number of nodes in the graph.
        node_count: usize,
        /// Description of the problem.
        reason: String,
    },
    /// Pruning exceeded the pass bound implied by the node count.
    #[error("pruning did not converge after {passes} passes over {node_count} nodes")]
    NonConvergence {
        /// Passes performed before giving up.
        passes: usize,
        /// Number of nodes in the graph.
        node_count: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`PercolationError`] variants.
    enum PercolationErrorCode for PercolationError {
        /// A node identifier fell outside the graph.
        NodeOutOfBounds => NodeOutOfBounds { .. } => "PERCOLATE_NODE_OUT_OF_BOUNDS",
        /// A self-loop was requested.
        SelfLoop => SelfLoop { .. } => "PERCOLATE_SELF_LOOP",
        /// The requested edge already exists.
        DuplicateEdge => DuplicateEdge { .. } => "PERCOLATE_DUPLICATE_EDGE",
        /// A neighbour expected in an adjacency list was absent.
        MissingNeighbour => MissingNeighbour { .. } => "PERCOLATE_MISSING_NEIGHBOUR",
        /// A dependant expected in a coupling list was absent.
        MissingDependant => MissingDependant { .. } => "PERCOLATE_MISSING_DEPENDANT",
        /// An edge is recorded on one endpoint only.
        AsymmetricEdge => AsymmetricEdge { .. } => "PERCOLATE_ASYMMETRIC_EDGE",
        /// A neighbour is repeated or self-referential.
        DuplicateNeighbour => DuplicateNeighbour { .. } => "PERCOLATE_DUPLICATE_NEIGHBOUR",
        /// A probability lay outside its permitted range.
        InvalidProbability => InvalidProbability { .. } => "PERCOLATE_INVALID_PROBABILITY",
        /// Complementary probabilities did not sum to one.
        ProbabilitiesDoNotSum => ProbabilitiesDoNotSum { .. } => "PERCOLATE_PROBABILITIES_DO_NOT_SUM",
        /// Mean degree was negative or non-finite.
        InvalidMeanDegree => InvalidMeanDegree { .. } => "PERCOLATE_INVALID_MEAN_DEGREE",
        /// The requested edge count cannot be realised.
        EdgeTargetUnreachable => EdgeTargetUnreachable { .. } => "PERCOLATE_EDGE_TARGET_UNREACHABLE",
        /// An operation required at least one node.
        EmptyGraph => EmptyGraph => "PERCOLATE_EMPTY_GRAPH",
        /// Two graphs differ in size.
        GraphSizeMismatch => GraphSizeMismatch { .. } => "PERCOLATE_GRAPH_SIZE_MISMATCH",
        /// The sweep schedule is malformed.
        InvalidSweep => InvalidSweep { .. } => "PERCOLATE_INVALID_SWEEP",
        /// A scan order is not a permutation of the node set.
        InvalidScanOrder => InvalidScanOrder { .. } => "PERCOLATE_INVALID_SCAN_ORDER",
        /// Pruning failed to reach a fixed point.
        NonConvergence => NonConvergence { .. } => "PERCOLATE_NON_CONVERGENCE",
    }
}

impl PercolationError {
    /// Returns `true` when the error signals corrupted adjacency or coupling
    /// state.
    ///
    /// These errors indicate a programming defect rather than bad input, and
    /// callers must not attempt to continue with the affected graph.
    ///
    /// # Examples
    /// ```
    /// use percolate_core::PercolationError;
    ///
    /// let err = PercolationError::MissingNeighbour { node: 0, neighbour: 1 };
    /// assert!(err.is_invariant_violation());
    /// assert!(!PercolationError::EmptyGraph.is_invariant_violation());
    /// ```
    #[must_use]
    pub const fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::MissingNeighbour { .. }
                | Self::MissingDependant { .. }
                | Self::AsymmetricEdge { .. }
                | Self::DuplicateNeighbour { .. }
                | Self::NonConvergence { .. }
        )
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, PercolationError>;

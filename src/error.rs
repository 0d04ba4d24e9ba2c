use thiserror::Error;

/// StoreError
///
/// Failures raised by a `KeyValueStore` backend. Callers in the navigation and
/// theme layers never propagate these: a failed read is treated as an absent
/// value and a failed write is logged and dropped.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// RouteTableError
///
/// Structural problems detected while building a `RouteTable`.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("route table has no catch-all node")]
    MissingCatchAll,

    #[error("route table declares more than one catch-all node")]
    MultipleCatchAll,

    #[error("catch-all node must be declared last")]
    CatchAllNotLast,

    #[error("catch-all node must be a top-level route")]
    NestedCatchAll,

    #[error("duplicate route name: {0}")]
    DuplicateName(String),
}

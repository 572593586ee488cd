use thiserror::Error;

/// Failures the core can surface to a caller.
#[derive(Debug, Error)]
pub enum Error {
    /// The frame source refused an open/enqueue/dequeue/stream-control
    /// call.
    #[error("device I/O error: {0}")]
    DeviceIo(String),
    /// An operation was invoked on a pipeline that has no open frame
    /// source.
    #[error("operation invoked on a pipeline that is not open")]
    NotOpen,
    /// An unknown control keyword, or a LUT/mask/polar-table install with
    /// a shape that isn't merely a truncation-tolerant short copy.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),
    /// Run or region array capacity was exceeded.
    ///
    /// Never returned by [`crate::pipeline::Pipeline::analyse`] — capacity
    /// overflow is a degraded-mode result, not an error. This variant
    /// exists so the failure kind has a name callers can match on if they
    /// choose to surface it themselves.
    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),
}

/// A specialised `Result` type for core operations.
pub type Result<T> = ::std::result::Result<T, Error>;

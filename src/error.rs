use thiserror::Error;

/// Errors raised while building a cache configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An environment variable is set but does not hold a valid number.
    #[error("invalid value for {name}: {value:?}")]
    InvalidEnvVar { name: &'static str, value: String },

    /// A cache needs at least one shard.
    #[error("shard count must be greater than zero")]
    ZeroShards,
}

pub type Result<T> = std::result::Result<T, Error>;

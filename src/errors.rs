/// Error types for pool discovery, quoting, compilation and relay routing
use crate::relay::RelayProvider;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// Failure inside a ledger transport collaborator, surfaced unchanged
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("Account not found: {0}")]
    AccountNotFound(Pubkey),

    #[error("Invalid account data for {address}: {reason}")]
    InvalidAccountData { address: Pubkey, reason: String },

    #[error("RPC error: {0}")]
    Rpc(String),
}

#[derive(Error, Debug)]
pub enum SwapError {
    #[error("Invalid parameter '{field}': {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error("Pool discovery unavailable for {venue} {pair}: {reason}")]
    PoolDiscoveryUnavailable {
        venue: String,
        pair: String,
        reason: String,
    },

    #[error("No {venue} pool found for {target}/{quote}")]
    PoolNotFound {
        venue: String,
        target: String,
        quote: String,
    },

    #[error("Quote computation failed: {0}")]
    QuoteComputationFailed(String),

    #[error("Failed to build instruction: {0}")]
    InstructionBuild(String),

    #[error("Relay configuration missing for {0}")]
    RelayConfigurationMissing(RelayProvider),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Submission via {provider} failed: {message}")]
    Submission {
        provider: RelayProvider,
        message: String,
    },
}

impl SwapError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SwapError::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }

    /// Whether retrying the whole operation later may succeed.
    /// Nothing inside the crate retries on its own.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SwapError::PoolDiscoveryUnavailable { .. } => true,
            SwapError::Transport(TransportError::Rpc(_)) => true,
            SwapError::Submission { .. } => true,
            _ => false,
        }
    }
}

pub type SwapResult<T> = std::result::Result<T, SwapError>;

/// Configuration loading failures
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("Config already initialized")]
    AlreadyInitialized,
}

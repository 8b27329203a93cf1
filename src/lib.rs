pub mod arguments;
pub mod config;
pub mod constants;
pub mod errors;
pub mod listings;
pub mod logger;
pub mod paths;
pub mod pools;
pub mod relay;
pub mod rpc;
pub mod swaps;
pub mod venues;

#[cfg(test)]
mod testing;

pub use errors::{SwapError, SwapResult, TransportError};
pub use swaps::{CompiledSwap, SwapEngine, SwapRequest};

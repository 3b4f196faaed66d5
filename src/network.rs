//! Network URL constants for the Candy Machine SDK.

/// Default JSON-RPC URL (mainnet-beta).
pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Default pubsub WebSocket URL (mainnet-beta).
pub const DEFAULT_WS_URL: &str = "wss://api.mainnet-beta.solana.com";

/// Devnet JSON-RPC URL.
pub const DEVNET_RPC_URL: &str = "https://api.devnet.solana.com";

/// Devnet pubsub WebSocket URL.
pub const DEVNET_WS_URL: &str = "wss://api.devnet.solana.com";

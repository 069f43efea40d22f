//! Tunable values for the TUI event loop and rendering.

/// Event loop tick rate in milliseconds.
pub const TUI_TICK_RATE_MS: u64 = 200;

/// How long transient status messages stay visible.
pub const UI_MESSAGE_TTL_SECS: u64 = 5;

//! # Management Module
//!
//! Local state of the terminal client: the Spotify tokens, where they are
//! kept and how they are refreshed.
//!
//! ## Overview
//!
//! - [`TokenState`] - Access token, refresh token and absolute expiry in
//!   milliseconds. Expired means `now > expiry`.
//! - [`TokenStore`] - Durable home of the state. [`FileTokenStore`] writes a
//!   JSON document into the data directory, [`MemoryTokenStore`] keeps it in
//!   memory.
//! - [`TokenManager`] - Hands out valid access tokens and is the only writer
//!   of the state. [`SessionTokens`] is the concrete manager the CLI uses.
//! - [`TokenRefresher`] - Performs the refresh grant. [`BridgeRefresher`]
//!   calls the auth bridge, which holds the client secret.
//!
//! ## Refresh
//!
//! ```text
//! caller ─► get_valid_token ─► usable? ──yes──► token
//!                                 │no
//!                                 ▼
//!                          refresh gate (one at a time)
//!                                 │
//!                          re-check state ──usable──► token
//!                                 │
//!                          TokenRefresher ──ok──► commit + token
//!                                 │err
//!                                 ▼
//!                          clear state ─► None (samples)
//! ```
//!
//! A failed refresh unlinks the account; discovery then serves sample
//! tracks until the user links again.

mod auth;
mod state;
mod store;

pub use auth::BridgeRefresher;
pub use auth::SessionTokens;
pub use auth::TokenError;
pub use auth::TokenManager;
pub use auth::TokenRefresher;
pub use state::TokenState;
pub use state::now_ms;
pub use store::FileTokenStore;
pub use store::MemoryTokenStore;
pub use store::StoreError;
pub use store::TokenStore;

//! # CLI Module
//!
//! Command-line layer of moodtune. Each command opens a [`Session`] (token
//! manager, discovery client, Spotify client and fallback catalog wired from
//! the environment), runs one operation and prints the result.
//!
//! ## Commands
//!
//! - [`serve`] - Runs the auth bridge in the foreground
//! - [`link`] - Links a Spotify account through the bridge's redirect
//! - [`logout`] - Forgets stored tokens
//! - [`list_moods`] - Lists moods with their genres
//! - [`search`] - Searches tracks, mixing in Hindi results
//! - [`recommend`] - Tracks for one mood
//! - [`hindi`] - Bollywood picks
//! - [`track`] - Details and audio features of one track
//! - [`play`] - Plays previews through the default audio output
//!
//! ## Architecture
//!
//! ```text
//! CLI Layer (User Interface)
//!     ↓
//! Management Layer (Token lifecycle)
//!     ↓
//! Spotify Layer (Resource API and Web API clients)
//!     ↓
//! Network Layer (HTTP Requests)
//! ```
//!
//! Discovery commands never fail on network or auth problems: the library
//! serves sample tracks instead, and the track tables show which playback
//! source each row would resolve to.
//!
//! ## Usage
//!
//! ```bash
//! moodtune serve                  # Run the auth bridge
//! moodtune link                   # Link a Spotify account
//! moodtune recommend happy        # Mood picks
//! moodtune search "lofi beats"    # Search
//! moodtune play "lofi beats"      # Play previews of the results
//! ```

mod auth;
mod moods;
mod play;
mod serve;
mod session;
mod tracks;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub use auth::link;
pub use auth::logout;
pub use moods::list_moods;
pub use play::play;
pub use serve::serve;
pub use session::Session;
pub use tracks::hindi;
pub use tracks::recommend;
pub use tracks::search;
pub use tracks::track;

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

use std::fmt;

use crate::{types::Track, utils};

pub const DEFAULT_VOLUME: f32 = 0.5;
pub const PLAY_REJECTED_MESSAGE: &str = "Unable to play this track. Try another.";
pub const UNPLAYABLE_MESSAGE: &str = "Unable to play this track.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerPhase {
    Idle,
    Loading,
    Playing,
    Paused,
    Errored,
}

impl fmt::Display for PlayerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlayerPhase::Idle => "idle",
            PlayerPhase::Loading => "loading",
            PlayerPhase::Playing => "playing",
            PlayerPhase::Paused => "paused",
            PlayerPhase::Errored => "error",
        };
        f.write_str(label)
    }
}

/// What the rest of the application sees of the player.
///
/// `position` and `duration` are presentation only; `message` is the inline
/// text shown next to the player after a terminal failure.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackView {
    pub current_track: Option<Track>,
    pub is_playing: bool,
    pub volume: f32,
    pub phase: PlayerPhase,
    pub source: Option<String>,
    pub position: f64,
    pub duration: f64,
    pub message: Option<String>,
}

impl Default for PlaybackView {
    fn default() -> Self {
        Self {
            current_track: None,
            is_playing: false,
            volume: DEFAULT_VOLUME,
            phase: PlayerPhase::Idle,
            source: None,
            position: 0.0,
            duration: 0.0,
            message: None,
        }
    }
}

impl PlaybackView {
    /// `is_playing` implies a current track.
    pub fn is_consistent(&self) -> bool {
        !self.is_playing || self.current_track.is_some()
    }

    /// One-line rendering of the player for a terminal status line.
    ///
    /// # Returns
    ///
    /// Track, phase, `m:ss / m:ss` position and volume, followed by the
    /// inline message when there is one, e.g.
    /// `Lose Yourself - Eminem | playing 0:12 / 0:30 | vol 50%`.
    pub fn status_line(&self) -> String {
        let title = match &self.current_track {
            Some(track) => format!("{} - {}", track.title, track.artist.name),
            None => "nothing selected".to_string(),
        };

        let mut line = format!(
            "{} | {} {} / {} | vol {:.0}%",
            title,
            self.phase,
            utils::format_time(self.position),
            utils::format_time(self.duration),
            self.volume * 100.0
        );
        if let Some(message) = &self.message {
            line.push_str(" | ");
            line.push_str(message);
        }
        line
    }
}

/// Transitions any component may request from the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    /// Make `Track` current and start it as soon as it is loaded.
    Select(Track),
    /// Make `Track` current without starting it.
    Cue(Track),
    Play,
    Pause,
    SetVolume(f32),
    Seek(f64),
    Clear,
}

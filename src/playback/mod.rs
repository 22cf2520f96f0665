//! Preview playback.
//!
//! [`FallbackCatalog`] turns a track into a playable URL, [`MediaDevice`] is
//! the seam to whatever produces sound, and [`PlaybackCoordinator`] keeps the
//! two consistent with the shared [`PlaybackView`]. [`RodioDevice`] is the
//! device that plays through the speakers.
//!
//! ## Flow
//!
//! ```text
//! PlayerHandle ──PlayerCommand──► PlaybackCoordinator ──load/play/pause──► MediaDevice
//!      ▲                              │        ▲                               │
//!      └──── watch<PlaybackView> ─────┘        └────── MediaEvent + ticket ────┘
//! ```
//!
//! Every load gets a fresh [`LoadTicket`]. Events carrying an older ticket
//! are dropped, so a slow download of a track the user already skipped can
//! neither start playing nor overwrite the view.
//!
//! ## Failure handling
//!
//! - No URL at all: the view is `Errored` with "This track has no preview
//!   available".
//! - First media error: one retry with a second-chance URL from the catalog,
//!   unless that URL is the one that just failed.
//! - Second media error: [`UNPLAYABLE_MESSAGE`].
//! - Device refuses to play: [`PLAY_REJECTED_MESSAGE`], no retry.

mod catalog;
mod coordinator;
mod device;
mod output;
mod state;

pub use catalog::CatalogError;
pub use catalog::FallbackCatalog;
pub use catalog::ResolveError;
pub use catalog::ResolvedSource;
pub use catalog::SourceKind;
pub use coordinator::PlaybackCoordinator;
pub use coordinator::PlayerHandle;
pub use device::DeviceError;
pub use device::LoadTicket;
pub use device::MediaDevice;
pub use device::MediaEvent;
pub use output::AudioOutput;
pub use output::RodioDevice;
pub use state::DEFAULT_VOLUME;
pub use state::PLAY_REJECTED_MESSAGE;
pub use state::PlaybackView;
pub use state::PlayerCommand;
pub use state::PlayerPhase;
pub use state::UNPLAYABLE_MESSAGE;

use std::sync::Arc;

use rand::{SeedableRng, rngs::StdRng};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use super::{
    catalog::FallbackCatalog,
    device::{LoadTicket, MediaDevice, MediaEvent},
    state::{PLAY_REJECTED_MESSAGE, PlaybackView, PlayerCommand, PlayerPhase, UNPLAYABLE_MESSAGE},
};
use crate::types::Track;

/// Sole writer of the playback state and of the media device.
///
/// Transport requests arrive as [`PlayerCommand`]s, device notifications as
/// [`MediaEvent`]s. Every load is tagged with a [`LoadTicket`]; events for
/// any other ticket are dropped, so a late callback from a previous track
/// never touches the current one.
pub struct PlaybackCoordinator<D> {
    device: D,
    catalog: Arc<FallbackCatalog>,
    rng: StdRng,
    view: PlaybackView,
    generation: u64,
    ticket: Option<LoadTicket>,
    retried: bool,
    publisher: watch::Sender<PlaybackView>,
}

impl<D: MediaDevice> PlaybackCoordinator<D> {
    /// Creates an idle coordinator that owns `device`.
    ///
    /// The device volume is set to [`DEFAULT_VOLUME`](super::DEFAULT_VOLUME)
    /// right away so the view and the output agree from the start.
    pub fn new(device: D, catalog: Arc<FallbackCatalog>) -> Self {
        Self::with_rng(device, catalog, StdRng::from_os_rng())
    }

    /// Same as [`PlaybackCoordinator::new`] with a caller-provided random
    /// source for the generic fallback pick. Tests seed it.
    pub fn with_rng(mut device: D, catalog: Arc<FallbackCatalog>, rng: StdRng) -> Self {
        let view = PlaybackView::default();
        device.set_volume(view.volume);
        let (publisher, _) = watch::channel(view.clone());

        Self {
            device,
            catalog,
            rng,
            view,
            generation: 0,
            ticket: None,
            retried: false,
            publisher,
        }
    }

    pub fn view(&self) -> &PlaybackView {
        &self.view
    }

    /// A receiver that sees every published [`PlaybackView`].
    pub fn subscribe(&self) -> watch::Receiver<PlaybackView> {
        self.publisher.subscribe()
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn current_ticket(&self) -> Option<&LoadTicket> {
        self.ticket.as_ref()
    }

    /// Applies one transport request and publishes the resulting view.
    ///
    /// `Select` and `Cue` resolve a source through the fallback catalog and
    /// start a new load with a fresh ticket. A track without any source ends
    /// in [`PlayerPhase::Errored`] with the resolver's message. `Play` during
    /// a load only records the intent; `Seek` without an attached source is
    /// ignored.
    ///
    /// # Arguments
    ///
    /// * `command` - The requested transition.
    pub fn apply(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::Select(track) => self.select(track, true),
            PlayerCommand::Cue(track) => self.select(track, false),
            PlayerCommand::Play => self.play(),
            PlayerCommand::Pause => self.pause(),
            PlayerCommand::SetVolume(volume) => self.set_volume(volume),
            PlayerCommand::Seek(position) => self.seek(position),
            PlayerCommand::Clear => self.clear(),
        }
        self.publish();
    }

    /// Feeds one device notification into the state machine.
    ///
    /// Events whose ticket is not the current one are dropped without any
    /// state change. A first `Error` may switch to a second-chance source;
    /// any further error for the same track is terminal and sets
    /// [`UNPLAYABLE_MESSAGE`](super::UNPLAYABLE_MESSAGE).
    ///
    /// # Arguments
    ///
    /// * `event` - Notification from the [`MediaDevice`], tagged with the
    ///   ticket of the load it belongs to.
    pub fn handle_event(&mut self, event: MediaEvent) {
        if self.ticket.as_ref() != Some(event.ticket()) {
            debug!(
                generation = event.ticket().generation,
                track = %event.ticket().track_id,
                "dropping event from superseded load"
            );
            return;
        }

        match event {
            MediaEvent::Loaded(_) => self.on_loaded(),
            MediaEvent::TimeUpdate {
                position, duration, ..
            } => {
                self.view.position = if position.is_finite() { position } else { 0.0 };
                self.view.duration = if duration.is_finite() { duration } else { 0.0 };
            }
            MediaEvent::Ended(_) => {
                self.view.is_playing = false;
                self.view.phase = PlayerPhase::Paused;
                self.view.position = 0.0;
                self.device.seek(0.0);
            }
            MediaEvent::Error { message, .. } => self.recover(&message),
        }
        self.publish();
    }

    fn select(&mut self, track: Track, autoplay: bool) {
        self.retried = false;
        self.view.message = None;
        self.view.position = 0.0;
        self.view.duration = 0.0;
        self.view.is_playing = autoplay;
        self.view.source = None;

        let resolved = self.catalog.resolve(&track, &mut self.rng);
        let track_id = track.id.clone();
        self.view.current_track = Some(track);

        match resolved {
            Ok(source) => {
                info!(track = %track_id, kind = %source.kind, url = %source.url, "loading track");
                self.attach(source.url);
            }
            Err(e) => {
                warn!(track = %track_id, "no playable source");
                self.fail(&e.to_string());
            }
        }
    }

    fn attach(&mut self, url: String) {
        let Some(track) = &self.view.current_track else {
            return;
        };

        self.generation += 1;
        let ticket = LoadTicket {
            generation: self.generation,
            track_id: track.id.clone(),
        };

        self.view.phase = PlayerPhase::Loading;
        self.device.load(&url, ticket.clone());
        self.view.source = Some(url);
        self.ticket = Some(ticket);
    }

    fn on_loaded(&mut self) {
        if self.view.phase != PlayerPhase::Loading {
            return;
        }

        if self.view.is_playing {
            self.start();
        } else {
            self.view.phase = PlayerPhase::Paused;
        }
    }

    fn start(&mut self) {
        match self.device.play() {
            Ok(()) => self.view.phase = PlayerPhase::Playing,
            Err(e) => {
                warn!(error = %e, "playback start rejected");
                self.fail(PLAY_REJECTED_MESSAGE);
            }
        }
    }

    // Two strikes: the first error may swap in one second-chance source,
    // any further error for the same load is terminal.
    fn recover(&mut self, message: &str) {
        warn!(error = %message, retried = self.retried, "media error");

        if !self.retried {
            let preview = self
                .view
                .current_track
                .as_ref()
                .and_then(|t| t.preview_url())
                .map(str::to_string);

            if let Some(url) = self.catalog.second_chance(preview.as_deref(), &mut self.rng) {
                if self.view.source.as_deref() != Some(url.as_str()) {
                    info!(url = %url, "retrying with second-chance source");
                    self.retried = true;
                    self.attach(url);
                    return;
                }
            }
        }

        self.fail(UNPLAYABLE_MESSAGE);
    }

    fn fail(&mut self, message: &str) {
        self.ticket = None;
        self.view.phase = PlayerPhase::Errored;
        self.view.is_playing = false;
        self.view.message = Some(message.to_string());
        self.device.pause();
    }

    fn play(&mut self) {
        if self.view.current_track.is_none() {
            return;
        }

        match self.view.phase {
            PlayerPhase::Loading => self.view.is_playing = true,
            PlayerPhase::Paused => {
                self.view.is_playing = true;
                self.start();
            }
            PlayerPhase::Playing | PlayerPhase::Idle | PlayerPhase::Errored => {}
        }
    }

    fn pause(&mut self) {
        self.view.is_playing = false;
        if self.view.phase == PlayerPhase::Playing {
            self.device.pause();
            self.view.phase = PlayerPhase::Paused;
        }
    }

    fn set_volume(&mut self, volume: f32) {
        if volume.is_nan() {
            warn!("ignoring NaN volume");
            return;
        }

        let volume = volume.clamp(0.0, 1.0);
        self.device.set_volume(volume);
        self.view.volume = volume;
    }

    fn seek(&mut self, position: f64) {
        if self.ticket.is_none() {
            return;
        }

        self.device.seek(position);
        if position.is_finite() {
            self.view.position = position;
        }
    }

    fn clear(&mut self) {
        self.generation += 1;
        self.ticket = None;
        self.retried = false;
        self.device.pause();
        self.view = PlaybackView {
            volume: self.view.volume,
            ..PlaybackView::default()
        };
    }

    fn publish(&self) {
        debug_assert!(self.view.is_consistent(), "playing without a current track");
        self.publisher.send_replace(self.view.clone());
    }
}

impl<D: MediaDevice + Send + 'static> PlaybackCoordinator<D> {
    /// Drives the coordinator until both channels are closed.
    ///
    /// # Arguments
    ///
    /// * `commands` - Requests from [`PlayerHandle`]s.
    /// * `events` - Notifications from the device owned by this coordinator.
    pub async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<PlayerCommand>,
        mut events: mpsc::UnboundedReceiver<MediaEvent>,
    ) {
        loop {
            tokio::select! {
                Some(command) = commands.recv() => self.apply(command),
                Some(event) = events.recv() => self.handle_event(event),
                else => break,
            }
        }
    }

    /// Moves the coordinator onto its own task.
    ///
    /// # Returns
    ///
    /// A [`PlayerHandle`] for sending commands and watching the view, plus
    /// the task running the loop. The task ends once every handle is dropped
    /// and the device stops sending events.
    pub fn spawn(
        self,
        events: mpsc::UnboundedReceiver<MediaEvent>,
    ) -> (PlayerHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = PlayerHandle {
            commands: tx,
            view: self.subscribe(),
        };
        let task = tokio::spawn(self.run(rx, events));
        (handle, task)
    }
}

/// Request side of a spawned coordinator.
#[derive(Clone)]
pub struct PlayerHandle {
    commands: mpsc::UnboundedSender<PlayerCommand>,
    view: watch::Receiver<PlaybackView>,
}

impl PlayerHandle {
    /// Returns `false` once the coordinator has stopped.
    pub fn send(&self, command: PlayerCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    pub fn select(&self, track: Track) -> bool {
        self.send(PlayerCommand::Select(track))
    }

    pub fn play(&self) -> bool {
        self.send(PlayerCommand::Play)
    }

    pub fn pause(&self) -> bool {
        self.send(PlayerCommand::Pause)
    }

    pub fn set_volume(&self, volume: f32) -> bool {
        self.send(PlayerCommand::SetVolume(volume))
    }

    pub fn seek(&self, position: f64) -> bool {
        self.send(PlayerCommand::Seek(position))
    }

    pub fn view(&self) -> PlaybackView {
        self.view.borrow().clone()
    }

    /// Waits for the next published view.
    pub async fn changed(&mut self) -> Option<PlaybackView> {
        self.view.changed().await.ok()?;
        Some(self.view.borrow_and_update().clone())
    }
}

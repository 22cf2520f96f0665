//! Speaker output through rodio.
//!
//! Previews are short, so each one is downloaded completely and decoded from
//! memory. The downloaded bytes stay attached, which lets a finished preview be
//! played again from the start without a second download.

use std::{
    io::Cursor,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    thread,
    time::Duration,
};

use reqwest::Client;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source, decoder::DecoderError};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, warn};

use super::device::{DeviceError, LoadTicket, MediaDevice, MediaEvent};

const PROGRESS_INTERVAL: Duration = Duration::from_millis(250);

type PreviewDecoder = Decoder<Cursor<Arc<[u8]>>>;

/// The system's default audio output.
///
/// Holds the rodio stream open. The stream must outlive every
/// [`RodioDevice`] created from it and stays on the thread that opened it.
pub struct AudioOutput {
    stream: OutputStream,
}

impl AudioOutput {
    pub fn open_default() -> Result<Self, DeviceError> {
        let mut stream =
            OutputStreamBuilder::open_default_stream().map_err(|e| DeviceError(e.to_string()))?;
        stream.log_on_drop(false);
        Ok(Self { stream })
    }

    /// Creates a device playing into this output.
    ///
    /// # Arguments
    ///
    /// * `events` - Where the device reports `Loaded`, `TimeUpdate`, `Ended`
    ///   and `Error`, each tagged with the ticket of its load.
    pub fn device(&self, events: mpsc::UnboundedSender<MediaEvent>) -> RodioDevice {
        RodioDevice::new(Sink::connect_new(self.stream.mixer()), events)
    }
}

struct Attached {
    ticket: LoadTicket,
    data: Arc<[u8]>,
    duration: f64,
    ended: bool,
}

/// [`MediaDevice`] backed by a rodio [`Sink`].
///
/// `load` downloads the whole preview, decodes it off the async runtime and
/// appends it to the paused sink. A monitor thread reports the position of
/// the playing source and its end.
pub struct RodioDevice {
    sink: Arc<Sink>,
    http: Client,
    events: mpsc::UnboundedSender<MediaEvent>,
    attached: Arc<Mutex<Option<Attached>>>,
    latest: Arc<AtomicU64>,
    loading: Option<JoinHandle<()>>,
    stopped: Arc<AtomicBool>,
}

impl RodioDevice {
    /// Wraps an existing sink. `AudioOutput::device` is the usual way in;
    /// a sink from [`Sink::new`] works without any audio hardware.
    pub fn new(sink: Sink, events: mpsc::UnboundedSender<MediaEvent>) -> Self {
        sink.pause();
        let device = Self {
            sink: Arc::new(sink),
            http: Client::new(),
            events,
            attached: Arc::new(Mutex::new(None)),
            latest: Arc::new(AtomicU64::new(0)),
            loading: None,
            stopped: Arc::new(AtomicBool::new(false)),
        };
        device.monitor();
        device
    }

    fn monitor(&self) {
        let sink = Arc::clone(&self.sink);
        let attached = Arc::clone(&self.attached);
        let events = self.events.clone();
        let stopped = Arc::clone(&self.stopped);

        thread::spawn(move || {
            while !stopped.load(Ordering::Relaxed) && !events.is_closed() {
                thread::sleep(PROGRESS_INTERVAL);

                let mut guard = lock(&attached);
                let Some(current) = guard.as_mut() else {
                    continue;
                };
                if sink.is_paused() || current.ended {
                    continue;
                }

                let event = if sink.empty() {
                    current.ended = true;
                    MediaEvent::Ended(current.ticket.clone())
                } else {
                    MediaEvent::TimeUpdate {
                        ticket: current.ticket.clone(),
                        position: sink.get_pos().as_secs_f64(),
                        duration: current.duration,
                    }
                };
                let _ = events.send(event);
            }
        });
    }
}

impl MediaDevice for RodioDevice {
    fn load(&mut self, src: &str, ticket: LoadTicket) {
        if let Some(task) = self.loading.take() {
            task.abort();
        }

        {
            let mut guard = lock(&self.attached);
            self.latest.store(ticket.generation, Ordering::SeqCst);
            *guard = None;
            self.sink.clear();
        }

        let sink = Arc::clone(&self.sink);
        let http = self.http.clone();
        let events = self.events.clone();
        let attached = Arc::clone(&self.attached);
        let latest = Arc::clone(&self.latest);
        let src = src.to_string();

        self.loading = Some(tokio::spawn(async move {
            let fail = |message: String| {
                warn!(url = %src, error = %message, "preview load failed");
                let _ = events.send(MediaEvent::Error {
                    ticket: ticket.clone(),
                    message,
                });
            };

            let data = match fetch(&http, &src).await {
                Ok(data) => data,
                Err(e) => return fail(e.to_string()),
            };

            let decoded = tokio::task::spawn_blocking({
                let data = Arc::clone(&data);
                move || decode(data)
            })
            .await;
            let decoder = match decoded {
                Ok(Ok(decoder)) => decoder,
                Ok(Err(e)) => return fail(e.to_string()),
                Err(e) => return fail(e.to_string()),
            };

            let duration = decoder
                .total_duration()
                .map(|d| d.as_secs_f64())
                .unwrap_or(0.0);

            {
                let mut guard = lock(&attached);
                if latest.load(Ordering::SeqCst) != ticket.generation {
                    debug!(generation = ticket.generation, "discarding superseded preview");
                    return;
                }
                sink.append(decoder);
                *guard = Some(Attached {
                    ticket: ticket.clone(),
                    data,
                    duration,
                    ended: false,
                });
            }

            let _ = events.send(MediaEvent::Loaded(ticket.clone()));
            let _ = events.send(MediaEvent::TimeUpdate {
                ticket,
                position: 0.0,
                duration,
            });
        }));
    }

    fn play(&mut self) -> Result<(), DeviceError> {
        let mut guard = lock(&self.attached);
        let Some(current) = guard.as_mut() else {
            return Err(DeviceError("no source attached".to_string()));
        };

        // A finished source is gone from the sink; decode it again.
        if self.sink.empty() {
            let decoder =
                decode(Arc::clone(&current.data)).map_err(|e| DeviceError(e.to_string()))?;
            self.sink.append(decoder);
            current.ended = false;
        }

        self.sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn seek(&mut self, position: f64) {
        if !position.is_finite() || self.sink.empty() {
            return;
        }
        if let Err(e) = self.sink.try_seek(Duration::from_secs_f64(position.max(0.0))) {
            debug!(error = %e, position, "seek failed");
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume);
    }
}

impl Drop for RodioDevice {
    fn drop(&mut self) {
        self.stopped.store(true, Ordering::Relaxed);
        if let Some(task) = self.loading.take() {
            task.abort();
        }
        self.sink.stop();
    }
}

async fn fetch(http: &Client, src: &str) -> Result<Arc<[u8]>, reqwest::Error> {
    let bytes = http
        .get(src)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    Ok(Arc::from(&bytes[..]))
}

fn decode(data: Arc<[u8]>) -> Result<PreviewDecoder, DecoderError> {
    Decoder::new(Cursor::new(data))
}

fn lock(attached: &Mutex<Option<Attached>>) -> MutexGuard<'_, Option<Attached>> {
    attached.lock().unwrap_or_else(PoisonError::into_inner)
}

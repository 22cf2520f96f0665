use std::fmt;

/// Identity of one load attempt.
///
/// Every source attached to the device gets a fresh generation. Events that
/// carry anything but the current ticket belong to a superseded load.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    pub generation: u64,
    pub track_id: String,
}

/// Notifications emitted by a media device.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    Loaded(LoadTicket),
    TimeUpdate {
        ticket: LoadTicket,
        position: f64,
        duration: f64,
    },
    Ended(LoadTicket),
    Error {
        ticket: LoadTicket,
        message: String,
    },
}

impl MediaEvent {
    pub fn ticket(&self) -> &LoadTicket {
        match self {
            MediaEvent::Loaded(ticket) | MediaEvent::Ended(ticket) => ticket,
            MediaEvent::TimeUpdate { ticket, .. } | MediaEvent::Error { ticket, .. } => ticket,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceError(pub String);

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "media device error: {}", self.0)
    }
}

impl std::error::Error for DeviceError {}

/// The single audio output.
///
/// `load` replaces the attached source and returns immediately; the device
/// later reports `Loaded` or `Error` with the given ticket. `volume` is
/// always within `[0, 1]` when it reaches the device.
pub trait MediaDevice {
    /// Detaches the current source and starts loading `src`. Events of the
    /// new load carry `ticket`.
    fn load(&mut self, src: &str, ticket: LoadTicket);

    /// Starts or resumes output. An `Err` means the device refused to play
    /// the attached source at all.
    fn play(&mut self) -> Result<(), DeviceError>;

    fn pause(&mut self);

    /// Moves to `position` seconds. Non-finite values are ignored.
    fn seek(&mut self, position: f64);

    fn set_volume(&mut self, volume: f32);
}

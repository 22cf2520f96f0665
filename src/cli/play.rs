use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};

use crate::{
    error, info,
    playback::{AudioOutput, PlaybackCoordinator, PlayerCommand, PlayerPhase},
    spotify::{samples, tracks},
    types::Track,
    utils, warning,
};

use super::{Session, spinner};

const SEEK_STEP: f64 = 10.0;
const VOLUME_STEP: f32 = 0.1;

/// Plays previews for a search query or a single track id.
///
/// The matching tracks form a small queue. Transport requests go through a
/// `PlayerHandle`, so the coordinator stays the only writer of the player
/// state; the status line is redrawn from every published view. Controls are
/// read line by line from stdin.
///
/// # Arguments
///
/// * `target` - Search text, a Spotify track id or a bundled sample id
/// * `volume` - Initial volume in `[0, 1]`; out of range values are clamped
pub async fn play(target: String, volume: Option<f32>) {
    let target = target.trim();
    if target.is_empty() {
        error!("Nothing to play, pass a search query or a track id.");
    }

    let session = Session::open().await;
    let pb = spinner(&format!("Looking up \"{target}\"..."));
    let queue = find_tracks(&session, target).await;
    pb.finish_and_clear();

    if queue.is_empty() {
        error!("No tracks found for \"{}\".", target);
    }

    let output = match AudioOutput::open_default() {
        Ok(output) => output,
        Err(e) => error!("Cannot open the audio output. Err: {}", e),
    };

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let coordinator =
        PlaybackCoordinator::new(output.device(events_tx), Arc::new(session.catalog.clone()));
    let (mut handle, task) = coordinator.spawn(events_rx);

    if let Some(volume) = volume {
        handle.set_volume(volume);
    }

    let mut index = 0;
    handle.select(queue[index].clone());

    info!("Controls: [p]lay/pause, [n]ext, [+]/[-] volume, [f]orward/[b]ack, [q]uit, then Enter");
    let status = status_bar();
    let mut view = handle.view();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            changed = handle.changed() => {
                let Some(next) = changed else { break };
                view = next;
                status.set_message(format!(
                    "[{}/{}] {}",
                    index + 1,
                    queue.len(),
                    view.status_line()
                ));
            }
            line = lines.next_line() => {
                let Ok(Some(line)) = line else { break };
                match line.trim() {
                    "p" | "" => {
                        if view.is_playing {
                            handle.pause();
                        } else {
                            handle.play();
                        }
                    }
                    "n" => {
                        index = (index + 1) % queue.len();
                        handle.select(queue[index].clone());
                    }
                    "+" => {
                        handle.set_volume(view.volume + VOLUME_STEP);
                    }
                    "-" => {
                        handle.set_volume(view.volume - VOLUME_STEP);
                    }
                    "f" => {
                        handle.seek(view.position + SEEK_STEP);
                    }
                    "b" => {
                        handle.seek((view.position - SEEK_STEP).max(0.0));
                    }
                    "q" => break,
                    other => status.println(format!("Unknown control '{other}'")),
                }
            }
        }
    }

    handle.send(PlayerCommand::Clear);
    status.finish_and_clear();
    if view.phase == PlayerPhase::Errored {
        if let Some(message) = &view.message {
            warning!("{}", message);
        }
    }

    task.abort();
    drop(output);
}

async fn find_tracks(session: &Session, target: &str) -> Vec<Track> {
    let bundled = samples::sample_tracks()
        .into_iter()
        .chain(samples::hindi_sample_tracks())
        .find(|t| t.id == target);
    if let Some(track) = bundled {
        return vec![track];
    }

    if utils::is_spotify_id(target) && session.tokens.is_linked().await {
        match tracks::get_track(&session.spotify, target).await {
            Ok(track) => return vec![track],
            Err(e) => warning!("Track lookup failed, searching instead. Err: {}", e),
        }
    }

    let mut found = session.discovery.search_songs(target, 10).await;
    utils::remove_duplicate_tracks(&mut found);
    found
}

fn status_bar() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(250));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("♪♫♬♩ "),
    );
    pb
}

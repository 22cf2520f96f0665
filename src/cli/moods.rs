use tabled::Table;

use crate::{moods, types::MoodTableRow};

use super::{Session, spinner};

pub async fn list_moods() {
    let session = Session::open().await;

    let pb = spinner("Fetching moods...");
    let names = session.discovery.moods().await;
    pb.finish_and_clear();

    let rows: Vec<MoodTableRow> = names
        .into_iter()
        .map(|mood| MoodTableRow {
            genres: moods::mood_genres(&mood).join(", "),
            mood,
        })
        .collect();

    let table = Table::new(rows);
    println!("{}", table);
}

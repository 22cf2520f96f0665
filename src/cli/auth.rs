use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{error, info, success, utils, warning};

use super::Session;

/// Links a Spotify account.
///
/// Opens the authorization page, then waits for the dashboard URL the bridge
/// redirected to. Its fragment carries the token grant and is consumed once.
pub async fn link() {
    let session = Session::open().await;

    let Some(url) = session.discovery.login_url().await else {
        error!(
            "Auth bridge at {} did not return a login URL. Is `moodtune serve` running?",
            session.settings.api_url
        );
    };

    if webbrowser::open(&url).is_err() {
        warning!("Could not open a browser.");
    }
    info!("Authorize in the browser or open this URL:\n{}", url);
    info!("Paste the dashboard URL you were redirected to:");

    let mut line = String::new();
    let mut stdin = BufReader::new(tokio::io::stdin());
    if let Err(e) = stdin.read_line(&mut line).await {
        error!("Failed to read the redirect URL. Err: {}", e);
    }

    if let Some(reason) = line
        .split_once("error=")
        .map(|(_, rest)| rest.split(['&', '#']).next().unwrap_or_default().trim())
    {
        error!("Spotify authorization failed: {}", reason);
    }

    let mut fragment = utils::fragment_of(line.trim()).unwrap_or_default().to_string();
    match session.tokens.accept_fragment(&mut fragment).await {
        Ok(true) => success!("Spotify account linked."),
        Ok(false) => error!("The URL carries no access token."),
        Err(e) => error!("Failed to persist tokens. Err: {}", e),
    }
}

pub async fn logout() {
    let session = Session::open().await;
    if !session.tokens.is_linked().await {
        info!("No Spotify account linked.");
        return;
    }

    match session.tokens.logout().await {
        Ok(()) => success!("Spotify account unlinked."),
        Err(e) => error!("Failed to clear stored tokens. Err: {}", e),
    }
}

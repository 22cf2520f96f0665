use crate::{config::BridgeSettings, error, server, success};

pub async fn serve() {
    let settings = match BridgeSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => error!("Cannot configure the auth bridge. Err: {}", e),
    };

    success!("Auth bridge starting on {}", settings.server_address);
    if let Err(e) = server::start_api_server(settings).await {
        error!("Auth bridge stopped. Err: {}", e);
    }
}

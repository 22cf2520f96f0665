use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Redirect};
use tracing::{info, warn};

use super::BridgeState;
use crate::{spotify, utils};

/// Completes the authorization code flow.
///
/// On success the browser is sent to `<client>/dashboard` with the tokens in
/// the fragment, which never reaches any server. Failures redirect to the
/// client root with an `error` query parameter.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<Arc<BridgeState>>,
) -> Redirect {
    let client_url = state.settings.client_app_url.trim_end_matches('/');

    if let Some(denied) = params.get("error") {
        warn!(error = %denied, "authorization denied");
        return Redirect::to(&format!(
            "{client_url}/?error={}",
            urlencoding::encode(denied)
        ));
    }

    let Some(code) = params.get("code").filter(|c| !c.is_empty()) else {
        return Redirect::to(&format!("{client_url}/?error=missing_code"));
    };

    match spotify::auth::exchange_code(&state.http, &state.settings, code).await {
        Ok(grant) => {
            info!("authorization code exchanged");
            Redirect::to(&format!(
                "{client_url}/dashboard#{}",
                utils::encode_token_fragment(&grant)
            ))
        }
        Err(e) => {
            warn!(error = %e, "token exchange failed");
            Redirect::to(&format!(
                "{client_url}/?error={}",
                urlencoding::encode(&e.to_string())
            ))
        }
    }
}

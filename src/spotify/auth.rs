use reqwest::{Client, Url, header::AUTHORIZATION};

use super::{ApiError, ensure_success};
use crate::{
    config::BridgeSettings,
    types::{SpotifyTokenResponse, TokenGrant},
    utils,
};

/// Builds the Spotify authorization URL the user is sent to.
///
/// Uses the authorization code flow: the code comes back to the bridge's
/// callback and is exchanged there with the client secret.
///
/// # Arguments
///
/// * `settings` - Bridge settings providing the authorize endpoint, client
///   id, requested scope and the callback URL registered with Spotify
///
/// # Returns
///
/// The full URL with `response_type=code`, `client_id`, `scope` and
/// `redirect_uri` as query parameters, or [`ApiError::InvalidUrl`] when the
/// configured authorize endpoint is not a valid URL.
///
/// # Example
///
/// ```
/// let url = authorize_url(&settings)?;
/// // https://accounts.spotify.com/authorize?response_type=code&client_id=...
/// ```
pub fn authorize_url(settings: &BridgeSettings) -> Result<String, ApiError> {
    let url = Url::parse_with_params(
        &settings.spotify_auth_url,
        &[
            ("response_type", "code"),
            ("client_id", settings.client_id.as_str()),
            ("scope", settings.scope.as_str()),
            ("redirect_uri", settings.redirect_uri.as_str()),
        ],
    )
    .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
    Ok(url.to_string())
}

/// Exchanges an authorization code for a token grant.
///
/// # Arguments
///
/// * `client` - HTTP client used for the token request
/// * `settings` - Client credentials, token endpoint and the redirect URI;
///   Spotify requires the same redirect URI that was used to authorize
/// * `code` - The `code` query parameter of the callback
///
/// # Returns
///
/// - `Ok(TokenGrant)` - Access token, refresh token and lifetime
/// - `Err(ApiError::Status)` - Spotify rejected the code (expired, reused)
///   or the client credentials
/// - `Err(ApiError::Http)` - Network or decoding failure
pub async fn exchange_code(
    client: &Client,
    settings: &BridgeSettings,
    code: &str,
) -> Result<TokenGrant, ApiError> {
    request_token(
        client,
        settings,
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", settings.redirect_uri.as_str()),
        ],
    )
    .await
}

/// Exchanges a refresh token for a new grant.
///
/// Spotify may or may not rotate the refresh token; the grant only carries
/// one when it did.
///
/// # Arguments
///
/// * `client` - HTTP client used for the token request
/// * `settings` - Client credentials and token endpoint
/// * `refresh_token` - The refresh token sent by the terminal client
pub async fn refresh_grant(
    client: &Client,
    settings: &BridgeSettings,
    refresh_token: &str,
) -> Result<TokenGrant, ApiError> {
    request_token(
        client,
        settings,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ],
    )
    .await
}

// Client credentials travel as HTTP Basic auth, never in the form body.
async fn request_token(
    client: &Client,
    settings: &BridgeSettings,
    form: &[(&str, &str)],
) -> Result<TokenGrant, ApiError> {
    let res = client
        .post(&settings.spotify_token_url)
        .header(
            AUTHORIZATION,
            utils::basic_auth_header(&settings.client_id, &settings.client_secret),
        )
        .form(form)
        .send()
        .await?;

    let token: SpotifyTokenResponse = ensure_success(res).await?.json().await?;
    Ok(token.into())
}

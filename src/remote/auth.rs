//! Access token acquisition.
//!
//! Two modes: the OAuth2 client-credentials grant against the tenant's token
//! endpoint, or a token acquired out of band and passed through verbatim.

use crate::config::{AuthMethod, PlatformSettings};
use crate::errors::{ConnRefError, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
}

/// `{authority_host}/{tenant}/oauth2/v2.0/token`
pub fn token_url(settings: &PlatformSettings) -> String {
    format!(
        "{}/{}/oauth2/v2.0/token",
        settings.authority_host.trim_end_matches('/'),
        settings.tenant_id.trim()
    )
}

/// `{dataverse_url}/.default`
pub fn scope(settings: &PlatformSettings) -> String {
    format!("{}/.default", settings.dataverse_url.trim_end_matches('/'))
}

/// Interpret a token endpoint reply.
pub fn parse_token_response(status: u16, body: &str) -> Result<String> {
    if !(200..300).contains(&status) {
        let error = serde_json::from_str::<TokenErrorResponse>(body).unwrap_or(TokenErrorResponse {
            error: "unknown_error".to_string(),
            error_description: Some(body.to_string()),
        });
        return Err(ConnRefError::Auth(format!(
            "token endpoint returned {status}: {}: {}",
            error.error,
            error.error_description.unwrap_or_default()
        )));
    }

    let token: TokenResponse = serde_json::from_str(body)
        .map_err(|e| ConnRefError::Auth(format!("unexpected token response: {e}")))?;
    if token.access_token.is_empty() {
        return Err(ConnRefError::Auth(
            "token endpoint returned an empty access token".to_string(),
        ));
    }
    debug!(expires_in = ?token.expires_in, "access token acquired");
    Ok(token.access_token)
}

/// Obtain a bearer token for the configured environment.
pub fn acquire_token(settings: &PlatformSettings) -> Result<String> {
    match settings.auth_method {
        AuthMethod::AccessToken => settings
            .access_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ConnRefError::Auth("no access token configured".to_string())),
        AuthMethod::ClientCredentials => client_credentials(settings),
    }
}

fn client_credentials(settings: &PlatformSettings) -> Result<String> {
    let secret = settings
        .client_secret
        .as_deref()
        .ok_or_else(|| ConnRefError::Auth("client secret is not configured".to_string()))?;
    let url = token_url(settings);
    let scope = scope(settings);
    info!(tenant = %settings.tenant_id, client = %settings.client_id, "requesting access token");

    let params = [
        ("grant_type", "client_credentials"),
        ("client_id", settings.client_id.as_str()),
        ("client_secret", secret),
        ("scope", scope.as_str()),
    ];

    let response = Client::new()
        .post(&url)
        .form(&params)
        .send()
        .map_err(|e| ConnRefError::Auth(format!("token request to {url} failed: {e}")))?;
    let status = response.status().as_u16();
    let body = response
        .text()
        .map_err(|e| ConnRefError::Auth(format!("failed to read token response: {e}")))?;

    parse_token_response(status, &body)
}

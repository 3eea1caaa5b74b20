use std::time::Duration;

use reqwest::StatusCode;
use time::OffsetDateTime;
use url::Url;

use crate::error::{Error, TokenErrorResponse};
use crate::token::{InternalToken, Token};
use crate::OAuthConfig;

fn default_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_default()
}

/// The authorization code grant: builds the login url and talks to the token endpoint.
#[derive(Clone, Debug)]
pub struct OAuthFlow {
    config: OAuthConfig,
    http: reqwest::Client,
}

impl OAuthFlow {
    pub fn new(config: OAuthConfig) -> Self {
        Self::with_http_client(config, default_http_client())
    }

    pub fn with_http_client(config: OAuthConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// The url the user signs in at. The provider redirects back to `redirect_uri`
    /// with `code` (and `state`, when given) in the query string.
    pub fn login_url(&self, state: Option<&str>) -> Result<Url, Error> {
        let mut url = Url::parse(&self.config.authorize_url())?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("client_id", &self.config.client_id)
                .append_pair("response_type", "code")
                .append_pair("redirect_uri", &self.config.redirect_uri)
                .append_pair("scope", &self.config.scopes_to_string(" "));
            if let Some(state) = state {
                query.append_pair("state", state);
            }
        }
        Ok(url)
    }

    /// Redeems the authorization code received on the redirect uri.
    pub async fn exchange_code(&self, code: &str) -> Result<Token, Error> {
        let scope = self.config.scopes_to_string(" ");
        let params = token_params(&self.config, Grant::AuthorizationCode(code), &scope);
        let token = self.request_token(&params).await?;
        tracing::debug!("authorization code redeemed: expiry={:?}", token.expiry);
        Ok(token)
    }

    /// Renews the access token. The provider may rotate the refresh token;
    /// when it does not, the one passed in is carried over.
    pub async fn refresh(&self, refresh_token: &str) -> Result<Token, Error> {
        let scope = self.config.scopes_to_string(" ");
        let params = token_params(&self.config, Grant::RefreshToken(refresh_token), &scope);
        let token = self.request_token(&params).await?;
        Ok(carry_refresh_token(token, refresh_token))
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> Result<Token, Error> {
        let response = self.http.post(self.config.token_url()).form(params).send().await?;
        let status = response.status();
        let body = response.text().await?;
        map_token_response(status, &body, OffsetDateTime::now_utc())
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum Grant<'a> {
    AuthorizationCode(&'a str),
    RefreshToken(&'a str),
}

/// The form body posted to the token endpoint.
pub(crate) fn token_params<'a>(config: &'a OAuthConfig, grant: Grant<'a>, scope: &'a str) -> Vec<(&'a str, &'a str)> {
    let mut params = vec![("client_id", config.client_id.as_str())];
    match grant {
        Grant::AuthorizationCode(code) => {
            params.push(("grant_type", "authorization_code"));
            params.push(("code", code));
        }
        Grant::RefreshToken(refresh_token) => {
            params.push(("grant_type", "refresh_token"));
            params.push(("refresh_token", refresh_token));
        }
    }
    params.push(("redirect_uri", config.redirect_uri.as_str()));
    params.push(("scope", scope));
    if let Some(secret) = &config.client_secret {
        params.push(("client_secret", secret.as_str()));
    }
    params
}

pub(crate) fn carry_refresh_token(mut token: Token, previous: &str) -> Token {
    if token.refresh_token.is_none() {
        token.refresh_token = Some(previous.to_string());
    }
    token
}

pub(crate) fn map_token_response(status: StatusCode, body: &str, now: OffsetDateTime) -> Result<Token, Error> {
    if status.is_success() {
        let it = serde_json::from_str::<InternalToken>(body)?;
        return Ok(it.to_token(now));
    }
    Err(match serde_json::from_str::<TokenErrorResponse>(body) {
        Ok(e) => Error::Token(status.as_u16(), e),
        Err(_) => Error::UnexpectedStatus(status.as_u16(), body.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow() -> OAuthFlow {
        OAuthFlow::new(OAuthConfig::new("0000-client", "http://localhost:8080/callback"))
    }

    #[test]
    fn test_login_url() {
        let url = flow().login_url(Some("xyz")).unwrap();
        assert_eq!(url.host_str(), Some("login.microsoftonline.com"));
        assert_eq!(url.path(), "/common/oauth2/v2.0/authorize");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("client_id".to_string(), "0000-client".to_string()),
                ("response_type".to_string(), "code".to_string()),
                ("redirect_uri".to_string(), "http://localhost:8080/callback".to_string()),
                ("scope".to_string(), "offline_access Files.ReadWrite.All".to_string()),
                ("state".to_string(), "xyz".to_string()),
            ]
        );
    }

    #[test]
    fn test_login_url_without_state() {
        let url = flow().login_url(None).unwrap();
        assert!(url.query_pairs().all(|(k, _)| k != "state"));
    }

    #[test]
    fn test_map_token_response_success() {
        let now = OffsetDateTime::now_utc();
        let body = r#"{"token_type":"Bearer","expires_in":3599,"access_token":"at","refresh_token":"rt"}"#;
        let token = map_token_response(StatusCode::OK, body, now).unwrap();
        assert_eq!(token.access_token, "at");
        assert_eq!(token.refresh_token.as_deref(), Some("rt"));
        assert_eq!(token.expiry, Some(now + time::Duration::seconds(3599)));
    }

    #[test]
    fn test_map_token_response_huge_expires_in() {
        let now = OffsetDateTime::now_utc();
        let body = r#"{"access_token":"a","expires_in":9223372036854775807}"#;
        let token = map_token_response(StatusCode::OK, body, now).unwrap();
        assert_eq!(token.access_token, "a");
        assert_eq!(token.expiry, None);
        assert!(token.valid());

        let body = r#"{"access_token":"a","expires_in":-9223372036854775808}"#;
        let token = map_token_response(StatusCode::OK, body, now).unwrap();
        assert_eq!(token.expiry, None);
    }

    #[test]
    fn test_authorization_code_params() {
        let config = flow().config().clone();
        let params = token_params(&config, Grant::AuthorizationCode("M.C507_BAY"), "offline_access Files.ReadWrite.All");
        assert_eq!(
            params,
            vec![
                ("client_id", "0000-client"),
                ("grant_type", "authorization_code"),
                ("code", "M.C507_BAY"),
                ("redirect_uri", "http://localhost:8080/callback"),
                ("scope", "offline_access Files.ReadWrite.All"),
            ]
        );
    }

    #[test]
    fn test_refresh_params_with_client_secret() {
        let config = OAuthConfig::new("0000-client", "http://localhost:8080/callback").with_client_secret("s3cret");
        let params = token_params(&config, Grant::RefreshToken("M.R3_BAY"), "Files.Read");
        assert_eq!(
            params,
            vec![
                ("client_id", "0000-client"),
                ("grant_type", "refresh_token"),
                ("refresh_token", "M.R3_BAY"),
                ("redirect_uri", "http://localhost:8080/callback"),
                ("scope", "Files.Read"),
                ("client_secret", "s3cret"),
            ]
        );
        assert!(params.iter().all(|(k, _)| *k != "code"));
    }

    #[test]
    fn test_refresh_carries_previous_refresh_token() {
        let now = OffsetDateTime::now_utc();
        let omitted = map_token_response(StatusCode::OK, r#"{"access_token":"at","expires_in":3600}"#, now).unwrap();
        let token = carry_refresh_token(omitted, "old");
        assert_eq!(token.refresh_token.as_deref(), Some("old"));

        let rotated = map_token_response(StatusCode::OK, r#"{"access_token":"at","refresh_token":"new"}"#, now).unwrap();
        let token = carry_refresh_token(rotated, "old");
        assert_eq!(token.refresh_token.as_deref(), Some("new"));
    }

    #[test]
    fn test_map_token_response_oauth_error() {
        let body = r#"{"error":"invalid_grant","error_description":"AADSTS70000: code expired","error_codes":[70000]}"#;
        match map_token_response(StatusCode::BAD_REQUEST, body, OffsetDateTime::now_utc()) {
            Err(Error::Token(400, e)) => {
                assert_eq!(e.error, "invalid_grant");
                assert_eq!(e.to_string(), "invalid_grant: AADSTS70000: code expired");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_map_token_response_unknown_error() {
        match map_token_response(StatusCode::BAD_GATEWAY, "<html>", OffsetDateTime::now_utc()) {
            Err(Error::UnexpectedStatus(502, body)) => assert_eq!(body, "<html>"),
            other => panic!("unexpected {other:?}"),
        }
    }
}

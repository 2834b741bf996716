use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;

use crate::auth::{AccessToken, Credentials};
use crate::config::{Region, ACCESS_TOKEN_DEFAULT_TTL};
use crate::error::{Error, Result};
use crate::models::Location;
use crate::types::{LocationRecord, LoginRequest, LoginResponse};

const INVALID_CREDENTIALS: &str = "Invalid Credentials";

#[derive(Debug, Default)]
struct Session {
    user_id: Option<String>,
    access_token: Option<AccessToken>,
}

/// Connection to the Homepass web service.
///
/// Nothing is sent until the first operation that needs the network. Every
/// authenticated request checks the cached token first and logs in again if
/// it is missing or about to expire, so callers never handle tokens
/// themselves.
///
/// The session lock only guards reading and replacing the cached token. It is
/// never held across a request, so two tasks sharing an `Account` that both
/// find the token expired will both log in.
#[derive(Debug)]
pub struct Account {
    client: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    session: Mutex<Session>,
}

impl Account {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self::with_region(Credentials::new(email, password), Region::default())
    }

    pub fn with_region(credentials: Credentials, region: Region) -> Self {
        Self::with_base_url(credentials, region.base_url())
    }

    pub fn with_base_url(credentials: Credentials, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            session: Mutex::new(Session::default()),
        }
    }

    pub fn email(&self) -> &str {
        self.credentials.email()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn user_id(&self) -> Option<String> {
        self.session().user_id.clone()
    }

    pub fn access_token(&self) -> Option<AccessToken> {
        self.session().access_token.clone()
    }

    /// Whether a token is cached and not yet expired
    pub fn is_authenticated(&self) -> bool {
        self.session()
            .access_token
            .as_ref()
            .is_some_and(|token| !token.is_expired())
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn authentication_url(&self) -> String {
        format!("{}/Customers/login", self.base_url)
    }

    /// Log in with the account credentials and cache the issued token.
    ///
    /// Returns `Ok(false)` and drops the cached token when the service answers
    /// with anything other than 200. Transport and parse failures are errors.
    pub async fn authenticate(&self) -> Result<bool> {
        debug!("Authenticating user: {}", self.credentials.email);

        let login_request = LoginRequest {
            email: &self.credentials.email,
            password: &self.credentials.password,
            ttl: ACCESS_TOKEN_DEFAULT_TTL,
        };

        let response = self
            .client
            .post(self.authentication_url())
            .json(&login_request)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("Authentication failed with status: {}", status);
            self.session().access_token = None;
            return Ok(false);
        }

        let response_text = response.text().await?;
        let login_response: LoginResponse = serde_json::from_str(&response_text)?;

        let token = AccessToken::from_expiry(
            login_response.id,
            login_response.user_id.clone(),
            login_response.expire_at,
        );
        debug!(
            "Authentication successful, token valid until {}",
            token.expire_at()
        );

        let mut session = self.session();
        session.user_id = Some(login_response.user_id);
        session.access_token = Some(token);
        Ok(true)
    }

    /// Make sure the user id is known, logging in if it is not
    pub async fn ensure_user_id(&self) -> Result<()> {
        if self.session().user_id.is_some() {
            return Ok(());
        }

        if !self.authenticate().await? {
            return Err(Error::Auth(INVALID_CREDENTIALS.to_string()));
        }
        Ok(())
    }

    pub async fn account_url(&self) -> Result<String> {
        self.ensure_user_id().await?;

        let user_id = self
            .user_id()
            .ok_or_else(|| Error::Auth(INVALID_CREDENTIALS.to_string()))?;
        Ok(format!("{}/Customers/{}", self.base_url, user_id))
    }

    fn get_headers(token: &AccessToken) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        // The service expects the raw token id, without a scheme
        headers.insert(AUTHORIZATION, HeaderValue::from_str(token.id())?);
        Ok(headers)
    }

    /// GET `url` with a valid token, logging in first when needed.
    ///
    /// The response is returned whatever its status.
    pub async fn authenticated_request(&self, url: &str) -> Result<reqwest::Response> {
        let needs_authentication = match &self.session().access_token {
            Some(token) => token.is_expired(),
            None => true,
        };

        if needs_authentication {
            debug!("Access token missing or expired, reauthenticating");
            if !self.authenticate().await? {
                return Err(Error::Auth(INVALID_CREDENTIALS.to_string()));
            }
        }

        let token = self
            .access_token()
            .ok_or_else(|| Error::Auth(INVALID_CREDENTIALS.to_string()))?;
        let headers = Self::get_headers(&token)?;

        debug!("GET {}", url);
        let response = self.client.get(url).headers(headers).send().await?;
        Ok(response)
    }

    /// List the locations registered to this account, in response order
    pub async fn list_locations(&self) -> Result<Vec<Location<'_>>> {
        debug!("Fetching locations list");

        let url = format!("{}/Locations", self.account_url().await?);
        let response = self.authenticated_request(&url).await?;

        let status = response.status();
        let response_text = response.text().await?;
        if !status.is_success() {
            return Err(Error::Api(format!(
                "Failed to fetch locations ({}): {}",
                status, response_text
            )));
        }

        let records: Vec<LocationRecord> = serde_json::from_str(&response_text)?;
        debug!("Found {} locations", records.len());

        Ok(records
            .into_iter()
            .map(|record| Location::new(self, record.id))
            .collect())
    }
}

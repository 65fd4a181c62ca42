//! `reqwest` transport and terminal navigator for the CLI.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::cell::RefCell;
use std::time::Duration;

use kidzevents::access::RESUME_PARAM;
use kidzevents::config::ClientConfig;
use kidzevents::pipeline::{ApiRequest, ApiResponse, Method, Navigator, Transport};
use kidzevents::{Redirect, RedirectTarget, TransportError};

const CONNECT_TIMEOUT_SECS: u64 = 5;

pub struct ReqwestTransport {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns [`TransportError::Build`] if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;
        Ok(Self { http, config })
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Patch => reqwest::Method::PATCH,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn map_reqwest_error(err: &reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_builder() {
        TransportError::Build(err.to_string())
    } else {
        TransportError::Network(err.to_string())
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.config.url(&request.path);
        let mut builder = self.http.request(reqwest_method(request.method), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| map_reqwest_error(&e))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| map_reqwest_error(&e))?;
        Ok(ApiResponse::new(status, body))
    }
}

/// The CLI's "location" is the app route a command stands for. Redirects
/// become a hint on stderr and are remembered so the command can report them.
pub struct TerminalNavigator {
    location: RefCell<String>,
    last_redirect: RefCell<Option<Redirect>>,
}

impl TerminalNavigator {
    pub fn at(location: &str) -> Self {
        Self { location: RefCell::new(location.to_owned()), last_redirect: RefCell::new(None) }
    }

    pub fn last_redirect(&self) -> Option<Redirect> {
        self.last_redirect.borrow().clone()
    }
}

impl Navigator for TerminalNavigator {
    fn current_path(&self) -> String {
        self.location.borrow().clone()
    }

    fn redirect(&self, redirect: &Redirect) {
        eprintln!("{}", redirect_hint(redirect));
        *self.location.borrow_mut() = redirect.location();
        *self.last_redirect.borrow_mut() = Some(redirect.clone());
    }
}

/// What to tell a terminal user when the app would have navigated away.
pub fn redirect_hint(redirect: &Redirect) -> String {
    match (redirect.target, redirect.resume.as_deref()) {
        (RedirectTarget::Login, Some(resume)) => {
            format!("Session expired or missing. Run `kidz login` and retry ({RESUME_PARAM} {resume}).")
        }
        (RedirectTarget::Login, None) => "Session expired or missing. Run `kidz login`.".to_owned(),
        (RedirectTarget::Home, _) => "Your account role cannot use this command.".to_owned(),
    }
}

//! HTTP basic-auth credentials the web app asks the shell to remember, keyed
//! by origin so a credential never leaks to another site.

use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tauri::{AppHandle, Manager};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BasicCredentials {
    username: String,
    password: String,
}

impl BasicCredentials {
    pub(crate) fn new(username: &str, password: &str) -> Result<Self, String> {
        if username.is_empty() {
            return Err("Missing basic-auth username.".to_string());
        }
        if username.contains(':') {
            return Err("Basic-auth username must not contain ':'.".to_string());
        }
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    pub(crate) fn authorization_header(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {token}")
    }
}

pub(crate) fn origin_key(raw_url: &str) -> Result<String, String> {
    let parsed = Url::parse(raw_url.trim()).map_err(|error| format!("Invalid URL: {error}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed.origin().ascii_serialization()),
        scheme => Err(format!(
            "Unsupported URL scheme '{scheme}' for basic auth, only http/https are allowed."
        )),
    }
}

#[derive(Debug, Default)]
pub(crate) struct BasicAuthState {
    credentials: Mutex<HashMap<String, BasicCredentials>>,
}

impl BasicAuthState {
    pub(crate) fn remember(
        &self,
        raw_url: &str,
        username: &str,
        password: &str,
    ) -> Result<String, String> {
        let origin = origin_key(raw_url)?;
        let credentials = BasicCredentials::new(username, password)?;
        self.credentials
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(origin.clone(), credentials);
        Ok(origin)
    }

    pub(crate) fn forget(&self, raw_url: &str) -> Result<bool, String> {
        let origin = origin_key(raw_url)?;
        Ok(self
            .credentials
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&origin)
            .is_some())
    }

    pub(crate) fn header_for(&self, raw_url: &str) -> Option<String> {
        let origin = origin_key(raw_url).ok()?;
        self.credentials
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&origin)
            .map(BasicCredentials::authorization_header)
    }
}

pub(crate) fn activate<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    if app_handle.try_state::<BasicAuthState>().is_some() {
        return;
    }
    app_handle.manage(BasicAuthState::default());
    log("basic-auth credential store ready");
}

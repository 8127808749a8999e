//! Where the shell's content lives and how finished page loads are judged.
//!
//! Page-load failure is inferred from the URL a load finished on: only a load
//! that ends outside the entry origin (a server-side redirect, an engine
//! error page with its own URL) counts as failed and triggers the return to
//! the entry page. A load that fails while keeping the entry URL, such as an
//! unreachable dev server or a missing bundled asset, still counts as loaded.

use std::path::PathBuf;

use tauri::WebviewUrl;
use url::Url;

use crate::ENTRY_DOCUMENT;

const APP_ORIGIN: &str = "tauri://localhost/";
const APP_ORIGIN_HTTP: &str = "http://tauri.localhost/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PageLoadOutcome {
    Loaded,
    Failed,
    Ignored,
}

/// URL of the bundled single-page application entry point. `tauri dev`
/// serves it from the configured dev server instead.
pub(crate) fn resolve_entry_url(
    dev_url: Option<&Url>,
    is_dev: bool,
    http_app_origin: bool,
) -> Result<Url, String> {
    let base = match dev_url {
        Some(dev_url) if is_dev => dev_url.clone(),
        _ => {
            let origin = if http_app_origin {
                APP_ORIGIN_HTTP
            } else {
                APP_ORIGIN
            };
            Url::parse(origin).map_err(|error| format!("Invalid app origin {origin}: {error}"))?
        }
    };

    base.join(ENTRY_DOCUMENT)
        .map_err(|error| format!("Invalid entry url for {base}: {error}"))
}

pub(crate) fn same_origin(left: &Url, right: &Url) -> bool {
    left.scheme() == right.scheme()
        && left.host_str() == right.host_str()
        && left.port_or_known_default() == right.port_or_known_default()
}

/// Same resource, ignoring the fragment the single-page app routes with.
pub(crate) fn is_same_document(left: &Url, right: &Url) -> bool {
    same_origin(left, right) && left.path() == right.path() && left.query() == right.query()
}

pub(crate) fn is_app_url(url: &Url) -> bool {
    [APP_ORIGIN, APP_ORIGIN_HTTP]
        .iter()
        .filter_map(|origin| Url::parse(origin).ok())
        .any(|origin| same_origin(url, &origin))
}

pub(crate) fn webview_url_for(url: &Url) -> WebviewUrl {
    if is_app_url(url) {
        WebviewUrl::App(PathBuf::from(url.path().trim_start_matches('/')))
    } else {
        WebviewUrl::External(url.clone())
    }
}

/// `about:blank` is a transient state of freshly created webviews.
pub(crate) fn classify_finished_load(loaded: &Url, entry_url: &Url) -> PageLoadOutcome {
    if loaded.as_str() == "about:blank" {
        return PageLoadOutcome::Ignored;
    }
    if same_origin(loaded, entry_url) {
        PageLoadOutcome::Loaded
    } else {
        PageLoadOutcome::Failed
    }
}

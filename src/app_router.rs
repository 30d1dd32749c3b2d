use folio_core::catalog::project_path;
use folio_core::DeepLinkRequest;
use wasm_bindgen::JsValue;

/// Reads the one-shot deep-link payload left in `history.state` by the
/// project pages. Invalid payloads are logged and treated as absent.
pub(crate) fn take_deep_link_request() -> Option<DeepLinkRequest> {
    let window = web_sys::window()?;
    let state = window.history().ok()?.state().ok()?;
    if state.is_null() || state.is_undefined() {
        return None;
    }
    let raw = js_sys::JSON::stringify(&state)
        .ok()
        .and_then(|value| JsValue::from(value).as_string())?;
    match DeepLinkRequest::from_state_json(&raw) {
        Ok(request) => request,
        Err(err) => {
            gloo::console::warn!("ignoring router state", err.to_string());
            None
        }
    }
}

/// Replaces the router state with empty state on the same URL so a reload
/// does not replay the deep link.
pub(crate) fn clear_router_state() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let location = window.location();
    let path = location.pathname().unwrap_or_default();
    let search = location.search().unwrap_or_default();
    let hash = location.hash().unwrap_or_default();
    let url = format!("{path}{search}{hash}");
    if let Ok(history) = window.history() {
        let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(&url));
    }
}

pub(crate) fn open_project(slug: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let path = project_path(slug);
    gloo::console::log!("navigate", path.clone());
    if window.location().assign(&path).is_err() {
        gloo::console::warn!("navigation failed", path);
    }
}

pub(crate) fn open_external(url: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let opened = window.open_with_url_and_target_and_features(url, "_blank", "noopener,noreferrer");
    if opened.is_err() {
        gloo::console::warn!("failed to open external link", url.to_string());
    }
}

#[cfg(test)]
fn push_router_state(raw_json: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(state) = js_sys::JSON::parse(raw_json) else {
        return;
    };
    if let Ok(history) = window.history() {
        let _ = history.replace_state(&state, "");
    }
}

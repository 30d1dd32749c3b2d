use folio_core::Timings;

pub(crate) const DEFAULT_MANIFEST_URL: &str = "/preload-manifest.json";
pub(crate) const PRELOAD_READY_KEY: &str = "folio.preload.ready.v1";
pub(crate) const VIDEO_CACHE_NAME: &str = "folio-video-v1";
pub(crate) const SKIP_PRELOAD_PARAM: &str = "nopreload";

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct AppConfig {
    pub(crate) manifest_url: String,
    pub(crate) timings: Timings,
    pub(crate) force_skip_preload: bool,
}

pub(crate) fn load_app_config() -> AppConfig {
    AppConfig {
        manifest_url: manifest_url(),
        timings: Timings::default(),
        force_skip_preload: skip_requested_in_query(),
    }
}

fn manifest_url() -> String {
    if let Some(raw) = option_env!("FOLIO_MANIFEST_URL")
        .or(option_env!("TRUNK_PUBLIC_FOLIO_MANIFEST_URL"))
    {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    DEFAULT_MANIFEST_URL.to_string()
}

fn skip_requested_in_query() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    let Ok(search) = window.location().search() else {
        return false;
    };
    query_requests_skip(&search)
}

pub(crate) fn query_requests_skip(search: &str) -> bool {
    let search = search.trim();
    if search.is_empty() {
        return false;
    }
    let Ok(params) = web_sys::UrlSearchParams::new_with_str(search) else {
        return false;
    };
    params.has(SKIP_PRELOAD_PARAM)
}

use folio_core::layout::{viewport_height_unit, LayoutMetrics, PlatformHints};
use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;
use yew::prelude::*;

pub(crate) fn platform_hints() -> PlatformHints {
    web_sys::window()
        .and_then(|window| window.navigator().user_agent().ok())
        .map(|agent| PlatformHints::from_user_agent(&agent))
        .unwrap_or_default()
}

fn inner_size() -> (f64, f64) {
    let Some(window) = web_sys::window() else {
        return (0.0, 0.0);
    };
    let width = window
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0);
    (width, height)
}

pub(crate) fn viewport_width() -> f64 {
    inner_size().0
}

pub(crate) fn current_metrics() -> LayoutMetrics {
    LayoutMetrics::compute(viewport_width(), platform_hints())
}

/// Publishes `--vh` on the document root for toolbar-resizing mobile browsers.
pub(crate) fn publish_vh() {
    let (_, height) = inner_size();
    let Some(root) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.document_element())
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    let value = format!("{}px", viewport_height_unit(height));
    let _ = root.style().set_property("--vh", &value);
}

pub(crate) fn prefers_reduced_motion() -> bool {
    web_sys::window()
        .and_then(|window| {
            window
                .match_media("(prefers-reduced-motion: reduce)")
                .ok()
                .flatten()
        })
        .map(|query| query.matches())
        .unwrap_or(false)
}

/// Layout metrics that are recomputed from scratch on resize and
/// orientation change.
#[hook]
pub(crate) fn use_layout_metrics() -> LayoutMetrics {
    let metrics = use_state(current_metrics);
    {
        let metrics = metrics.clone();
        use_effect_with((), move |_| {
            publish_vh();
            let mut listeners = Vec::new();
            if let Some(window) = web_sys::window() {
                for event_name in ["resize", "orientationchange"] {
                    let metrics = metrics.clone();
                    listeners.push(EventListener::new(&window, event_name, move |_| {
                        publish_vh();
                        metrics.set(current_metrics());
                    }));
                }
            }
            move || drop(listeners)
        });
    }
    *metrics
}

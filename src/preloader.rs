use std::cell::{Cell, RefCell};
use std::rc::Rc;

use folio_core::catalog;
use folio_core::preload::{
    AssetKind, LoadOutcome, Manifest, PreloadEntry, PreloadPlan, PreloadProgress,
};
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use gloo::events::EventListener;
use gloo_net::http::Request;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Cache, HtmlImageElement};

use crate::config::VIDEO_CACHE_NAME;

thread_local! {
    // Decoded bitmaps stay referenced so the browser keeps them until paint.
    static IMAGE_CACHE: RefCell<Vec<HtmlImageElement>> = RefCell::new(Vec::new());
}

pub(crate) type ProgressHook = Rc<dyn Fn(f64)>;
pub(crate) type DoneHook = Rc<dyn Fn()>;

/// Running preload. Late completions are ignored once cancelled.
pub(crate) struct PreloadTask {
    cancelled: Rc<Cell<bool>>,
}

impl PreloadTask {
    pub(crate) fn cancel(&self) {
        self.cancelled.set(true);
    }
}

impl Drop for PreloadTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

pub(crate) fn start(
    manifest_url: String,
    on_progress: ProgressHook,
    on_done: DoneHook,
) -> PreloadTask {
    let cancelled = Rc::new(Cell::new(false));
    let task = PreloadTask {
        cancelled: Rc::clone(&cancelled),
    };
    spawn_local(async move {
        let manifest = fetch_manifest(&manifest_url).await;
        if cancelled.get() {
            return;
        }
        let plan = PreloadPlan::build(catalog::critical_images(), &manifest);
        let mut progress = PreloadProgress::new(plan.len());
        let mut pending: FuturesUnordered<LocalBoxFuture<'static, LoadOutcome>> = plan
            .entries()
            .iter()
            .cloned()
            .map(load_entry)
            .collect();
        while let Some(outcome) = pending.next().await {
            if cancelled.get() {
                return;
            }
            on_progress(progress.record(outcome));
        }
        if cancelled.get() {
            return;
        }
        gloo::console::log!(
            "preload complete",
            format!("{} assets, {} failed", progress.total(), progress.failed())
        );
        on_done();
    });
    task
}

async fn fetch_manifest(url: &str) -> Manifest {
    let response = match Request::get(url).send().await {
        Ok(response) => response,
        Err(err) => {
            gloo::console::warn!("manifest fetch failed", err.to_string());
            return Manifest::default();
        }
    };
    if !response.ok() {
        gloo::console::warn!("manifest fetch failed", response.status());
        return Manifest::default();
    }
    let text = match response.text().await {
        Ok(text) => text,
        Err(err) => {
            gloo::console::warn!("manifest body unreadable", err.to_string());
            return Manifest::default();
        }
    };
    match Manifest::parse(&text) {
        Ok(manifest) => manifest,
        Err(err) => {
            gloo::console::warn!("manifest malformed", err.to_string());
            Manifest::default()
        }
    }
}

fn load_entry(entry: PreloadEntry) -> LocalBoxFuture<'static, LoadOutcome> {
    match entry.kind {
        AssetKind::Image => load_image(entry.url).boxed_local(),
        AssetKind::Video => warm_video(entry.url).boxed_local(),
    }
}

async fn load_image(url: String) -> LoadOutcome {
    let Ok(img) = HtmlImageElement::new() else {
        return LoadOutcome::Failed;
    };
    let _ = img.set_attribute("loading", "eager");
    let _ = img.set_attribute("fetchpriority", "high");
    let _ = img.set_attribute("decoding", "async");

    let (tx, rx) = oneshot::channel::<LoadOutcome>();
    let tx = Rc::new(RefCell::new(Some(tx)));
    let settle = |outcome: LoadOutcome| {
        let tx = Rc::clone(&tx);
        move |_: &web_sys::Event| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(outcome);
            }
        }
    };
    let _on_load = EventListener::once(&img, "load", settle(LoadOutcome::Loaded));
    let _on_error = EventListener::once(&img, "error", settle(LoadOutcome::Failed));
    img.set_src(&url);

    let outcome = rx.await.unwrap_or(LoadOutcome::Failed);
    match outcome {
        LoadOutcome::Loaded => IMAGE_CACHE.with(|cache| cache.borrow_mut().push(img)),
        LoadOutcome::Failed => gloo::console::warn!("image preload failed", url),
    }
    outcome
}

async fn warm_video(url: String) -> LoadOutcome {
    let Some(window) = web_sys::window() else {
        return LoadOutcome::Failed;
    };
    let Ok(storage) = window.caches() else {
        gloo::console::warn!("cache storage unavailable", url);
        return LoadOutcome::Failed;
    };
    let cache = match JsFuture::from(storage.open(VIDEO_CACHE_NAME)).await {
        Ok(value) => match value.dyn_into::<Cache>() {
            Ok(cache) => cache,
            Err(_) => return LoadOutcome::Failed,
        },
        Err(_) => {
            gloo::console::warn!("cache open failed", VIDEO_CACHE_NAME);
            return LoadOutcome::Failed;
        }
    };
    match JsFuture::from(cache.add_with_str(&url)).await {
        Ok(_) => LoadOutcome::Loaded,
        Err(_) => {
            gloo::console::warn!("video warm-up failed", url);
            LoadOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloo::timers::future::TimeoutFuture;
    use js_sys::Date;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test(async)]
    async fn missing_manifest_still_completes() {
        let reports = Rc::new(RefCell::new(Vec::new()));
        let done = Rc::new(Cell::new(false));
        let _task = {
            let reports = Rc::clone(&reports);
            let done = Rc::clone(&done);
            start(
                String::from("/definitely-missing-manifest.json"),
                Rc::new(move |fraction| reports.borrow_mut().push(fraction)),
                Rc::new(move || done.set(true)),
            )
        };
        let start_ms = Date::now();
        while !done.get() && Date::now() - start_ms < 10_000.0 {
            TimeoutFuture::new(20).await;
        }
        assert!(done.get(), "preload never finished");
        let reports = reports.borrow();
        assert!(reports.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(reports.last().copied(), Some(1.0));
    }

    #[wasm_bindgen_test(async)]
    async fn cancelled_task_never_reports_done() {
        let done = Rc::new(Cell::new(false));
        let task = {
            let done = Rc::clone(&done);
            start(
                String::from("/definitely-missing-manifest.json"),
                Rc::new(|_| {}),
                Rc::new(move || done.set(true)),
            )
        };
        drop(task);
        TimeoutFuture::new(1500).await;
        assert!(!done.get());
    }
}

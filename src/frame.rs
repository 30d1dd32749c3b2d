use std::future::Future;

use futures::channel::oneshot;
use futures::future::{select, Either};
use futures::pin_mut;
use gloo::render::request_animation_frame;
use gloo::timers::future::TimeoutFuture;

/// Resolves on the next animation frame with its timestamp.
pub(crate) async fn next_frame() -> f64 {
    let (tx, rx) = oneshot::channel();
    let _handle = request_animation_frame(move |timestamp| {
        let _ = tx.send(timestamp);
    });
    rx.await.unwrap_or(0.0)
}

/// Probes once per animation frame until `probe` yields a value or the
/// timeout elapses. Dropping the returned future cancels the frame request.
pub(crate) async fn wait_until<T, F>(mut probe: F, timeout_ms: u32) -> Option<T>
where
    F: FnMut() -> Option<T>,
{
    let polling = async move {
        loop {
            if let Some(value) = probe() {
                return value;
            }
            next_frame().await;
        }
    };
    let timeout = TimeoutFuture::new(timeout_ms);
    pin_mut!(polling);
    pin_mut!(timeout);
    match select(polling, timeout).await {
        Either::Left((value, _)) => Some(value),
        Either::Right(_) => None,
    }
}

/// Waits for `signal` but never longer than `fallback_ms`. Returns true when
/// the signal itself arrived first.
pub(crate) async fn signal_or_fallback<S>(signal: S, fallback_ms: u32) -> bool
where
    S: Future,
{
    let fallback = TimeoutFuture::new(fallback_ms);
    pin_mut!(signal);
    pin_mut!(fallback);
    matches!(select(signal, fallback).await, Either::Left(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test(async)]
    async fn wait_until_gives_up_after_timeout() {
        let probes = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&probes);
        let found: Option<()> = wait_until(
            move || {
                counter.set(counter.get() + 1);
                None
            },
            120,
        )
        .await;
        assert_eq!(found, None);
        assert!(probes.get() >= 1);
    }

    #[wasm_bindgen_test(async)]
    async fn wait_until_returns_first_hit() {
        let probes = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&probes);
        let found = wait_until(
            move || {
                counter.set(counter.get() + 1);
                (counter.get() >= 3).then_some(counter.get())
            },
            2000,
        )
        .await;
        assert_eq!(found, Some(3));
    }

    #[wasm_bindgen_test(async)]
    async fn fallback_wins_when_signal_never_fires() {
        let (_tx, rx) = oneshot::channel::<()>();
        assert!(!signal_or_fallback(rx, 50).await);
        let (tx, rx) = oneshot::channel::<()>();
        let _ = tx.send(());
        assert!(signal_or_fallback(rx, 1000).await);
    }
}

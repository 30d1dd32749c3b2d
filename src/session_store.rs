use web_sys::Storage;

use crate::config::PRELOAD_READY_KEY;

fn session_storage() -> Option<Storage> {
    web_sys::window()?.session_storage().ok().flatten()
}

pub(crate) fn preload_ready() -> bool {
    let Some(storage) = session_storage() else {
        return false;
    };
    matches!(
        storage.get_item(PRELOAD_READY_KEY).ok().flatten().as_deref(),
        Some("1")
    )
}

pub(crate) fn mark_preload_ready() {
    let Some(storage) = session_storage() else {
        gloo::console::warn!("session storage unavailable; preload will run again next mount");
        return;
    };
    let _ = storage.set_item(PRELOAD_READY_KEY, "1");
}

#[cfg(test)]
fn clear_preload_ready() {
    if let Some(storage) = session_storage() {
        let _ = storage.remove_item(PRELOAD_READY_KEY);
    }
}

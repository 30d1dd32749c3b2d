mod app_core;
mod app_router;
mod config;
mod frame;
mod preloader;
mod session_store;
mod viewport;
mod yew_app;

use crate::app_core::AppCore;

fn main() {
    console_error_panic_hook::set_once();
    let config = config::load_app_config();
    if config.force_skip_preload {
        gloo::console::log!("preload skipped by query parameter");
    }
    let core = AppCore::new(config.timings);
    yew_app::run_app(core, config);
}

//! Student Event Check-in Web App (Leptos + WASM)

mod api;
mod app;
mod chart;
mod components;
mod pages;
mod refresh;
mod scan;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    let path = web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_default();
    app::mount(&path);
}

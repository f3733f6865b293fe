//! portfolio-fx - a bilingual portfolio page with scroll-driven reveals
//! and a live particle-network background
//!
//! `core` is platform-agnostic and carries the particle field, the frame
//! loop, scroll reveal choreography and language persistence. `app` is the
//! egui host, built for a browser canvas (`wasm`) or a desktop window
//! (`native`).

pub mod core;

#[cfg(any(not(target_arch = "wasm32"), feature = "wasm"))]
pub mod time;

#[cfg(not(target_arch = "wasm32"))]
pub mod store_native;
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub mod store_wasm;

#[cfg(any(feature = "wasm", feature = "native"))]
pub mod app;
#[cfg(any(feature = "wasm", feature = "native"))]
pub mod theme;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod web {
    use tracing::{error, info, warn};
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    use crate::app::PortfolioApp;
    use crate::core::PageConfig;

    /// Page config from `window.__portfolio_fx_config`, defaults when absent or invalid
    fn page_config() -> PageConfig {
        let value = match js_sys::eval("window.__portfolio_fx_config") {
            Ok(v) if !v.is_undefined() && !v.is_null() => v,
            _ => return PageConfig::default(),
        };
        let json = match js_sys::JSON::stringify(&value) {
            Ok(s) => String::from(s),
            Err(_) => {
                warn!("Page config is not serializable, using defaults");
                return PageConfig::default();
            }
        };
        PageConfig::from_json(&json).unwrap_or_else(|e| {
            warn!(error = %e, "Invalid page config, using defaults");
            PageConfig::default()
        })
    }

    #[wasm_bindgen(start)]
    pub fn main() {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();

        let config = page_config();
        let web_options = eframe::WebOptions::default();

        wasm_bindgen_futures::spawn_local(async move {
            let canvas = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("canvas"))
                .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok());
            let Some(canvas) = canvas else {
                error!("No <canvas id=\"canvas\"> on the page");
                return;
            };

            info!("Starting page");
            let start = eframe::WebRunner::new()
                .start(
                    canvas,
                    web_options,
                    Box::new(move |cc| Ok(Box::new(PortfolioApp::new(cc, config)))),
                )
                .await;
            if let Err(e) = start {
                error!(error = ?e, "Failed to start eframe");
            }
        });
    }
}

//! Console logging for browser hosts.

use tracing::Level;
use tracing::subscriber::set_global_default;
use tracing_subscriber::Registry;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;

/// Install the panic hook and a console `tracing` subscriber.
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init_logging() {
    console_error_panic_hook::set_once();

    let console_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    // Per-keystroke cursor and DOM tracing stays off unless asked for.
    let filter = EnvFilter::new("debug,loom::cursor=info,loom::dom_sync=info");

    let reg = Registry::default().with(filter).with(wasm_layer);

    let _ = set_global_default(reg);
}

fn main() {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&format!("Starting {}", env!("CARGO_PKG_NAME")).into());

    valentine_card::run();
}

//! WebAssembly support. A panic in WASM aborts silently unless a hook routes
//! the message to the browser console first.

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

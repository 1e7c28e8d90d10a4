fn main() {
    // Trunk serves the bin target; all wiring lives in the library's start hook.
    #[cfg(target_arch = "wasm32")]
    dicoding_stories::start();
}

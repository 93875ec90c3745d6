//! Build script for the beacon firmware
//!
//! Adds the crate directory to the linker search path so a board-specific
//! `memory.x` can override the one shipped by embassy-stm32.

fn main() {
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    if let Ok(dir) = std::env::var("CARGO_MANIFEST_DIR") {
        println!("cargo:rustc-link-search={dir}");
    }
}

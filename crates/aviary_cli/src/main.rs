//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `aviary_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("aviary_core ping={}", aviary_core::ping());
    println!("aviary_core version={}", aviary_core::core_version());
}

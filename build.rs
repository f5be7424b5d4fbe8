// RustVoiceLink - Build Script
//
// Exports the ESP-IDF environment when building firmware and stamps the
// version string. Host builds skip the ESP-IDF step.

use std::process::Command;

fn main() {
    // ESP-IDF environment setup (MUST be first for firmware builds)
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }

    // Get git version info
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=GIT_HASH={}", git_hash);
    println!("cargo:rustc-env=VERSION_STRING=VoiceLink v{}-g{}", version, git_hash);

    // Compile-time configuration overrides (see config::LinkConfig::from_build_env)
    for key in [
        "VOICE_LINK_SSID",
        "VOICE_LINK_PASSWORD",
        "VOICE_LINK_HOST",
        "VOICE_LINK_PORT",
        "VOICE_LINK_MODE",
    ] {
        println!("cargo:rerun-if-env-changed={}", key);
    }

    // Rebuild if git HEAD changes
    println!("cargo:rerun-if-changed=.git/HEAD");
}

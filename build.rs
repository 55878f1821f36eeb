use std::env;
use std::fs;
use std::path::Path;

fn main() {
    // Read version from VERSION file at the crate root
    let version = if let Ok(v) = env::var("BYTEPATCH_VERSION") {
        // Use environment variable if set
        v
    } else {
        let version_file = Path::new("VERSION");
        if version_file.exists() {
            fs::read_to_string(version_file)
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string())
                .trim()
                .to_string()
        } else {
            // Fallback to the manifest version
            env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.1".to_string())
        }
    };

    println!("cargo:rustc-env=BYTEPATCH_VERSION={}", version);
    println!("cargo:rerun-if-changed=VERSION");
    println!("cargo:rerun-if-env-changed=BYTEPATCH_VERSION");
}

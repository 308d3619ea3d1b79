//! Extra link flags for libgit2.

/// System libraries libgit2 pulls in per target OS.
fn system_libs(target_os: &str) -> &'static [&'static str] {
    match target_os {
        // Registry and crypto APIs used for credentials and hashing.
        "windows" => &["advapi32"],
        _ => &[],
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    for lib in system_libs(&target_os) {
        println!("cargo:rustc-link-lib={lib}");
    }
}

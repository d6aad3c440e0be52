use std::process::Command;

fn main() {
    // Embed the compiler identity for the compilation info source.
    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".into());
    let version = Command::new(rustc)
        .arg("--version")
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "rustc unknown".into());

    println!("cargo:rustc-env=APPINFO_RUSTC_VERSION={version}");

    let target = std::env::var("TARGET").unwrap_or_else(|_| "unknown".into());
    println!("cargo:rustc-env=APPINFO_TARGET={target}");

    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".into());
    println!("cargo:rustc-env=APPINFO_PROFILE={profile}");

    let opt_level = std::env::var("OPT_LEVEL").unwrap_or_else(|_| "0".into());
    println!("cargo:rustc-env=APPINFO_OPT_LEVEL={opt_level}");

    println!("cargo:rerun-if-env-changed=RUSTC");
}

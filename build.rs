fn main() {
    // Release builds may pin TASKBOARD_VERSION; otherwise use the crate version plus git hash.
    println!("cargo:rerun-if-env-changed=TASKBOARD_VERSION");
    if let Ok(version) = std::env::var("TASKBOARD_VERSION") {
        println!("cargo:rustc-env=TASKBOARD_VERSION={version}");
        return;
    }

    let pkg = std::env::var("CARGO_PKG_VERSION").unwrap_or_default();
    let hash = std::process::Command::new("git")
        .args(["rev-parse", "--short=7", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .unwrap_or_default()
        .trim()
        .to_string();

    if hash.is_empty() {
        println!("cargo:rustc-env=TASKBOARD_VERSION={pkg}");
    } else {
        println!("cargo:rustc-env=TASKBOARD_VERSION={pkg}+{hash}");
    }
}

use chrono::Utc;

fn main() {
    // Build timestamp reported by the health endpoint / 构建时间
    println!("cargo:rustc-env=BUILD_TIME={}", Utc::now().to_rfc3339());
    println!("cargo:rerun-if-changed=build.rs");
}

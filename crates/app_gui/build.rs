use std::env;

fn main() {
    let version = env::var("VISION_PREDICTOR_VERSION")
        .unwrap_or_else(|_| env::var("CARGO_PKG_VERSION").unwrap());
    println!("cargo:rerun-if-env-changed=VISION_PREDICTOR_VERSION");
    println!("cargo:rustc-env=VISION_PREDICTOR_VERSION={version}");
}

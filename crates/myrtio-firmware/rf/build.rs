fn main() {
    // WIFI_SSID and WIFI_PASSWORD come from the environment or a .env file
    dotenv_build::output(dotenv_build::Config::default()).unwrap();

    let version = format!(
        "{}-{}",
        env!("CARGO_PKG_VERSION"),
        chrono::Utc::now().format("%Y%m%d%H%M")
    );
    println!("cargo:rustc-env=BUILD_VERSION={version}");
    println!("cargo:rerun-if-changed=build.rs");
}

use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Freightdocs";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the application data directory
/// ~/Freightdocs/ on all platforms
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Freightdocs")
}

/// Default location of the document tracking database
pub fn database_path() -> PathBuf {
    app_data_dir().join("documents.db")
}

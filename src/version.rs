// Version information for the captcha assist server

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-captcha-assist-2026-10-18";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2026-10-18";

/// Capabilities exposed over HTTP
pub const FEATURES: &[&str] = &[
    "slide-match",
    "slide-comparison",
    "classification",
    "detection",
    "arithmetic",
    "crop",
    "point-select",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Captcha Assist Server {} ({})", VERSION_NUMBER, BUILD_DATE)
}

/// Get full version info for API responses
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION_NUMBER,
        "build": VERSION,
        "date": BUILD_DATE,
        "features": FEATURES,
    })
}

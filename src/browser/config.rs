use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for launching the headless browser
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// Whether to run the browser in headless mode (default: true)
    pub headless: bool,

    /// Chrome/Chromium binary to launch; found on PATH when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable: Option<PathBuf>,

    /// Browser window width (default: 1920)
    pub window_width: u32,

    /// Browser window height (default: 1080)
    pub window_height: u32,

    /// Extra command-line switches passed to the browser
    pub extra_args: Vec<String>,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
            window_width: 1920,
            window_height: 1080,
            extra_args: Vec::new(),
        }
    }
}

impl LaunchConfig {
    /// Switches always passed to the browser, followed by `extra_args`
    pub fn args(&self) -> Vec<String> {
        [
            "--no-sandbox",
            "--disable-gpu",
            "--disable-dev-shm-usage",
            "--disable-setuid-sandbox",
            "--disable-software-rasterizer",
        ]
        .iter()
        .map(|s| s.to_string())
        .chain(self.extra_args.iter().cloned())
        .collect()
    }
}

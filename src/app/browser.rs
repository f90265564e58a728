//! An abstraction layer for opening the system web browser to enable testing.

use std::io;

/// Opens URLs in a browser.
/// A mock implementation is used during tests so that no real browser is
/// started.
pub trait BrowserLauncher: Send + Sync {
    fn open(&self, url: &str) -> io::Result<()>;
}

/// The production implementation that uses the `open` crate to hand the URL
/// to the platform's default opener.
pub struct SystemBrowser;

impl BrowserLauncher for SystemBrowser {
    fn open(&self, url: &str) -> io::Result<()> {
        open::that_detached(url)
    }
}

/// Opens `url`, falling back to asking the user to open it by hand.
///
/// Returns whether the launcher reported success.
pub fn launch(launcher: &dyn BrowserLauncher, url: &str) -> bool {
    match launcher.open(url) {
        Ok(()) => {
            tracing::info!("Opened browser at {}", url);
            true
        }
        Err(e) => {
            tracing::warn!("Failed to open browser: {}", e);
            println!("Please open your browser manually to: {url}");
            false
        }
    }
}

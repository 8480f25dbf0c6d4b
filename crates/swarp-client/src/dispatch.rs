//! Handing a `roblox://` URL to whatever the OS has registered for it.

use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The platform opener could not be started.
    Spawn(String),
    Unsupported,
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spawn(e) => write!(f, "failed to start URL handler: {e}"),
            Self::Unsupported => write!(f, "no URL handler known for this platform"),
        }
    }
}

impl std::error::Error for DispatchError {}

/// Something that can open a scheme URL.
pub trait UrlDispatcher {
    fn dispatch(&self, url: &str) -> Result<(), DispatchError>;
}

/// Opens URLs with the platform's default handler:
/// - macOS: `open`
/// - Linux: `xdg-open`
/// - Windows: `rundll32 url.dll,FileProtocolHandler` (avoids `cmd` parsing `&`)
pub struct SystemDispatcher;

impl SystemDispatcher {
    fn command(url: &str) -> Option<Command> {
        #[cfg(target_os = "macos")]
        {
            let mut cmd = Command::new("open");
            cmd.arg(url);
            Some(cmd)
        }

        #[cfg(target_os = "windows")]
        {
            let mut cmd = Command::new("rundll32");
            cmd.args(["url.dll,FileProtocolHandler", url]);
            Some(cmd)
        }

        #[cfg(all(unix, not(target_os = "macos")))]
        {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(url);
            Some(cmd)
        }

        #[cfg(not(any(unix, target_os = "windows")))]
        {
            let _ = url;
            None
        }
    }
}

impl UrlDispatcher for SystemDispatcher {
    fn dispatch(&self, url: &str) -> Result<(), DispatchError> {
        let mut cmd = Self::command(url).ok_or(DispatchError::Unsupported)?;
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| DispatchError::Spawn(e.to_string()))?;
        tracing::info!(url, "Handed launch URL to system handler");
        Ok(())
    }
}

/// Prints the URL instead of opening it.
pub struct PrintDispatcher;

impl UrlDispatcher for PrintDispatcher {
    fn dispatch(&self, url: &str) -> Result<(), DispatchError> {
        println!("{url}");
        Ok(())
    }
}

/// Remembers every URL it is handed; clones share the same record.
#[derive(Clone, Default)]
pub struct RecordingDispatcher {
    urls: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A dispatcher that records the attempt and then reports a spawn failure.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().map(|urls| urls.clone()).unwrap_or_default()
    }
}

impl UrlDispatcher for RecordingDispatcher {
    fn dispatch(&self, url: &str) -> Result<(), DispatchError> {
        if let Ok(mut urls) = self.urls.lock() {
            urls.push(url.to_string());
        }
        if self.fail {
            return Err(DispatchError::Spawn("handler missing".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_clones_share_history() {
        let dispatcher = RecordingDispatcher::new();
        let handle = dispatcher.clone();
        dispatcher.dispatch("roblox://a").unwrap();
        dispatcher.dispatch("roblox://b").unwrap();
        assert_eq!(handle.urls(), ["roblox://a", "roblox://b"]);
    }

    #[test]
    fn failing_dispatcher_still_records() {
        let dispatcher = RecordingDispatcher::failing();
        let err = dispatcher.dispatch("roblox://a").unwrap_err();
        assert!(matches!(err, DispatchError::Spawn(_)));
        assert_eq!(dispatcher.urls().len(), 1);
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    #[test]
    fn linux_uses_xdg_open() {
        let cmd = SystemDispatcher::command("roblox://x?a=1&b=2").unwrap();
        assert_eq!(cmd.get_program(), "xdg-open");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, ["roblox://x?a=1&b=2"]);
    }
}

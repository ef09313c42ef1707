//! Narration: reads the roast aloud through the platform speech command.
//!
//! Playback runs on a detached thread and is best-effort; failures only log.
//! macOS uses `say -r <wpm>`, everything else `espeak -s <wpm>`.

use std::process::{Command, Stdio};
use std::thread::JoinHandle;

use tracing::{debug, warn};

use crate::config::RoastConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narrator {
    enabled: bool,
    rate: u32,
}

/// Strip Markdown emphasis and flatten newlines.
pub fn clean_for_speech(text: &str) -> String {
    text.replace('*', "").replace(['\r', '\n'], " ").trim().to_string()
}

impl Narrator {
    pub fn new(enabled: bool, rate: u32) -> Self {
        Self { enabled, rate }
    }

    pub fn from_config(config: &RoastConfig) -> Self {
        Self::new(config.speech_enabled, config.speech_rate)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Program and arguments for the current platform.
    pub fn command_line(&self, text: &str) -> (&'static str, Vec<String>) {
        let text = clean_for_speech(text);
        if cfg!(target_os = "macos") {
            ("say", vec!["-r".into(), self.rate.to_string(), text])
        } else {
            ("espeak", vec!["-s".into(), self.rate.to_string(), text])
        }
    }

    /// Speak in the background. Returns `None` when disabled or the text is blank.
    pub fn narrate(&self, text: &str) -> Option<JoinHandle<()>> {
        if !self.enabled || clean_for_speech(text).is_empty() {
            return None;
        }
        let (program, args) = self.command_line(text);
        let handle = std::thread::spawn(move || {
            let status = Command::new(program)
                .args(&args)
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status();
            match status {
                Ok(s) => debug!(target: "speech", program, success = s.success(), "narration_finished"),
                Err(e) => warn!(target: "speech", program, error = %e, "narration_unavailable"),
            }
        });
        Some(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleaning_removes_markup() {
        assert_eq!(clean_for_speech("**Wow**\nthat team\r\nstinks"), "Wow that team  stinks");
    }

    #[test]
    fn disabled_narrator_does_nothing() {
        let n = Narrator::new(false, 155);
        assert!(n.narrate("hello").is_none());
        let n = Narrator::new(true, 155);
        assert!(n.narrate(" * ").is_none());
    }

    #[test]
    fn command_carries_rate() {
        let n = Narrator::new(true, 155);
        let (_, args) = n.command_line("*hi*");
        assert_eq!(args[1], "155");
        assert_eq!(args[2], "hi");
    }
}

//! Live Regions
//!
//! Announcement buffer for `aria-live` regions. Messages are queued while
//! state changes quickly and only the last one is published once the owner's
//! quiet-window timer fires.

use crate::LiveRegionMode;

/// Off-screen announcement buffer
#[derive(Debug, Clone, Default)]
pub struct LiveRegion {
    pub mode: LiveRegionMode,
    text: String,
    pending: Option<String>,
}

impl LiveRegion {
    pub fn new(mode: LiveRegionMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Queue a message, replacing any not yet published
    pub fn queue(&mut self, message: impl Into<String>) {
        self.pending = Some(message.into());
    }

    /// Publish the latest queued message. Returns true if the text changed.
    pub fn flush(&mut self) -> bool {
        match self.pending.take() {
            Some(message) if message != self.text => {
                self.text = message;
                true
            }
            _ => false,
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Currently published text
    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_message_wins() {
        let mut region = LiveRegion::new(LiveRegionMode::Polite);
        region.queue("Slide 2 of 4");
        region.queue("Slide 3 of 4");
        assert_eq!(region.text(), "");

        assert!(region.flush());
        assert_eq!(region.text(), "Slide 3 of 4");
        assert!(!region.has_pending());
    }

    #[test]
    fn test_flush_without_change() {
        let mut region = LiveRegion::default();
        region.queue("Slide 1 of 2");
        region.flush();
        region.queue("Slide 1 of 2");
        assert!(!region.flush());
        assert!(!region.flush());
    }
}

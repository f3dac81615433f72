//! Bluetooth module identification
//!
//! The coordinator asks the module for its version string and classifies
//! the reply once. The first classification is latched for the session.

use heapless::String;

use crane_protocol::{LinkStatus, MAX_COMMAND_LEN};

/// Classify a complete identification reply
pub fn classify(response: &str, signature: &str) -> LinkStatus {
    if response == signature {
        LinkStatus::Ok
    } else if !response.is_empty() {
        LinkStatus::Error
    } else {
        LinkStatus::Inoperative
    }
}

/// One-shot identification probe
///
/// Bytes are accumulated until a poll brings nothing new (the reply is
/// complete) or the deadline passes with no reply at all.
#[derive(Debug, Clone, Default)]
pub struct LinkProbe {
    deadline_ms: Option<u64>,
    response: String<MAX_COMMAND_LEN>,
    overflowed: bool,
    status: LinkStatus,
}

impl LinkProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start waiting for a reply, unless already classified
    pub fn start(&mut self, now_ms: u64, timeout_ms: u32) {
        if self.status.is_known() {
            return;
        }
        self.deadline_ms = Some(now_ms + timeout_ms as u64);
    }

    /// Latched classification
    pub fn status(&self) -> LinkStatus {
        self.status
    }

    /// Reply received so far
    pub fn response(&self) -> &str {
        &self.response
    }

    /// Feed the bytes read by one poll of the serial link
    ///
    /// Returns the classification the first time it becomes known.
    pub fn feed(&mut self, bytes: &[u8], now_ms: u64, signature: &str) -> Option<LinkStatus> {
        if self.status.is_known() {
            return None;
        }
        let deadline_ms = self.deadline_ms?;

        if !bytes.is_empty() {
            for &b in bytes {
                if self.response.push(b as char).is_err() {
                    self.overflowed = true;
                }
            }
            return None;
        }

        if self.response.is_empty() && now_ms < deadline_ms {
            return None;
        }
        Some(self.finish(signature))
    }

    /// Classify whatever has arrived, now
    pub fn finish(&mut self, signature: &str) -> LinkStatus {
        if self.status.is_known() {
            return self.status;
        }
        self.status = if self.overflowed {
            LinkStatus::Error
        } else {
            classify(&self.response, signature)
        };
        info!("link: module classified as {}", self.status.label());
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNATURE: &str = "OKlinvorV1.8";

    #[test]
    fn test_classify() {
        assert_eq!(classify("OKlinvorV1.8", SIGNATURE), LinkStatus::Ok);
        assert_eq!(classify("OK", SIGNATURE), LinkStatus::Error);
        assert_eq!(classify("okLINVORv1.8", SIGNATURE), LinkStatus::Error);
        assert_eq!(classify("", SIGNATURE), LinkStatus::Inoperative);
    }

    #[test]
    fn test_reply_classified_after_quiet_poll() {
        let mut probe = LinkProbe::new();
        probe.start(0, 1000);

        assert_eq!(probe.feed(b"OKlinvor", 10, SIGNATURE), None);
        assert_eq!(probe.feed(b"V1.8", 20, SIGNATURE), None);
        assert_eq!(probe.feed(b"", 30, SIGNATURE), Some(LinkStatus::Ok));
        assert_eq!(probe.response(), SIGNATURE);
    }

    #[test]
    fn test_silence_is_inoperative_at_deadline() {
        let mut probe = LinkProbe::new();
        probe.start(100, 1000);

        assert_eq!(probe.feed(b"", 500, SIGNATURE), None);
        assert_eq!(probe.feed(b"", 1100, SIGNATURE), Some(LinkStatus::Inoperative));
    }

    #[test]
    fn test_first_classification_latches() {
        let mut probe = LinkProbe::new();
        probe.start(0, 1000);
        probe.feed(b"ERROR", 10, SIGNATURE);
        assert_eq!(probe.feed(b"", 20, SIGNATURE), Some(LinkStatus::Error));

        probe.start(30, 1000);
        assert_eq!(probe.feed(SIGNATURE.as_bytes(), 40, SIGNATURE), None);
        assert_eq!(probe.feed(b"", 50, SIGNATURE), None);
        assert_eq!(probe.finish(SIGNATURE), LinkStatus::Error);
    }

    #[test]
    fn test_unstarted_probe_ignores_bytes() {
        let mut probe = LinkProbe::new();
        assert_eq!(probe.feed(b"", 99_999, SIGNATURE), None);
        assert_eq!(probe.status(), LinkStatus::Unknown);
    }

    #[test]
    fn test_oversized_reply_is_error() {
        let mut probe = LinkProbe::new();
        probe.start(0, 1000);
        probe.feed(&[b'x'; 40], 10, SIGNATURE);
        assert_eq!(probe.feed(b"", 20, SIGNATURE), Some(LinkStatus::Error));
    }
}

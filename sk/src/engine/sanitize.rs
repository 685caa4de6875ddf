//! Output sanitization
//!
//! Reasoning-capable models emit an internal monologue terminated by a
//! closing tag before the actual answer. A sanitize session strips that
//! preamble, remembering which tag the model used so a later chunk that
//! happens to contain a different candidate cannot flip the split point.

use tracing::debug;

/// Closing tags that end a reasoning preamble, in match-priority order
const REASONING_TAGS: [&str; 2] = ["</think>", "</thinking>"];

/// Per-generation sanitizer state
///
/// A session belongs to exactly one generation call. Sharing one across
/// concurrent generations would let one model's tag choice leak into
/// another's output.
#[derive(Debug, Default)]
pub struct SanitizeSession {
    locked: Option<&'static str>,
}

impl SanitizeSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The tag this session locked onto, if any
    pub fn locked_tag(&self) -> Option<&'static str> {
        self.locked
    }

    /// Strip the reasoning preamble from `text`
    ///
    /// On the first match against the candidate list the session locks that
    /// tag and only ever splits on it afterwards. The split keeps everything
    /// strictly after the last occurrence, since the tag text can legally
    /// appear inside the model's own answer.
    ///
    /// When the session's tag is absent from `text`: the input unchanged if
    /// `visualize_if_absent`, otherwise `None` to suppress display.
    pub fn sanitize(&mut self, text: &str, visualize_if_absent: bool) -> Option<String> {
        if self.locked.is_none() {
            self.locked = REASONING_TAGS.iter().copied().find(|tag| text.contains(tag));
            if let Some(tag) = self.locked {
                debug!(%tag, "SanitizeSession::sanitize: locked reasoning tag");
            }
        }

        match self.locked {
            Some(tag) if text.contains(tag) => text.rsplit(tag).next().map(str::to_string),
            _ => visualize_if_absent.then(|| text.to_string()),
        }
    }
}

use serde::{Deserialize, Serialize};

/// Input the shell forwards to the core between frames.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Command {
    TogglePlayback,
    /// Positive steps delay the display, negative steps advance it.
    NudgeLatency { steps: i32 },
}

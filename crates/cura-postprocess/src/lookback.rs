//! One-step lookback over the g-code stream of a single engine session.
//!
//! The engine sends one layer per postprocess call. A layer boundary can only
//! be annotated once the following layer arrives, so every layer is held back
//! for exactly one exchange and consulted when its successor is forwarded.

/// Setting whose value is echoed into every annotation.
#[derive(Debug, Clone, Copy)]
pub struct AnnotatedSetting<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

/// Per-session lookback state.
///
/// Between two exchanges at most one chunk is held. The two-chunk moment
/// (held chunk plus incoming chunk) only exists inside [`Lookback::advance`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Lookback {
    /// Nothing received yet.
    #[default]
    Empty,
    /// First chunk held, nothing analyzed yet.
    Priming(String),
    /// At least one chunk analyzed; holding the most recent one.
    Steady(String),
}

impl Lookback {
    /// Feed the next chunk and return what should be forwarded downstream.
    ///
    /// The first chunk is forwarded untouched. Every later chunk is forwarded
    /// with an annotation derived from the chunk held before it.
    pub fn advance(&mut self, chunk: String, setting: AnnotatedSetting<'_>) -> String {
        match std::mem::take(self) {
            Lookback::Empty => {
                let out = chunk.clone();
                *self = Lookback::Priming(chunk);
                out
            }
            Lookback::Priming(prior) | Lookback::Steady(prior) => {
                let mut out = annotation(&prior, setting);
                out.push_str(&chunk);
                *self = Lookback::Steady(chunk);
                out
            }
        }
    }

    /// Number of chunks held between exchanges.
    pub fn depth(&self) -> usize {
        match self {
            Lookback::Empty => 0,
            Lookback::Priming(_) | Lookback::Steady(_) => 1,
        }
    }
}

/// Split a chunk into lines.
///
/// Interior empty lines are kept; the empty tail produced by a trailing
/// newline is not a line.
pub fn split_lines(chunk: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = chunk.split('\n').collect();
    if lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

/// Comment line prepended to the chunk that follows `prior`.
pub fn annotation(prior: &str, setting: AnnotatedSetting<'_>) -> String {
    let lines = split_lines(prior);
    let AnnotatedSetting { key, value } = setting;
    match lines.last() {
        Some(last) if lines.len() > 2 => {
            format!("; last line of layer before: {last} and {key}={value}\n")
        }
        _ => format!("; first layer and {key}={value}\n"),
    }
}

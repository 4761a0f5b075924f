/// Lightweight progress reporting used by long-running operations (fetch/export).
/// Frontends (GUI/CLI) implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the total number of items (if known).
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one logical unit completes (e.g., a file was written).
    fn item_done(&mut self, _label: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// Collects every message; handy in tests and for CLI summaries.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    pub total: usize,
    pub messages: Vec<String>,
    pub done: Vec<String>,
    pub finished: bool,
}

impl Progress for RecordingProgress {
    fn begin(&mut self, total: usize) { self.total = total; }
    fn log(&mut self, msg: &str) { self.messages.push(s!(msg)); }
    fn item_done(&mut self, label: &str) { self.done.push(s!(label)); }
    fn finish(&mut self) { self.finished = true; }
}

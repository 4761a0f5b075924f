// src/gui/progress.rs
use std::sync::{Arc, Mutex};

use crate::progress::Progress;

/// Worker-side progress sink. Writes the status line the UI thread renders.
pub struct GuiProgress {
    status: Arc<Mutex<String>>,
    done: usize,
    total: usize,
}

impl GuiProgress {
    pub fn new(status: Arc<Mutex<String>>) -> Self {
        Self { status, done: 0, total: 0 }
    }
    fn set_status(&self, msg: impl Into<String>) {
        if let Ok(mut s) = self.status.lock() {
            *s = msg.into();
        }
    }
}

impl Progress for GuiProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
    }
    fn log(&mut self, msg: &str) {
        self.set_status(s!(msg));
    }
    fn item_done(&mut self, label: &str) {
        self.done += 1;
        self.set_status(format!("Wrote {} ({}/{})", label, self.done, self.total));
    }
    fn finish(&mut self) {
        if self.total == 0 {
            self.set_status(s!("Done"));
        } else {
            self.set_status(format!("Done ({}/{})", self.done, self.total));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_items() {
        let status = Arc::new(Mutex::new(s!()));
        let mut p = GuiProgress::new(status.clone());
        p.begin(2);
        p.item_done("a.csv");
        assert_eq!(*status.lock().unwrap(), "Wrote a.csv (1/2)");
        p.item_done("b.csv");
        p.finish();
        assert_eq!(*status.lock().unwrap(), "Done (2/2)");
    }
}

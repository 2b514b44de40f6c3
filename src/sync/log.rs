use chrono::Local;
use parking_lot::Mutex;
use std::collections::VecDeque;
use tracing::info;

const MAX_LINES: usize = 500;

/// In-memory, timestamped log of sync activity. Oldest lines are dropped
/// past a fixed size.
#[derive(Debug, Default)]
pub struct SyncLog {
    lines: Mutex<VecDeque<String>>,
}

impl SyncLog {
    pub fn push(&self, msg: impl Into<String>) {
        let msg = msg.into();
        info!(target: "schooldesk::sync", "{msg}");

        let mut lines = self.lines.lock();
        if lines.len() == MAX_LINES {
            lines.pop_front();
        }
        lines.push_back(format!("[{}] {msg}", Local::now().format("%H:%M:%S")));
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_the_newest_lines() {
        let log = SyncLog::default();
        for i in 0..MAX_LINES + 3 {
            log.push(format!("line {i}"));
        }
        assert_eq!(log.len(), MAX_LINES);
        assert!(log.lines()[0].ends_with("line 3"));
    }
}

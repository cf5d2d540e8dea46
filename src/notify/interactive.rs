//! # 交互界面 sink
//!
//! 为每个文件维护一个 [`BatchEntry`]，状态变化以快照消息发送到界面线程，
//! 界面线程独占显示状态，批处理线程从不直接修改它。
//!
//! 进度 tick 只有在百分比比上次更新前进至少 [`PROGRESS_THRESHOLD`] 个点时
//! 才产生消息，避免高频 tick 塞满界面队列。
//!
//! ## 依赖关系
//! - 消息由 `utils/progress.rs` 的 `ProgressView` 消费
//! - 使用 `std::sync::mpsc` 跨线程传递

use super::Sink;
use crate::models::{BatchEntry, Event, Stage};

use std::sync::mpsc::Sender;

/// 触发界面更新的最小百分比增量
pub const PROGRESS_THRESHOLD: f64 = 0.25;

/// 发往界面线程的消息
#[derive(Debug, Clone, PartialEq)]
pub enum UiMessage {
    /// 新文件开始
    EntryAdded { index: usize, entry: BatchEntry },
    /// 条目状态变化
    EntryChanged { index: usize, entry: BatchEntry },
    /// 不属于任何条目的错误
    Notice(String),
    /// 批处理结束
    Finished,
}

/// 交互界面 sink
pub struct InteractiveSink {
    tx: Sender<UiMessage>,
    entries: Vec<BatchEntry>,
    /// 上次显示的百分比
    last_percent: f64,
    /// 当前动作（"Converting", "Writing Disc 1" ...）
    action: String,
}

impl InteractiveSink {
    pub fn new(tx: Sender<UiMessage>) -> Self {
        Self {
            tx,
            entries: Vec::new(),
            last_percent: 0.0,
            action: String::new(),
        }
    }

    fn post(&self, message: UiMessage) {
        // 界面已关闭时丢弃
        let _ = self.tx.send(message);
    }

    fn post_current(&self) {
        if let Some(entry) = self.entries.last() {
            self.post(UiMessage::EntryChanged {
                index: self.entries.len() - 1,
                entry: entry.clone(),
            });
        }
    }

    fn on_size(&mut self, size: u64) {
        let Some(entry) = self.entries.last_mut() else {
            return;
        };
        self.last_percent = 0.0;
        entry.max_progress = size;
        entry.progress = 0;
        self.post_current();
    }

    fn on_progress(&mut self, value: u64) {
        let Some(entry) = self.entries.last_mut() else {
            return;
        };
        if entry.max_progress == 0 {
            return;
        }

        let percent = value as f64 * 100.0 / entry.max_progress as f64;
        if percent - self.last_percent < PROGRESS_THRESHOLD {
            return;
        }

        entry.status = format!("{} ({:.0}%)", self.action, percent);
        entry.progress = value.min(entry.max_progress);
        self.last_percent = percent;
        self.post_current();
    }

    fn on_error(&mut self, msg: &str) {
        if self.entries.is_empty() {
            self.post(UiMessage::Notice(msg.to_string()));
            return;
        }
        let Some(entry) = self.entries.last_mut() else {
            return;
        };
        entry.status = "Error".to_string();
        entry.max_progress = 100;
        entry.progress = 100;
        entry.has_error = true;
        entry.error_message.push_str(msg);
        entry.error_message.push('\n');
        self.post_current();
    }
}

impl Sink for InteractiveSink {
    fn handle(&mut self, event: &Event) {
        match event {
            Event::FileName(path) => {
                self.entries.push(BatchEntry::new(path.clone()));
                self.last_percent = 0.0;
                self.action.clear();
                self.post(UiMessage::EntryAdded {
                    index: self.entries.len() - 1,
                    entry: BatchEntry::new(path.clone()),
                });
            }
            Event::StageStart { stage, disc } => {
                self.action = stage.action_label(*disc);
            }
            Event::StageSize { size, .. } => self.on_size(*size),
            Event::StageProgress { value, .. } => self.on_progress(*value),
            Event::StageComplete { stage } => {
                if *stage != Stage::Convert {
                    if let Some(entry) = self.entries.last_mut() {
                        entry.status = "Complete".to_string();
                        self.post_current();
                    }
                }
            }
            Event::Error(msg) => self.on_error(msg),
            // 批次结束不改动各条目，最后一个文件保留其完成或错误状态
            Event::ProcessingComplete => self.post(UiMessage::Finished),
            Event::ProcessingStart | Event::Info(_) | Event::Warning(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::mpsc::{self, Receiver};

    fn setup() -> (InteractiveSink, Receiver<UiMessage>) {
        let (tx, rx) = mpsc::channel();
        let mut sink = InteractiveSink::new(tx);
        sink.handle(&Event::FileName(PathBuf::from("game.bin")));
        sink.handle(&Event::StageStart {
            stage: Stage::Write,
            disc: Some(1),
        });
        (sink, rx)
    }

    fn size(sink: &mut InteractiveSink, size: u64) {
        sink.handle(&Event::StageSize {
            stage: Stage::Write,
            size,
        });
    }

    fn tick(sink: &mut InteractiveSink, value: u64) {
        sink.handle(&Event::StageProgress {
            stage: Stage::Write,
            value,
        });
    }

    fn changes(rx: &Receiver<UiMessage>) -> Vec<BatchEntry> {
        rx.try_iter()
            .filter_map(|m| match m {
                UiMessage::EntryChanged { entry, .. } => Some(entry),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_entry_added_on_file_name() {
        let (_sink, rx) = setup();
        let first = rx.try_recv().unwrap();
        assert_eq!(
            first,
            UiMessage::EntryAdded {
                index: 0,
                entry: BatchEntry::new(PathBuf::from("game.bin")),
            }
        );
    }

    #[test]
    fn test_progress_updates_above_threshold() {
        let (mut sink, rx) = setup();
        size(&mut sink, 200);
        tick(&mut sink, 10); // 5%
        tick(&mut sink, 20); // 10%
        tick(&mut sink, 21); // 10.5%

        let updates = changes(&rx);
        // size 重置一次 + 三次进度
        assert_eq!(updates.len(), 4);
        assert_eq!(updates[0].max_progress, 200);
        assert_eq!(updates[0].progress, 0);
        assert_eq!(updates[1].progress, 10);
        assert_eq!(updates[1].status, "Writing Disc 1 (5%)");
        assert_eq!(updates[2].progress, 20);
        assert_eq!(updates[3].progress, 21);
    }

    #[test]
    fn test_progress_below_threshold_is_dropped() {
        let (mut sink, rx) = setup();
        size(&mut sink, 1000);
        tick(&mut sink, 10); // 1.0%
        tick(&mut sink, 12); // 1.2%，增量 0.2
        tick(&mut sink, 13); // 1.3%，增量 0.3

        let updates = changes(&rx);
        let progress: Vec<u64> = updates.iter().skip(1).map(|e| e.progress).collect();
        assert_eq!(progress, vec![10, 13]);
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        let (mut sink, rx) = setup();
        size(&mut sink, 400);
        tick(&mut sink, 1); // 恰好 0.25%

        let updates = changes(&rx);
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[1].progress, 1);
    }

    #[test]
    fn test_size_event_resets_tracker() {
        let (mut sink, rx) = setup();
        size(&mut sink, 100);
        tick(&mut sink, 90);
        size(&mut sink, 100);
        tick(&mut sink, 10);

        let updates = changes(&rx);
        assert_eq!(updates.last().unwrap().progress, 10);
        assert_eq!(updates.last().unwrap().status, "Writing Disc 1 (10%)");
    }

    #[test]
    fn test_progress_clamped_to_max() {
        let (mut sink, rx) = setup();
        size(&mut sink, 50);
        tick(&mut sink, 80);

        let updates = changes(&rx);
        assert_eq!(updates.last().unwrap().progress, 50);
    }

    #[test]
    fn test_error_marks_entry_done() {
        let (mut sink, rx) = setup();
        size(&mut sink, 200);
        sink.handle(&Event::error("bad sector"));
        sink.handle(&Event::error("write failed"));

        let entry = changes(&rx).pop().unwrap();
        assert!(entry.has_error);
        assert_eq!(entry.status, "Error");
        assert_eq!(entry.progress, entry.max_progress);
        assert_eq!(entry.error_message, "bad sector\nwrite failed\n");
    }

    #[test]
    fn test_stage_complete_sets_status() {
        let (mut sink, rx) = setup();
        sink.handle(&Event::StageComplete {
            stage: Stage::Convert,
        });
        assert!(changes(&rx).is_empty());

        sink.handle(&Event::StageComplete { stage: Stage::Write });
        assert_eq!(changes(&rx).pop().unwrap().status, "Complete");
    }

    #[test]
    fn test_batch_level_error_and_finish() {
        let (tx, rx) = mpsc::channel();
        let mut sink = InteractiveSink::new(tx);
        sink.handle(&Event::error("No files matched!"));
        sink.handle(&Event::ProcessingComplete);

        let messages: Vec<UiMessage> = rx.try_iter().collect();
        assert_eq!(
            messages,
            vec![
                UiMessage::Notice("No files matched!".to_string()),
                UiMessage::Finished
            ]
        );
    }

    #[test]
    fn test_finish_keeps_last_entry_state() {
        let (mut sink, rx) = setup();
        size(&mut sink, 10);
        tick(&mut sink, 10);
        sink.handle(&Event::StageComplete { stage: Stage::Write });
        let last = changes(&rx).pop().unwrap();
        assert_eq!(last.progress, 10);
        assert_eq!(last.status, "Complete");

        sink.handle(&Event::ProcessingComplete);
        let messages: Vec<UiMessage> = rx.try_iter().collect();
        assert_eq!(messages, vec![UiMessage::Finished]);
    }

    #[test]
    fn test_updates_cross_threads() {
        let (tx, rx) = mpsc::channel();
        let ui = std::thread::spawn(move || rx.iter().collect::<Vec<UiMessage>>());

        let mut sink = InteractiveSink::new(tx);
        sink.handle(&Event::FileName(PathBuf::from("a.bin")));
        sink.handle(&Event::ProcessingComplete);
        drop(sink);

        let messages = ui.join().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1], UiMessage::Finished);
    }
}

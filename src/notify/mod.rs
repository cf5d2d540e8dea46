//! # 通知分发模块
//!
//! 处理过程产生的事件经 [`NotificationBus`] 按注册顺序同步分发给各个 sink。
//!
//! ## 功能
//! - `console`: 按 verbosity 过滤的终端输出
//! - `log`: 以时间戳命名的追加式日志文件
//! - `interactive`: 节流后通过消息通道发送到界面线程
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs`、`processing/` 和 `commands/pack.rs` 使用
//! - 使用 `models/event.rs`

pub mod console;
pub mod interactive;
pub mod log;

pub use console::ConsoleSink;
pub use interactive::{InteractiveSink, UiMessage};
pub use log::LogSink;

use crate::models::Event;

/// 事件观察者
pub trait Sink {
    fn handle(&mut self, event: &Event);
}

/// 事件总线：把一个事件依次交给所有已注册的 sink
///
/// 分发在调用线程上同步完成，不隔离 sink 的 panic。
/// sink 须在批处理开始前注册完毕。
#[derive(Default)]
pub struct NotificationBus {
    sinks: Vec<Box<dyn Sink>>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册 sink
    pub fn add(&mut self, sink: impl Sink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn notify(&mut self, event: Event) {
        self.handle(&event);
    }
}

impl Sink for NotificationBus {
    fn handle(&mut self, event: &Event) {
        for sink in &mut self.sinks {
            sink.handle(event);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Tagged {
        tag: usize,
        seen: Rc<RefCell<Vec<(usize, Event)>>>,
    }

    impl Sink for Tagged {
        fn handle(&mut self, event: &Event) {
            self.seen.borrow_mut().push((self.tag, event.clone()));
        }
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = NotificationBus::new();
        for tag in 0..3 {
            bus.add(Tagged {
                tag,
                seen: Rc::clone(&seen),
            });
        }

        bus.notify(Event::info("first"));
        bus.notify(Event::ProcessingComplete);

        let seen = seen.borrow();
        let tags: Vec<usize> = seen.iter().map(|(tag, _)| *tag).collect();
        assert_eq!(tags, vec![0, 1, 2, 0, 1, 2]);
        assert_eq!(seen[0].1, Event::info("first"));
        assert_eq!(seen[5].1, Event::ProcessingComplete);
    }

    #[test]
    fn test_empty_bus_is_noop() {
        let mut bus = NotificationBus::new();
        bus.notify(Event::ProcessingStart);
    }
}

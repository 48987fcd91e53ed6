//! 反馈事件总线：把一帧产生的反馈分发给渲染、音效、日志等订阅者。
//!
//! The simulation never calls its consumers directly. After a tick the caller
//! hands the drained [`FeedbackEvent`]s to [`EventBus::dispatch`], which
//! delivers each event to every sink in priority order. A sink that panics
//! loses that one event; the rest of the batch and the other sinks still run.

use std::collections::VecDeque;
use std::panic::{AssertUnwindSafe, catch_unwind};

use combat::{FeedbackEvent, LogLevel};
use tracing::{debug, error, info, warn};

/// 处理优先级（数字越小越先处理）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    High = 0,
    Normal = 1,
    Low = 2,
}

/// 反馈事件的消费者
pub trait FeedbackSink {
    /// 处理单个事件
    fn handle(&mut self, event: &FeedbackEvent);

    /// 名称（用于日志）
    fn name(&self) -> &str;

    fn priority(&self) -> Priority {
        Priority::Normal
    }

    /// 是否关心该事件
    fn should_handle(&self, _event: &FeedbackEvent) -> bool {
        true
    }
}

/// Counts from one [`EventBus::dispatch`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Deliver `event` to `sink`, containing any panic.
fn deliver(sink: &mut dyn FeedbackSink, event: &FeedbackEvent) -> bool {
    let result = catch_unwind(AssertUnwindSafe(|| sink.handle(event)));
    if result.is_err() {
        error!(sink = sink.name(), ?event, "feedback sink panicked");
    }
    result.is_ok()
}

/// Sinks sorted by priority plus a bounded history of dispatched events.
pub struct EventBus {
    sinks: Vec<Box<dyn FeedbackSink>>,
    history: VecDeque<FeedbackEvent>,
    max_history: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_history_size(100)
    }

    pub fn with_history_size(max_history: usize) -> Self {
        Self {
            sinks: Vec::new(),
            history: VecDeque::with_capacity(max_history),
            max_history,
        }
    }

    /// 注册订阅者，按优先级排序（同优先级保持注册顺序）
    pub fn subscribe(&mut self, sink: Box<dyn FeedbackSink>) {
        debug!(sink = sink.name(), priority = ?sink.priority(), "feedback sink registered");
        self.sinks.push(sink);
        self.sinks.sort_by_key(|s| s.priority());
    }

    pub fn subscriber_count(&self) -> usize {
        self.sinks.len()
    }

    /// Deliver `events` to one external sink.
    pub fn dispatch(events: &[FeedbackEvent], sink: &mut dyn FeedbackSink) -> DispatchReport {
        let mut report = DispatchReport::default();
        for event in events {
            if !sink.should_handle(event) {
                continue;
            }
            if deliver(sink, event) {
                report.delivered += 1;
            } else {
                report.failed += 1;
            }
        }
        report
    }

    /// Deliver `events` to every subscribed sink and record them in the history.
    pub fn publish(&mut self, events: Vec<FeedbackEvent>) -> DispatchReport {
        let mut report = DispatchReport::default();
        for sink in &mut self.sinks {
            let r = Self::dispatch(&events, sink.as_mut());
            report.delivered += r.delivered;
            report.failed += r.failed;
        }
        for event in events {
            if self.history.len() == self.max_history {
                self.history.pop_front();
            }
            self.history.push_back(event);
        }
        report
    }

    /// 最近分发的事件（旧的在前）
    pub fn history(&self) -> impl Iterator<Item = &FeedbackEvent> {
        self.history.iter()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

/// Collects every event it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<FeedbackEvent>,
}

impl FeedbackSink for RecordingSink {
    fn handle(&mut self, event: &FeedbackEvent) {
        self.events.push(event.clone());
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Forwards log lines and milestone events to `tracing`.
#[derive(Debug, Default)]
pub struct TracingSink;

impl FeedbackSink for TracingSink {
    fn handle(&mut self, event: &FeedbackEvent) {
        match event {
            FeedbackEvent::LogLine { message, level } => match level {
                LogLevel::Warning => warn!(target: "pixel_crawler::log", "{message}"),
                _ => info!(target: "pixel_crawler::log", %level, "{message}"),
            },
            FeedbackEvent::PlayerDied => warn!("the hero has fallen"),
            FeedbackEvent::LevelUp { level } => info!(level, "level up"),
            FeedbackEvent::StairsRevealed { at } => info!(x = at.x, y = at.y, "stairs revealed"),
            _ => {}
        }
    }

    fn name(&self) -> &str {
        "tracing"
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn should_handle(&self, event: &FeedbackEvent) -> bool {
        matches!(
            event,
            FeedbackEvent::LogLine { .. }
                | FeedbackEvent::PlayerDied
                | FeedbackEvent::LevelUp { .. }
                | FeedbackEvent::StairsRevealed { .. }
        )
    }
}

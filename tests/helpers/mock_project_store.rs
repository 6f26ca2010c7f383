// ==========================================
// Mock 项目存储 - 用于重算调度测试
// ==========================================

use async_trait::async_trait;
use gantt_schedule_core::engine::ProjectStore;
use gantt_schedule_core::error::{ScheduleError, ScheduleResult};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// 后端行为
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendBehavior {
    Succeed,
    Fail,
    Panic,
}

pub struct MockProjectStore {
    has_project: AtomicBool,
    calls: AtomicUsize,
    latency: Duration,
    behavior: BackendBehavior,
}

impl MockProjectStore {
    pub fn new() -> Self {
        Self::with_behavior(BackendBehavior::Succeed, Duration::ZERO)
    }

    pub fn with_behavior(behavior: BackendBehavior, latency: Duration) -> Self {
        Self {
            has_project: AtomicBool::new(true),
            calls: AtomicUsize::new(0),
            latency,
            behavior,
        }
    }

    pub fn set_has_project(&self, loaded: bool) {
        self.has_project.store(loaded, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProjectStore for MockProjectStore {
    fn has_current_project(&self) -> bool {
        self.has_project.load(Ordering::SeqCst)
    }

    async fn recalculate_critical_path(&self) -> ScheduleResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        match self.behavior {
            BackendBehavior::Succeed => Ok(()),
            BackendBehavior::Fail => Err(ScheduleError::Backend("引擎不可用".to_string())),
            BackendBehavior::Panic => panic!("mock backend panic"),
        }
    }
}

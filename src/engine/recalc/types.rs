use crate::config::SchedulerPreferences;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// 默认防抖窗口
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(600);

// ==========================================
// RecalcSchedulerConfig - 调度配置
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecalcSchedulerConfig {
    pub debounce: Duration, // 防抖窗口: 600ms
}

impl Default for RecalcSchedulerConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl From<&SchedulerPreferences> for RecalcSchedulerConfig {
    fn from(prefs: &SchedulerPreferences) -> Self {
        Self {
            debounce: Duration::from_millis(prefs.debounce_ms),
        }
    }
}

// ==========================================
// PulseFlag - 自动重算总开关
// ==========================================
/// 可共享的运行期开关（例如项目切换期间暂停自动重算）
#[derive(Debug, Clone)]
pub struct PulseFlag(Arc<AtomicBool>);

impl PulseFlag {
    pub fn new(active: bool) -> Self {
        Self(Arc::new(AtomicBool::new(active)))
    }

    pub fn set_active(&self, active: bool) {
        self.0.store(active, Ordering::Release);
    }

    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Default for PulseFlag {
    fn default() -> Self {
        Self::new(true)
    }
}

// ==========================================
// RecalcOutcome - 单次重算结果
// ==========================================

/// 跳过原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// 用户关闭了自动计算
    AutoCalculateDisabled,
    /// 运行期开关关闭
    PulseInactive,
    /// 没有加载项目
    NoCurrentProject,
    /// 已有重算在执行（丢弃，不排队）
    AlreadyRunning,
}

impl SkipReason {
    pub fn as_str(&self) -> &str {
        match self {
            SkipReason::AutoCalculateDisabled => "AUTO_CALCULATE_DISABLED",
            SkipReason::PulseInactive => "PULSE_INACTIVE",
            SkipReason::NoCurrentProject => "NO_CURRENT_PROJECT",
            SkipReason::AlreadyRunning => "ALREADY_RUNNING",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecalcOutcome {
    Completed { run_id: String, elapsed_ms: u64 },
    Failed { run_id: String, message: String },
    Skipped(SkipReason),
}

impl RecalcOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, RecalcOutcome::Completed { .. })
    }
}

// ==========================================
// RecalcStats - 调度计数
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecalcStats {
    pub scheduled: u64, // schedule() 调用次数
    pub completed: u64, // 成功次数
    pub failed: u64,    // 失败次数
    pub skipped: u64,   // 被守卫跳过次数
}

#[derive(Debug, Default)]
pub(crate) struct RecalcCounters {
    pub scheduled: AtomicU64,
    pub completed: AtomicU64,
    pub failed: AtomicU64,
    pub skipped: AtomicU64,
}

impl RecalcCounters {
    pub fn record(&self, outcome: &RecalcOutcome) {
        let counter = match outcome {
            RecalcOutcome::Completed { .. } => &self.completed,
            RecalcOutcome::Failed { .. } => &self.failed,
            RecalcOutcome::Skipped(_) => &self.skipped,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> RecalcStats {
        RecalcStats {
            scheduled: self.scheduled.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }
}

// ==========================================
// 甘特排程核心 - 关键路径自动重算
// ==========================================
// 职责: 任务变更后防抖触发外部引擎重算关键路径
// 输入: 变更事件 / schedule() 调用 + 偏好开关 + 项目存储
// 输出: 合并回任务的 is_critical 标记
// ==========================================

mod scheduler;
mod store;
mod types;

pub use scheduler::CriticalPathRecalcScheduler;
pub use store::{CriticalPathBackend, InMemoryProjectStore, ProjectStore};
pub use types::{
    PulseFlag, RecalcOutcome, RecalcSchedulerConfig, RecalcStats, SkipReason, DEFAULT_DEBOUNCE,
};

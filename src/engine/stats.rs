// ==========================================
// 甘特排程核心 - 统计聚合
// ==========================================
// 职责: 任务完成度统计 / 资源负荷统计 / 任务工时统计
// 红线: 分类互斥且穷尽
// - completed + in_progress + not_started == total（非摘要任务）
// - available + busy + overloaded == 资源数
// ==========================================

mod resource_usage;
mod task_stats;
mod task_usage;

pub use resource_usage::{ResourceUsage, ResourceUsageCalculator, ResourceUsageReport, ResourceUsageSummary};
pub use task_stats::{normalize_progress, TaskStats, TaskStatsCalculator};
pub use task_usage::{TaskUsage, TaskUsageCalculator, TaskUsageReport};

use crate::domain::task::Task;
use crate::domain::types::ProgressStatus;
use crate::perf::PerfGuard;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// 任务完成度统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub not_started: usize,
    pub critical: usize,
    pub milestones: usize,
    /// 已完成占比（0~100，取整）
    pub completed_percent: f64,
}

/// 进度归一化到 0~100
///
/// - `<= 1` 视为小数进度（0.5 → 50）
/// - 其余视为百分比
/// - NaN 视为 0，结果限制在 [0, 100]
pub fn normalize_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        return 0.0;
    }
    let percent = if progress <= 1.0 {
        progress * 100.0
    } else {
        progress
    };
    percent.clamp(0.0, 100.0)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TaskStatsCalculator {
    // 无状态
}

impl TaskStatsCalculator {
    pub fn new() -> Self {
        Self {}
    }

    /// 单个任务的进度分类
    pub fn classify(&self, task: &Task) -> ProgressStatus {
        let percent = normalize_progress(task.progress);
        if percent >= 100.0 {
            ProgressStatus::Completed
        } else if percent > 0.0 {
            ProgressStatus::InProgress
        } else {
            ProgressStatus::NotStarted
        }
    }

    /// 统计非摘要任务
    #[instrument(skip(self, tasks), fields(count = tasks.len()))]
    pub fn calculate(&self, tasks: &[Task]) -> TaskStats {
        let _perf = PerfGuard::new("task_stats", tasks.len());
        let mut stats = TaskStats::default();

        for task in tasks.iter().filter(|t| !t.is_summary) {
            stats.total += 1;
            match self.classify(task) {
                ProgressStatus::Completed => stats.completed += 1,
                ProgressStatus::InProgress => stats.in_progress += 1,
                ProgressStatus::NotStarted => stats.not_started += 1,
            }
            if task.is_critical {
                stats.critical += 1;
            }
            if task.is_milestone {
                stats.milestones += 1;
            }
        }

        if stats.total > 0 {
            stats.completed_percent =
                (stats.completed as f64 / stats.total as f64 * 100.0).round();
        }

        stats
    }
}

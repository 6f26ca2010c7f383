use crate::config::CalendarPreferences;
use crate::domain::task::Task;
use crate::domain::types::DurationUnit;
use crate::engine::calendar_math::CalendarMathService;
use crate::engine::resource_units::ResourceUnitsConverter;
use crate::perf::PerfGuard;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// 单个任务的工时使用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUsage {
    pub task_id: String,
    pub resource_count: usize,
    /// 分配单位合计（系数）
    pub total_units: f64,
    /// 实际工作时长（小时，不含中断间隙）
    pub working_hours: f64,
    /// 按日历换算的工期（天）
    pub duration_days: f64,
    /// 工作量（人·小时）= working_hours × total_units
    pub work_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUsageReport {
    pub tasks: Vec<TaskUsage>,
    pub assigned_tasks: usize,
    pub unassigned_tasks: usize,
    pub total_work_hours: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TaskUsageCalculator {
    calendar_math: CalendarMathService,
    converter: ResourceUnitsConverter,
}

impl TaskUsageCalculator {
    pub fn new(calendar_math: CalendarMathService, converter: ResourceUnitsConverter) -> Self {
        Self {
            calendar_math,
            converter,
        }
    }

    /// 计算非摘要任务的工时使用
    #[instrument(skip(self, tasks, prefs), fields(count = tasks.len()))]
    pub fn calculate(&self, tasks: &[Task], prefs: &CalendarPreferences) -> TaskUsageReport {
        let _perf = PerfGuard::new("task_usage", tasks.len());

        let usages: Vec<TaskUsage> = tasks
            .iter()
            .filter(|t| !t.is_summary)
            .map(|task| self.usage_of(task, prefs))
            .collect();

        let assigned_tasks = usages.iter().filter(|u| u.resource_count > 0).count();
        let total_work_hours: f64 = usages
            .iter()
            .map(|u| u.work_hours)
            .filter(|h| h.is_finite())
            .sum();

        TaskUsageReport {
            unassigned_tasks: usages.len() - assigned_tasks,
            assigned_tasks,
            total_work_hours,
            tasks: usages,
        }
    }

    fn usage_of(&self, task: &Task, prefs: &CalendarPreferences) -> TaskUsage {
        let total_units: f64 = task
            .resource_assignments
            .iter()
            .map(|ra| self.converter.to_coefficient(ra.units))
            .filter(|u| u.is_finite())
            .sum();

        let working_hours = self
            .calendar_math
            .task_duration(task, DurationUnit::Hours, prefs)
            .value;
        let duration_days = self
            .calendar_math
            .task_duration(task, DurationUnit::Days, prefs)
            .value;

        TaskUsage {
            task_id: task.id.clone(),
            resource_count: task.resource_assignments.len(),
            total_units,
            working_hours,
            duration_days,
            work_hours: working_hours * total_units,
        }
    }
}

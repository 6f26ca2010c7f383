// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::{DateTime, Duration, TimeZone, Utc};
use gantt_schedule_core::domain::{Resource, ResourceAssignment, Task, TaskSegment};

/// 2024-01-<d> 00:00 UTC
pub fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
}

/// 2024-01-<d> <h>:00 UTC
pub fn at(d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, d, h, 0, 0).unwrap()
}

pub fn resource(id: &str, max_units: f64) -> Resource {
    Resource::new(id, format!("资源_{}", id), max_units)
}

// ==========================================
// Task 构建器
// ==========================================

pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            task: Task::new(id, day(1), day(2)),
        }
    }

    pub fn span(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.task.start_date = start;
        self.task.end_date = end;
        self
    }

    pub fn hours(mut self, hours: i64) -> Self {
        self.task.end_date = self.task.start_date + Duration::hours(hours);
        self
    }

    pub fn segments(mut self, segments: &[(DateTime<Utc>, DateTime<Utc>)]) -> Self {
        self.task.segments = Some(
            segments
                .iter()
                .map(|(s, e)| TaskSegment::new(*s, *e))
                .collect(),
        );
        self
    }

    pub fn progress(mut self, progress: f64) -> Self {
        self.task.progress = progress;
        self
    }

    pub fn summary(mut self) -> Self {
        self.task.is_summary = true;
        self
    }

    pub fn milestone(mut self) -> Self {
        self.task.is_milestone = true;
        self
    }

    pub fn critical(mut self) -> Self {
        self.task.is_critical = true;
        self
    }

    pub fn assign(mut self, resource_id: &str, units: f64) -> Self {
        self.task
            .resource_assignments
            .push(ResourceAssignment::new(resource_id, units));
        self
    }

    pub fn build(self) -> Task {
        self.task
    }
}

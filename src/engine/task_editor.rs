// ==========================================
// 甘特排程核心 - 任务编辑入口
// ==========================================
// 职责: 把拆分 / 合并 / 移动 / 改工期写回任务，并发布变更事件
// 说明: 事件由重算调度器订阅，用于防抖触发关键路径重算
// ==========================================

use crate::config::CalendarPreferences;
use crate::domain::task::Task;
use crate::domain::types::DurationUnit;
use crate::engine::calendar_math::CalendarMathService;
use crate::engine::events::{OptionalEventPublisher, TaskMutationEvent, TaskMutationType};
use crate::engine::task_split::TaskSplitService;
use chrono::{DateTime, Duration, Utc};

const EVENT_SOURCE: &str = "task_editor";

#[derive(Clone, Default)]
pub struct TaskEditor {
    calendar_math: CalendarMathService,
    split_service: TaskSplitService,
    publisher: OptionalEventPublisher,
}

impl TaskEditor {
    pub fn new(publisher: OptionalEventPublisher) -> Self {
        Self {
            calendar_math: CalendarMathService::new(),
            split_service: TaskSplitService::new(),
            publisher,
        }
    }

    fn notify(&self, task: &Task, mutation: TaskMutationType) {
        self.publisher
            .publish(TaskMutationEvent::for_task(&task.id, mutation).with_source(EVENT_SOURCE));
    }

    /// 在 at 处插入中断
    ///
    /// # 返回
    /// - true: 任务已更新并发布事件
    pub fn split_task(&self, task: &mut Task, at: DateTime<Utc>, gap: Duration) -> bool {
        let Some(patch) = self.split_service.split(task, at, gap) else {
            return false;
        };
        task.apply(&patch);
        self.notify(task, TaskMutationType::SegmentsChanged);
        true
    }

    pub fn merge_task(&self, task: &mut Task) -> bool {
        let Some(patch) = self.split_service.merge(task) else {
            return false;
        };
        task.apply(&patch);
        self.notify(task, TaskMutationType::SegmentsChanged);
        true
    }

    /// 整体移动任务（含全部分段）
    pub fn move_task(&self, task: &mut Task, delta: Duration) -> bool {
        if delta.is_zero() {
            return false;
        }
        let (Some(start), Some(end)) = (
            task.start_date.checked_add_signed(delta),
            task.end_date.checked_add_signed(delta),
        ) else {
            tracing::warn!(task_id = %task.id, "移动超出时间范围，忽略");
            return false;
        };

        if let Some(patch) = self.split_service.shift(task, delta) {
            task.apply(&patch);
        }
        task.start_date = start;
        task.end_date = end;
        self.notify(task, TaskMutationType::TaskMoved);
        true
    }

    /// 按日历设置工期（实际工作时长）
    ///
    /// 分段任务只伸缩最后一段；最后一段会被压缩为空时拒绝
    pub fn set_duration(
        &self,
        task: &mut Task,
        value: f64,
        unit: DurationUnit,
        prefs: &CalendarPreferences,
    ) -> bool {
        if !value.is_finite() || value < 0.0 {
            return false;
        }

        if !task.is_segmented() {
            let Some(end) = self.calendar_math.add_duration(task.start_date, value, unit, prefs) else {
                return false;
            };
            if end == task.end_date {
                return false;
            }
            task.end_date = end;
            task.segments = None;
            self.notify(task, TaskMutationType::DurationChanged);
            return true;
        }

        let current_hours = self
            .calendar_math
            .task_duration(task, DurationUnit::Hours, prefs)
            .value;
        let target_hours = self.calendar_math.to_hours(value, unit, prefs);
        let Some(delta) = hours_to_duration(target_hours - current_hours) else {
            return false;
        };
        if delta.is_zero() {
            return false;
        }

        let Some(segments) = task.segments.as_mut() else {
            return false;
        };
        let Some(last) = segments.last_mut() else {
            return false;
        };
        let Some(new_end) = last.end_date.checked_add_signed(delta) else {
            return false;
        };
        if new_end <= last.start_date {
            tracing::debug!(task_id = %task.id, "工期过短，最后一段将被压缩为空，忽略");
            return false;
        }
        last.end_date = new_end;
        task.end_date = new_end;
        self.notify(task, TaskMutationType::DurationChanged);
        true
    }
}

fn hours_to_duration(hours: f64) -> Option<Duration> {
    let ms = hours * 3_600_000.0;
    if !ms.is_finite() {
        return None;
    }
    Duration::try_milliseconds(ms.round() as i64)
}

// ==========================================
// 甘特排程核心 - 任务变更事件发布
// ==========================================
// 职责: 定义任务变更事件与发布 trait，实现依赖倒置
// 说明: 编辑服务只依赖 trait，重算调度器实现 trait
// ==========================================

use crate::error::ScheduleResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ==========================================
// 任务变更类型
// ==========================================

/// 任务变更触发类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskMutationType {
    /// 任务整体移动（拖动任务条）
    TaskMoved,
    /// 工期变更
    DurationChanged,
    /// 中断拆分 / 合并
    SegmentsChanged,
    /// 资源分配变更
    ResourcesChanged,
    /// 前置任务变更
    PredecessorsChanged,
    /// 手动触发
    ManualTrigger,
}

impl TaskMutationType {
    /// 转换为字符串标识
    pub fn as_str(&self) -> &str {
        match self {
            TaskMutationType::TaskMoved => "TaskMoved",
            TaskMutationType::DurationChanged => "DurationChanged",
            TaskMutationType::SegmentsChanged => "SegmentsChanged",
            TaskMutationType::ResourcesChanged => "ResourcesChanged",
            TaskMutationType::PredecessorsChanged => "PredecessorsChanged",
            TaskMutationType::ManualTrigger => "ManualTrigger",
        }
    }
}

/// 任务变更事件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskMutationEvent {
    /// 受影响的任务
    pub task_ids: Vec<String>,
    /// 变更类型
    pub mutation: TaskMutationType,
    /// 事件来源描述
    pub source: Option<String>,
}

impl TaskMutationEvent {
    /// 单个任务的变更事件
    pub fn for_task(task_id: &str, mutation: TaskMutationType) -> Self {
        Self {
            task_ids: vec![task_id.to_string()],
            mutation,
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

// ==========================================
// 事件发布 Trait
// ==========================================

/// 任务变更事件发布者
///
/// # 实现说明
/// - `CriticalPathRecalcScheduler` 实现此 trait：每个事件重置防抖计时
pub trait TaskEventPublisher: Send + Sync {
    fn publish(&self, event: TaskMutationEvent) -> ScheduleResult<()>;
}

/// 空操作事件发布者
///
/// 用于不需要事件发布的场景（如单元测试）
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

impl TaskEventPublisher for NoOpEventPublisher {
    fn publish(&self, event: TaskMutationEvent) -> ScheduleResult<()> {
        tracing::debug!(
            "NoOpEventPublisher: 跳过事件发布 - tasks={:?}, mutation={}",
            event.task_ids,
            event.mutation.as_str()
        );
        Ok(())
    }
}

/// 可选的事件发布者包装
///
/// 简化 Option<Arc<dyn TaskEventPublisher>> 的使用；发布失败只记录日志
#[derive(Clone, Default)]
pub struct OptionalEventPublisher {
    inner: Option<Arc<dyn TaskEventPublisher>>,
}

impl OptionalEventPublisher {
    /// 创建带发布者的实例
    pub fn with_publisher(publisher: Arc<dyn TaskEventPublisher>) -> Self {
        Self {
            inner: Some(publisher),
        }
    }

    /// 创建空实例（不发布事件）
    pub fn none() -> Self {
        Self { inner: None }
    }

    /// 发布事件（如果有发布者）
    pub fn publish(&self, event: TaskMutationEvent) {
        let Some(publisher) = &self.inner else {
            return;
        };
        let mutation = event.mutation;
        if let Err(e) = publisher.publish(event) {
            tracing::warn!(mutation = mutation.as_str(), "任务变更事件发布失败: {}", e);
        }
    }

    /// 检查是否配置了发布者
    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScheduleError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingPublisher(AtomicUsize);

    impl TaskEventPublisher for CountingPublisher {
        fn publish(&self, _event: TaskMutationEvent) -> ScheduleResult<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingPublisher;

    impl TaskEventPublisher for FailingPublisher {
        fn publish(&self, _event: TaskMutationEvent) -> ScheduleResult<()> {
            Err(ScheduleError::Backend("offline".to_string()))
        }
    }

    #[test]
    fn test_event_for_task() {
        let event = TaskMutationEvent::for_task("TASK1", TaskMutationType::TaskMoved).with_source("gantt");
        assert_eq!(event.task_ids, vec!["TASK1".to_string()]);
        assert_eq!(event.source.as_deref(), Some("gantt"));
        assert_eq!(event.mutation.as_str(), "TaskMoved");
    }

    #[test]
    fn test_noop_publisher() {
        let publisher = NoOpEventPublisher;
        let result = publisher.publish(TaskMutationEvent::for_task("TASK1", TaskMutationType::ManualTrigger));
        assert!(result.is_ok());
    }

    #[test]
    fn test_optional_publisher() {
        let none = OptionalEventPublisher::none();
        assert!(!none.is_configured());
        none.publish(TaskMutationEvent::for_task("TASK1", TaskMutationType::TaskMoved));

        let counting = Arc::new(CountingPublisher(AtomicUsize::new(0)));
        let publisher = OptionalEventPublisher::with_publisher(counting.clone());
        assert!(publisher.is_configured());
        publisher.publish(TaskMutationEvent::for_task("TASK1", TaskMutationType::TaskMoved));
        publisher.publish(TaskMutationEvent::for_task("TASK2", TaskMutationType::DurationChanged));
        assert_eq!(counting.0.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_optional_publisher_swallows_errors() {
        let publisher = OptionalEventPublisher::with_publisher(Arc::new(FailingPublisher));
        publisher.publish(TaskMutationEvent::for_task("TASK1", TaskMutationType::TaskMoved));
    }
}

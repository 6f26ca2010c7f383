// ==========================================
// 甘特排程核心 - 引擎层
// ==========================================
// 职责: 日历换算 / 任务中断 / ID 方案 / 资源单位 / 统计 / 关键路径重算
// 红线: 纯计算服务不返回错误，非法输入返回 None 或 NaN
// ==========================================

pub mod calendar_math;
pub mod critical_path;
pub mod events;
pub mod id_generator;
pub mod id_remapping;
pub mod recalc;
pub mod resource_units;
pub mod stats;
pub mod task_editor;
pub mod task_split;

// 重导出核心服务
pub use calendar_math::{parse_instant, CalendarMathService, DurationValue};
pub use critical_path::{apply_critical_path, critical_path_lookup_keys, CriticalPathResult};
pub use events::{
    NoOpEventPublisher, OptionalEventPublisher, TaskEventPublisher, TaskMutationEvent,
    TaskMutationType,
};
pub use id_generator::{
    AssignmentIdGenerator, BaselineIdGenerator, ResourceIdGenerator, SequentialIdGenerator,
    TaskIdGenerator,
};
pub use id_remapping::{RemapOutcome, ResourceIdRemappingService};
pub use recalc::{
    CriticalPathBackend, CriticalPathRecalcScheduler, InMemoryProjectStore, ProjectStore,
    PulseFlag, RecalcOutcome, RecalcSchedulerConfig, RecalcStats, SkipReason,
};
pub use resource_units::{ResourceUnitsConverter, TaggedUnits, DEFAULT_PERCENT_THRESHOLD};
pub use stats::{
    ResourceUsageCalculator, ResourceUsageReport, TaskStats, TaskStatsCalculator,
    TaskUsageCalculator, TaskUsageReport,
};
pub use task_editor::TaskEditor;
pub use task_split::TaskSplitService;

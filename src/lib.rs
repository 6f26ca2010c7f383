// ==========================================
// 甘特排程核心 - 核心库
// ==========================================
// 职责: 日历感知的任务排程与分段计算
// 技术栈: Rust + tokio + serde
// 系统定位: 宿主 UI 之下的纯计算层，关键路径由外部引擎计算
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 计算服务
pub mod engine;

// 配置层 - 用户偏好
pub mod config;

// 错误类型
pub mod error;

// 日志系统
pub mod logging;

// 性能埋点
pub mod perf;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    DurationUnit, Identified, ProgressStatus, ResourceLoadStatus, UnitsRepresentation,
};

// 领域实体
pub use domain::{
    Assignment, Baseline, Resource, ResourceAssignment, Task, TaskPatch, TaskSegment,
};

// 引擎
pub use engine::{
    AssignmentIdGenerator, BaselineIdGenerator, CalendarMathService, CriticalPathRecalcScheduler,
    ResourceIdGenerator, ResourceIdRemappingService, ResourceUnitsConverter,
    ResourceUsageCalculator, SequentialIdGenerator, TaskEditor, TaskIdGenerator,
    TaskSplitService, TaskStatsCalculator, TaskUsageCalculator,
};

// 配置
pub use config::{PreferencesManager, UserPreferences};

// 错误
pub use error::{ScheduleError, ScheduleResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "gantt-schedule-core";

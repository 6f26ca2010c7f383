// ==========================================
// 甘特排程核心 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含引擎逻辑
// ==========================================

pub mod resource;
pub mod task;
pub mod types;

// 重导出核心类型
pub use resource::{Assignment, Baseline, BaselineTaskSnapshot, Resource};
pub use task::{ResourceAssignment, Task, TaskPatch, TaskSegment};
pub use types::{DurationUnit, Identified, ProgressStatus, ResourceLoadStatus, UnitsRepresentation};

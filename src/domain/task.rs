// ==========================================
// 甘特排程核心 - 任务领域模型
// ==========================================
// 职责: 任务 / 分段 / 资源分配 / 部分更新
// 红线: segments 存在时必须按时间有序且互不重叠
// ==========================================

use crate::domain::types::Identified;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// TaskSegment - 任务工作分段
// ==========================================
// 用途: 表示被中断(拆分)任务的一段连续工作区间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSegment {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl TaskSegment {
    pub fn new(start_date: DateTime<Utc>, end_date: DateTime<Utc>) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// 分段时长
    pub fn duration(&self) -> Duration {
        self.end_date - self.start_date
    }

    /// 时间点是否落在分段开区间内（边界不算）
    pub fn contains_strictly(&self, at: DateTime<Utc>) -> bool {
        self.start_date < at && at < self.end_date
    }

    /// 平移分段
    ///
    /// 超出时间范围时返回 None
    pub fn shifted(&self, delta: Duration) -> Option<Self> {
        Some(Self {
            start_date: self.start_date.checked_add_signed(delta)?,
            end_date: self.end_date.checked_add_signed(delta)?,
        })
    }
}

// ==========================================
// ResourceAssignment - 任务上的资源分配
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAssignment {
    pub resource_id: String,
    /// 分配单位（系数，1.0 = 100%；>10 的值按百分比解释）
    pub units: f64,
}

impl ResourceAssignment {
    pub fn new(resource_id: impl Into<String>, units: f64) -> Self {
        Self {
            resource_id: resource_id.into(),
            units,
        }
    }
}

// ==========================================
// Task - 任务
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    // ===== 标识与层级 =====
    pub id: String, // TASK<N>
    #[serde(default)]
    pub name: String,
    /// 层级（1 起算），level > 1 表示隶属于前面最近的 level-1 任务
    #[serde(default = "default_level")]
    pub level: u32,

    // ===== 时间 =====
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// 工作分段；None 或空表示单个连续区间
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<TaskSegment>>,

    // ===== 状态 =====
    /// 进度（0~1 小数；统计层兼容 0~100）
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub is_milestone: bool,
    #[serde(default)]
    pub is_summary: bool,
    /// 关键路径标记（由外部引擎计算）
    #[serde(default)]
    pub is_critical: bool,

    // ===== 资源与依赖 =====
    #[serde(default)]
    pub resource_assignments: Vec<ResourceAssignment>,
    #[serde(default)]
    pub predecessors: Vec<String>,
}

fn default_level() -> u32 {
    1
}

impl Task {
    /// 创建一个连续（未分段）的普通任务
    pub fn new(id: impl Into<String>, start_date: DateTime<Utc>, end_date: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            level: 1,
            start_date,
            end_date,
            segments: None,
            progress: 0.0,
            is_milestone: false,
            is_summary: false,
            is_critical: false,
            resource_assignments: Vec::new(),
            predecessors: Vec::new(),
        }
    }

    /// 是否处于分段状态（至少 2 段）
    pub fn is_segmented(&self) -> bool {
        self.segments.as_ref().map(|s| s.len() >= 2).unwrap_or(false)
    }

    /// 有效分段视图：未分段时整个任务视为一段
    pub fn effective_segments(&self) -> Vec<TaskSegment> {
        match &self.segments {
            Some(segments) if !segments.is_empty() => segments.clone(),
            _ => vec![TaskSegment::new(self.start_date, self.end_date)],
        }
    }

    /// 应用部分更新
    pub fn apply(&mut self, patch: &TaskPatch) {
        patch.apply_to(self);
    }
}

impl Identified for Task {
    fn id(&self) -> &str {
        &self.id
    }
}

// ==========================================
// TaskPatch - 任务部分更新
// ==========================================
// 说明: 服务层返回 Option<TaskPatch>，None 表示"无变化"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    /// Some(vec![]) 表示清空分段
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<TaskSegment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.segments.is_none() && self.start_date.is_none() && self.end_date.is_none()
    }

    /// 将更新写回任务
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(segments) = &self.segments {
            task.segments = Some(segments.clone());
        }
        if let Some(start_date) = self.start_date {
            task.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            task.end_date = end_date;
        }
    }
}

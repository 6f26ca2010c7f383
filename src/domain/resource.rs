// ==========================================
// 甘特排程核心 - 资源 / 分配 / 基线领域模型
// ==========================================
// 红线: 同一 (任务, 资源) 至多一条分配记录
// 红线: 基线创建后不可变
// ==========================================

use crate::domain::task::Task;
use crate::domain::types::Identified;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Resource - 资源
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String, // RES-<NNN>
    #[serde(default)]
    pub name: String,
    /// 最大可用单位（系数，1.0 = 一个全职当量；>10 按百分比解释）
    #[serde(default = "default_max_units")]
    pub max_units: f64,
}

fn default_max_units() -> f64 {
    1.0
}

impl Resource {
    pub fn new(id: impl Into<String>, name: impl Into<String>, max_units: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            max_units,
        }
    }
}

impl Identified for Resource {
    fn id(&self) -> &str {
        &self.id
    }
}

// ==========================================
// Assignment - 独立建模的资源分配
// ==========================================
// ID 由 (task_id, resource_id) 确定性生成，见 AssignmentIdGenerator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String, // ASSIGN-<task>-<resource>
    pub task_id: String,
    pub resource_id: String,
    pub units: f64,
}

impl Identified for Assignment {
    fn id(&self) -> &str {
        &self.id
    }
}

// ==========================================
// Baseline - 基线快照
// ==========================================
// 用途: 记录创建时刻的任务日期，用于偏差跟踪；字段只读
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Baseline {
    id: String, // BL-<NNN>
    name: String,
    created_at: DateTime<Utc>,
    task_snapshots: Vec<BaselineTaskSnapshot>,
}

/// 基线中单个任务的日期快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineTaskSnapshot {
    pub task_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl Baseline {
    /// 从当前任务集合捕获基线
    pub fn capture(
        id: impl Into<String>,
        name: impl Into<String>,
        created_at: DateTime<Utc>,
        tasks: &[Task],
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            created_at,
            task_snapshots: tasks
                .iter()
                .map(|t| BaselineTaskSnapshot {
                    task_id: t.id.clone(),
                    start_date: t.start_date,
                    end_date: t.end_date,
                })
                .collect(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn task_snapshots(&self) -> &[BaselineTaskSnapshot] {
        &self.task_snapshots
    }

    /// 任务结束日期相对基线的偏差（正数表示延误）
    pub fn finish_variance(&self, task: &Task) -> Option<chrono::Duration> {
        self.task_snapshots
            .iter()
            .find(|s| s.task_id == task.id)
            .map(|s| task.end_date - s.end_date)
    }
}

impl Identified for Baseline {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_baseline_finish_variance() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut task = Task::new("TASK1", start, start + Duration::days(5));
        let baseline = Baseline::capture("BL-001", "初始基线", start, std::slice::from_ref(&task));

        task.end_date = start + Duration::days(7);
        assert_eq!(baseline.finish_variance(&task), Some(Duration::days(2)));
        assert_eq!(baseline.task_snapshots().len(), 1);

        let other = Task::new("TASK9", start, start);
        assert_eq!(baseline.finish_variance(&other), None);
    }

    #[test]
    fn test_resource_default_max_units() {
        let res: Resource = serde_json::from_str(r#"{"id":"RES-001"}"#).unwrap();
        assert_eq!(res.max_units, 1.0);
    }
}

// ==========================================
// 甘特排程核心 - 实体 ID 生成器
// ==========================================
// 规则: 已有实体数字后缀最大值 + 1（不是 count + 1，也不是随机）
// 红线: 删除任意实体后再生成也不会与现存 ID 冲突
// 红线: 同一 (任务, 资源) 只能对应一个分配 ID
// ==========================================
// 格式:
// - 任务:  TASK7     （无分隔、无补零）
// - 资源:  RES-007   （3 位补零）
// - 基线:  BL-007    （3 位补零）
// - 分配:  ASSIGN-<任务>-<资源>（确定性组合键）
// ==========================================

use crate::domain::resource::Assignment;
use crate::domain::task::Task;
use crate::domain::types::Identified;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static TASK_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^TASK-?(\d+)$").expect("任务 ID 正则"));
static RESOURCE_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^RES-?(\d+)$").expect("资源 ID 正则"));
static BASELINE_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^BL-?(\d+)$").expect("基线 ID 正则"));
static ASSIGNMENT_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ASSIGN-([A-Za-z0-9_]+)-([A-Za-z0-9_]+)$").expect("分配 ID 正则")
});

// ==========================================
// SequentialIdGenerator - 顺序编号 ID 方案
// ==========================================
pub trait SequentialIdGenerator {
    /// 前缀（大写）
    const PREFIX: &'static str;
    /// 前缀与数字之间的分隔符
    const SEPARATOR: &'static str;
    /// 数字补零宽度（0 表示不补零）
    const PAD_WIDTH: usize;

    /// 识别格式：大小写不敏感，连字符可选
    fn pattern() -> &'static Regex;

    /// 解析数字后缀
    ///
    /// # 返回
    /// - None: 非本方案格式，或数字超出 u64
    fn extract_number(id: &str) -> Option<u64> {
        Self::pattern()
            .captures(id.trim())?
            .get(1)?
            .as_str()
            .parse()
            .ok()
    }

    /// 已有实体中的最大编号（无可识别 ID 时为 0）
    fn max_number<T: Identified>(existing: &[T]) -> u64 {
        existing
            .iter()
            .filter_map(|e| Self::extract_number(e.id()))
            .max()
            .unwrap_or(0)
    }

    /// 按方案格式化编号
    fn format_id(number: u64) -> String {
        format!(
            "{}{}{:0width$}",
            Self::PREFIX,
            Self::SEPARATOR,
            number,
            width = Self::PAD_WIDTH
        )
    }

    /// 生成下一个 ID
    fn generate<T: Identified>(existing: &[T]) -> String {
        Self::format_id(Self::max_number(existing).saturating_add(1))
    }

    /// 格式校验
    fn is_valid(id: &str) -> bool {
        Self::pattern().is_match(id)
    }

    /// 默认名称，与 generate 使用同一个编号，例如 "任务 8"
    fn generate_default_name<T: Identified>(existing: &[T], prefix: &str) -> String {
        format!("{} {}", prefix, Self::max_number(existing).saturating_add(1))
    }
}

/// 任务 ID 生成器
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskIdGenerator;

impl SequentialIdGenerator for TaskIdGenerator {
    const PREFIX: &'static str = "TASK";
    const SEPARATOR: &'static str = "";
    const PAD_WIDTH: usize = 0;

    fn pattern() -> &'static Regex {
        &TASK_ID_PATTERN
    }
}

/// 资源 ID 生成器
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceIdGenerator;

impl SequentialIdGenerator for ResourceIdGenerator {
    const PREFIX: &'static str = "RES";
    const SEPARATOR: &'static str = "-";
    const PAD_WIDTH: usize = 3;

    fn pattern() -> &'static Regex {
        &RESOURCE_ID_PATTERN
    }
}

/// 基线 ID 生成器
#[derive(Debug, Clone, Copy, Default)]
pub struct BaselineIdGenerator;

impl SequentialIdGenerator for BaselineIdGenerator {
    const PREFIX: &'static str = "BL";
    const SEPARATOR: &'static str = "-";
    const PAD_WIDTH: usize = 3;

    fn pattern() -> &'static Regex {
        &BASELINE_ID_PATTERN
    }
}

// ==========================================
// AssignmentIdGenerator - 分配 ID（组合键）
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignmentIdGenerator;

impl AssignmentIdGenerator {
    /// 非字母数字字符替换为 '_'
    pub fn normalize(id: &str) -> String {
        id.trim()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    }

    /// ASSIGN-{任务}-{资源}
    pub fn generate(task_id: &str, resource_id: &str) -> String {
        format!(
            "ASSIGN-{}-{}",
            Self::normalize(task_id),
            Self::normalize(resource_id)
        )
    }

    pub fn is_valid(id: &str) -> bool {
        ASSIGNMENT_ID_PATTERN.is_match(id)
    }

    /// 解析为规范化后的 (任务, 资源)
    pub fn parse(id: &str) -> Option<(String, String)> {
        let caps = ASSIGNMENT_ID_PATTERN.captures(id)?;
        Some((caps.get(1)?.as_str().to_string(), caps.get(2)?.as_str().to_string()))
    }

    /// 该 (任务, 资源) 是否已有分配
    pub fn exists(existing: &[Assignment], task_id: &str, resource_id: &str) -> bool {
        let id = Self::generate(task_id, resource_id);
        existing.iter().any(|a| a.id == id)
    }

    /// 从任务的 resourceAssignments 派生独立分配实体
    ///
    /// 同一 (任务, 资源) 重复出现时保留第一条
    pub fn derive_assignments(tasks: &[Task]) -> Vec<Assignment> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        for task in tasks {
            for ra in &task.resource_assignments {
                let id = Self::generate(&task.id, &ra.resource_id);
                if !seen.insert(id.clone()) {
                    tracing::warn!(
                        task_id = %task.id,
                        resource_id = %ra.resource_id,
                        "重复的资源分配，已忽略"
                    );
                    continue;
                }
                out.push(Assignment {
                    id,
                    task_id: task.id.clone(),
                    resource_id: ra.resource_id.clone(),
                    units: ra.units,
                });
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::ResourceAssignment;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_extract_number_variants() {
        assert_eq!(TaskIdGenerator::extract_number("TASK12"), Some(12));
        assert_eq!(TaskIdGenerator::extract_number("task-3"), Some(3));
        assert_eq!(TaskIdGenerator::extract_number("TASK-007"), Some(7));
        assert_eq!(TaskIdGenerator::extract_number("RES-001"), None);
        assert_eq!(TaskIdGenerator::extract_number("TASK"), None);
        assert_eq!(ResourceIdGenerator::extract_number("res001"), Some(1));
        assert_eq!(BaselineIdGenerator::extract_number("BL-042"), Some(42));
    }

    #[test]
    fn test_generate_formats() {
        let tasks = vec!["TASK1", "TASK6", "custom"];
        assert_eq!(TaskIdGenerator::generate(&tasks), "TASK7");

        let resources = vec!["RES-006".to_string()];
        assert_eq!(ResourceIdGenerator::generate(&resources), "RES-007");

        let empty: Vec<String> = Vec::new();
        assert_eq!(BaselineIdGenerator::generate(&empty), "BL-001");
        assert_eq!(TaskIdGenerator::generate(&empty), "TASK1");
    }

    #[test]
    fn test_generate_after_deletion_never_collides() {
        let mut ids = vec!["TASK1", "TASK2", "TASK5"];
        let next = TaskIdGenerator::generate(&ids);
        assert_eq!(next, "TASK6");

        // 删除中间的实体，不会回填空号
        ids.retain(|id| *id != "TASK2");
        assert_eq!(TaskIdGenerator::generate(&ids), "TASK6");

        // 删除最大者后生成，与剩余实体不冲突
        ids.retain(|id| *id != "TASK5");
        let regenerated = TaskIdGenerator::generate(&ids);
        assert!(!ids.contains(&regenerated.as_str()));
    }

    #[test]
    fn test_is_valid() {
        assert!(TaskIdGenerator::is_valid("TASK1"));
        assert!(TaskIdGenerator::is_valid("task-1"));
        assert!(!TaskIdGenerator::is_valid("TASK1a"));
        assert!(ResourceIdGenerator::is_valid("RES-001"));
        assert!(!ResourceIdGenerator::is_valid("RESOURCE-1"));
        assert!(BaselineIdGenerator::is_valid("BL-010"));
    }

    #[test]
    fn test_default_name_consistent_with_generate() {
        let ids = vec!["RES-002", "RES-009"];
        assert_eq!(ResourceIdGenerator::generate(&ids), "RES-010");
        assert_eq!(ResourceIdGenerator::generate_default_name(&ids, "资源"), "资源 10");
    }

    #[test]
    fn test_assignment_ids() {
        let id = AssignmentIdGenerator::generate("TASK1", "RES-001");
        assert_eq!(id, "ASSIGN-TASK1-RES_001");
        assert!(AssignmentIdGenerator::is_valid(&id));
        assert_eq!(
            AssignmentIdGenerator::parse(&id),
            Some(("TASK1".to_string(), "RES_001".to_string()))
        );
        assert!(!AssignmentIdGenerator::is_valid("ASSIGN-TASK1"));
        assert_eq!(AssignmentIdGenerator::generate("TASK1", "RES-001"), id);
    }

    #[test]
    fn test_derive_assignments_dedups_pairs() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut task = Task::new("TASK1", start, start);
        task.resource_assignments = vec![
            ResourceAssignment::new("RES-001", 1.0),
            ResourceAssignment::new("RES-001", 0.5),
            ResourceAssignment::new("RES-002", 0.5),
        ];

        let assignments = AssignmentIdGenerator::derive_assignments(&[task]);
        assert_eq!(assignments.len(), 2);
        assert_eq!(assignments[0].units, 1.0);
        assert!(AssignmentIdGenerator::exists(&assignments, "TASK1", "RES-002"));
        assert!(!AssignmentIdGenerator::exists(&assignments, "TASK2", "RES-002"));
    }
}

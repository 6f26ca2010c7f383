// ==========================================
// 甘特排程核心 - 关键路径结果合并
// ==========================================
// 职责: 将外部引擎返回的关键任务集合按 ID 合并回任务列表
// 说明: 前后端 ID 格式不一致（TASK1 / TASK-1 / TASK-001 / 1），
//       这里生成等价键集合做匹配，仅用于与外部引擎的边界，
//       不影响核心 ID 方案
// ==========================================

use crate::domain::task::Task;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::instrument;

const TASK_PREFIX: &str = "TASK";

/// TASK1 / TASK-1 / TASK-001 / 1（前缀大小写不敏感）
static TASK_KEY_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:TASK-?)?(\d+)$").expect("任务键 ID 正则"));

/// 外部引擎返回的关键路径结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalPathResult {
    /// 关键任务 ID（格式可能与前端不同）
    pub critical_task_ids: Vec<String>,
}

/// 生成某个任务 ID 的全部等价查找键（至多 5 个，去重且顺序稳定）
///
/// 例: "TASK1" → ["TASK1", "TASK-1", "TASK-001", "1"]
pub fn critical_path_lookup_keys(id: &str) -> Vec<String> {
    let trimmed = id.trim();
    let mut keys: Vec<String> = vec![trimmed.to_string()];

    // 其他前缀（M1、RES-1 等）只按原值匹配，避免与 TASK1 共用数字键
    let Some(caps) = TASK_KEY_ID.captures(trimmed) else {
        return keys;
    };

    match caps[1].parse::<u64>() {
        Ok(n) => {
            let variants = [
                format!("{}{}", TASK_PREFIX, n),
                format!("{}-{}", TASK_PREFIX, n),
                format!("{}-{:03}", TASK_PREFIX, n),
                n.to_string(),
            ];
            for k in variants {
                if !keys.contains(&k) {
                    keys.push(k);
                }
            }
        }
        Err(_) => tracing::debug!(id = trimmed, "ID 数字部分溢出，仅按原值匹配"),
    }

    keys
}

/// 合并关键路径标记
///
/// # 返回
/// - 标记发生变化的任务数
#[instrument(skip(tasks, result), fields(tasks = tasks.len(), critical = result.critical_task_ids.len()))]
pub fn apply_critical_path(tasks: &mut [Task], result: &CriticalPathResult) -> usize {
    let critical_keys: HashSet<String> = result
        .critical_task_ids
        .iter()
        .flat_map(|id| critical_path_lookup_keys(id))
        .collect();

    let mut changed = 0;
    for task in tasks.iter_mut() {
        let is_critical = critical_path_lookup_keys(&task.id)
            .iter()
            .any(|k| critical_keys.contains(k));
        if task.is_critical != is_critical {
            task.is_critical = is_critical;
            changed += 1;
        }
    }

    tracing::debug!(changed, "关键路径标记已合并");
    changed
}

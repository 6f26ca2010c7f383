// ==========================================
// 甘特排程核心 - 资源 ID 重映射
// ==========================================
// 场景: 本地新建资源使用临时 ID，同步后外部引擎下发正式 ID
// 职责: 按映射改写 resource.id 与 task.resourceAssignments[].resourceId
// 红线: 无任何变化时返回原引用（Cow::Borrowed），便于状态层跳过重绘
// ==========================================

use crate::domain::resource::Resource;
use crate::domain::task::Task;
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::instrument;

/// 重映射结果
#[derive(Debug, Clone)]
pub struct RemapOutcome<'a> {
    pub resources: Cow<'a, [Resource]>,
    pub tasks: Cow<'a, [Task]>,
}

impl<'a> RemapOutcome<'a> {
    /// 是否有任一集合发生变化
    pub fn changed(&self) -> bool {
        matches!(self.resources, Cow::Owned(_)) || matches!(self.tasks, Cow::Owned(_))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceIdRemappingService {
    // 无状态
}

impl ResourceIdRemappingService {
    pub fn new() -> Self {
        Self {}
    }

    /// 应用 {前端 ID → 后端 ID} 映射
    #[instrument(skip_all, fields(resources = resources.len(), tasks = tasks.len(), mapping = mapping.len()))]
    pub fn apply_mapping<'a>(
        &self,
        resources: &'a [Resource],
        tasks: &'a [Task],
        mapping: &HashMap<String, String>,
    ) -> RemapOutcome<'a> {
        if mapping.is_empty() {
            return RemapOutcome {
                resources: Cow::Borrowed(resources),
                tasks: Cow::Borrowed(tasks),
            };
        }

        let resources_out = if resources.iter().any(|r| mapping.contains_key(&r.id)) {
            Cow::Owned(
                resources
                    .iter()
                    .map(|r| match mapping.get(&r.id) {
                        Some(new_id) => Resource {
                            id: new_id.clone(),
                            ..r.clone()
                        },
                        None => r.clone(),
                    })
                    .collect(),
            )
        } else {
            Cow::Borrowed(resources)
        };

        let touches = |t: &Task| {
            t.resource_assignments
                .iter()
                .any(|ra| mapping.contains_key(&ra.resource_id))
        };

        let tasks_out = if tasks.iter().any(touches) {
            Cow::Owned(
                tasks
                    .iter()
                    .map(|t| {
                        let mut t = t.clone();
                        for ra in t.resource_assignments.iter_mut() {
                            if let Some(new_id) = mapping.get(&ra.resource_id) {
                                ra.resource_id = new_id.clone();
                            }
                        }
                        t
                    })
                    .collect(),
            )
        } else {
            Cow::Borrowed(tasks)
        };

        let outcome = RemapOutcome {
            resources: resources_out,
            tasks: tasks_out,
        };
        if outcome.changed() {
            tracing::info!("资源 ID 已按后端映射改写");
        }
        outcome
    }
}

use crate::domain::resource::Resource;
use crate::domain::task::Task;
use crate::domain::types::ResourceLoadStatus;
use crate::engine::resource_units::ResourceUnitsConverter;
use crate::perf::PerfGuard;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::instrument;

/// 单个资源的负荷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceUsage {
    pub resource_id: String,
    pub name: String,
    /// 已分配单位合计（系数）
    pub assigned_units: f64,
    /// 最大单位（系数）
    pub max_units: f64,
    /// 负荷比例 = assigned_units / max_units
    pub load: f64,
    pub status: ResourceLoadStatus,
    /// 分配到的任务数
    pub task_count: usize,
}

/// 资源负荷汇总
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceUsageSummary {
    pub total: usize,
    pub available: usize,
    pub busy: usize,
    pub overloaded: usize,
    /// 指向不存在资源的分配条数
    pub orphan_assignments: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceUsageReport {
    pub resources: Vec<ResourceUsage>,
    pub summary: ResourceUsageSummary,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceUsageCalculator {
    converter: ResourceUnitsConverter,
}

impl ResourceUsageCalculator {
    pub fn new(converter: ResourceUnitsConverter) -> Self {
        Self { converter }
    }

    /// 资源最大单位（系数）；非正数或 NaN 回退为 1.0
    fn effective_max_units(&self, resource: &Resource) -> f64 {
        let max = self.converter.to_coefficient(resource.max_units);
        if max.is_finite() && max > 0.0 {
            max
        } else {
            tracing::debug!(
                resource_id = %resource.id,
                max_units = resource.max_units,
                "资源最大单位无效，按 1.0 计算"
            );
            1.0
        }
    }

    /// 计算全部资源负荷（仅统计非摘要任务上的分配）
    #[instrument(skip(self, resources, tasks), fields(resources = resources.len(), tasks = tasks.len()))]
    pub fn calculate(&self, resources: &[Resource], tasks: &[Task]) -> ResourceUsageReport {
        let _perf = PerfGuard::new("resource_usage", tasks.len());

        // resource_id -> (单位合计, 任务数)
        let mut assigned: HashMap<&str, (f64, usize)> =
            resources.iter().map(|r| (r.id.as_str(), (0.0, 0))).collect();
        let mut orphan_assignments = 0;

        for task in tasks.iter().filter(|t| !t.is_summary) {
            for ra in &task.resource_assignments {
                match assigned.get_mut(ra.resource_id.as_str()) {
                    Some(entry) => {
                        let units = self.converter.to_coefficient(ra.units);
                        if units.is_finite() {
                            entry.0 += units;
                        }
                        entry.1 += 1;
                    }
                    None => orphan_assignments += 1,
                }
            }
        }

        let mut summary = ResourceUsageSummary {
            total: resources.len(),
            orphan_assignments,
            ..Default::default()
        };

        let usages: Vec<ResourceUsage> = resources
            .iter()
            .map(|resource| {
                let (assigned_units, task_count) = assigned
                    .get(resource.id.as_str())
                    .copied()
                    .unwrap_or((0.0, 0));
                let max_units = self.effective_max_units(resource);
                let load = assigned_units / max_units;
                let status = ResourceLoadStatus::from_load(load);

                match status {
                    ResourceLoadStatus::Available => summary.available += 1,
                    ResourceLoadStatus::Busy => summary.busy += 1,
                    ResourceLoadStatus::Overloaded => summary.overloaded += 1,
                }

                ResourceUsage {
                    resource_id: resource.id.clone(),
                    name: resource.name.clone(),
                    assigned_units,
                    max_units,
                    load,
                    status,
                    task_count,
                }
            })
            .collect();

        if summary.overloaded > 0 {
            tracing::info!(overloaded = summary.overloaded, "存在超负荷资源");
        }
        if orphan_assignments > 0 {
            tracing::warn!(orphan_assignments, "存在指向未知资源的分配");
        }

        ResourceUsageReport {
            resources: usages,
            summary,
        }
    }
}

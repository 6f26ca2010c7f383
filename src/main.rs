// ==========================================
// 甘特排程核心 - 命令行入口
// ==========================================
// 用法:
//   gantt-schedule-core <project.json> [preferences.json]
//
// project.json: { "tasks": [...], "resources": [...] }
// 输出: 任务统计 / 资源负荷 / 任务工时 / 下一个可用 ID（JSON）
// ==========================================

use anyhow::{Context, Result};
use gantt_schedule_core::config::PreferencesManager;
use gantt_schedule_core::engine::{
    AssignmentIdGenerator, ResourceIdGenerator, ResourceUsageCalculator, ResourceUsageReport,
    SequentialIdGenerator, TaskIdGenerator, TaskStats, TaskStatsCalculator, TaskUsageCalculator,
    TaskUsageReport,
};
use gantt_schedule_core::{logging, Resource, Task};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct ProjectSnapshot {
    tasks: Vec<Task>,
    #[serde(default)]
    resources: Vec<Resource>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectReport {
    task_stats: TaskStats,
    resource_usage: ResourceUsageReport,
    task_usage: TaskUsageReport,
    assignment_count: usize,
    next_task_id: String,
    next_resource_id: String,
}

fn main() -> Result<()> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let project_path = args
        .next()
        .map(PathBuf::from)
        .context("缺少参数: <project.json> [preferences.json]")?;

    let preferences = match args.next() {
        Some(path) => PreferencesManager::load(PathBuf::from(path))?,
        None => PreferencesManager::load_default()?,
    };
    let prefs = preferences.get()?;
    tracing::info!(
        "使用日历: {}h/天, {}h/周, {}天/月",
        prefs.calendar.hours_per_day,
        prefs.calendar.hours_per_week,
        prefs.calendar.days_per_month
    );

    let raw = std::fs::read_to_string(&project_path)
        .with_context(|| format!("无法读取项目文件: {}", project_path.display()))?;
    let project: ProjectSnapshot = serde_json::from_str(&raw)
        .with_context(|| format!("项目文件格式错误: {}", project_path.display()))?;
    tracing::info!(
        tasks = project.tasks.len(),
        resources = project.resources.len(),
        "项目已加载"
    );

    let report = ProjectReport {
        task_stats: TaskStatsCalculator::default().calculate(&project.tasks),
        resource_usage: ResourceUsageCalculator::default()
            .calculate(&project.resources, &project.tasks),
        task_usage: TaskUsageCalculator::default().calculate(&project.tasks, &prefs.calendar),
        assignment_count: AssignmentIdGenerator::derive_assignments(&project.tasks).len(),
        next_task_id: TaskIdGenerator::generate(&project.tasks),
        next_resource_id: ResourceIdGenerator::generate(&project.resources),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

// ==========================================
// 项目存储与外部关键路径引擎接口
// ==========================================

use crate::domain::task::Task;
use crate::engine::critical_path::{apply_critical_path, CriticalPathResult};
use crate::error::{ScheduleError, ScheduleResult};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// 重算调度器依赖的项目存储
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// 是否已加载项目
    fn has_current_project(&self) -> bool;

    /// 请求外部引擎重算关键路径，并将结果合并回任务
    async fn recalculate_critical_path(&self) -> ScheduleResult<()>;
}

/// 外部关键路径引擎
#[async_trait]
pub trait CriticalPathBackend: Send + Sync {
    async fn compute(&self, tasks: Vec<Task>) -> ScheduleResult<CriticalPathResult>;
}

/// 内存项目存储
///
/// 任务列表为 None 表示当前没有打开的项目
pub struct InMemoryProjectStore {
    tasks: RwLock<Option<Vec<Task>>>,
    backend: Arc<dyn CriticalPathBackend>,
}

impl InMemoryProjectStore {
    pub fn new(backend: Arc<dyn CriticalPathBackend>) -> Self {
        Self {
            tasks: RwLock::new(None),
            backend,
        }
    }

    pub async fn load(&self, tasks: Vec<Task>) {
        *self.tasks.write().await = Some(tasks);
    }

    pub async fn close(&self) {
        *self.tasks.write().await = None;
    }

    /// 当前任务快照
    pub async fn tasks(&self) -> Option<Vec<Task>> {
        self.tasks.read().await.clone()
    }

    /// 在写锁内修改单个任务
    ///
    /// # 返回
    /// - None: 未加载项目或任务不存在
    pub async fn update_task<R>(&self, task_id: &str, f: impl FnOnce(&mut Task) -> R) -> Option<R> {
        let mut guard = self.tasks.write().await;
        let task = guard.as_mut()?.iter_mut().find(|t| t.id == task_id)?;
        Some(f(task))
    }
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    fn has_current_project(&self) -> bool {
        // 写锁被占用时视为已加载，由 recalculate 阶段再确认
        match self.tasks.try_read() {
            Ok(guard) => guard.is_some(),
            Err(_) => true,
        }
    }

    async fn recalculate_critical_path(&self) -> ScheduleResult<()> {
        let snapshot = self
            .tasks
            .read()
            .await
            .clone()
            .ok_or(ScheduleError::NoCurrentProject)?;

        let result = self.backend.compute(snapshot).await?;

        let mut guard = self.tasks.write().await;
        let tasks = guard.as_mut().ok_or(ScheduleError::NoCurrentProject)?;
        let changed = apply_critical_path(tasks, &result);
        tracing::info!(changed, critical = result.critical_task_ids.len(), "关键路径已更新");
        Ok(())
    }
}

use super::store::ProjectStore;
use super::types::{
    RecalcCounters, RecalcOutcome, RecalcSchedulerConfig, RecalcStats, PulseFlag, SkipReason,
};
use crate::config::PreferencesReader;
use crate::engine::events::{TaskEventPublisher, TaskMutationEvent};
use crate::error::{ScheduleError, ScheduleResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use uuid::Uuid;

const LOG_TARGET: &str = "critical_path_recalc";

// ==========================================
// CriticalPathRecalcScheduler - 关键路径自动重算调度
// ==========================================
// 状态: Idle → (schedule) → Pending → (计时到期且守卫通过) → Recalculating → Idle
// 红线: 同一时刻至多一个重算在执行；重叠请求直接丢弃，不排队
// 红线: 失败只记录日志，不向调用方传播
// ==========================================
#[derive(Clone)]
pub struct CriticalPathRecalcScheduler {
    inner: Arc<Inner>,
}

struct Inner {
    config: RecalcSchedulerConfig,
    preferences: Arc<dyn PreferencesReader>,
    pulse: PulseFlag,
    store: Arc<dyn ProjectStore>,
    pending: Mutex<Option<JoinHandle<()>>>,
    in_progress: AtomicBool,
    counters: RecalcCounters,
}

/// 释放 in-progress 标记（含 panic 展开路径）
struct InProgressGuard<'a>(&'a AtomicBool);

impl Drop for InProgressGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl CriticalPathRecalcScheduler {
    pub fn new(
        config: RecalcSchedulerConfig,
        preferences: Arc<dyn PreferencesReader>,
        pulse: PulseFlag,
        store: Arc<dyn ProjectStore>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                preferences,
                pulse,
                store,
                pending: Mutex::new(None),
                in_progress: AtomicBool::new(false),
                counters: RecalcCounters::default(),
            }),
        }
    }

    pub fn config(&self) -> RecalcSchedulerConfig {
        self.inner.config
    }

    /// 请求一次重算：取消尚未到期的计时，重新开始计时
    ///
    /// 不在 tokio 运行时中调用时仅记录警告
    pub fn schedule(&self) {
        if let Err(e) = self.try_schedule() {
            tracing::warn!(target: LOG_TARGET, "无法安排关键路径重算: {}", e);
        }
    }

    /// 同 schedule()，但把"不在 tokio 运行时中"作为错误返回
    pub fn try_schedule(&self) -> ScheduleResult<()> {
        let handle =
            Handle::try_current().map_err(|e| ScheduleError::NoRuntime(e.to_string()))?;

        let mut pending = self.inner.lock_pending();
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        let inner = Arc::clone(&self.inner);
        let delay = self.inner.config.debounce;
        *pending = Some(handle.spawn(async move {
            tokio::time::sleep(delay).await;
            // 到期后另起任务执行，之后的 schedule()/cancel() 只能中止计时，不会中止重算
            tokio::spawn(Inner::run_isolated(inner));
        }));

        self.inner.counters.scheduled.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(target: LOG_TARGET, debounce_ms = delay.as_millis() as u64, "重算计时已重置");
        Ok(())
    }

    /// 取消尚未到期的计时；对执行中的重算无影响
    pub fn cancel(&self) {
        if let Some(previous) = self.inner.lock_pending().take() {
            previous.abort();
            tracing::debug!(target: LOG_TARGET, "已取消待执行的关键路径重算");
        }
    }

    /// 是否有尚未到期的计时
    pub fn is_pending(&self) -> bool {
        self.inner
            .lock_pending()
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// 是否有重算正在执行
    pub fn is_in_progress(&self) -> bool {
        self.inner.in_progress.load(Ordering::Acquire)
    }

    /// 跳过防抖，立即执行一次受守卫保护的重算
    ///
    /// 后端 panic 被隔离为 Failed
    pub async fn trigger_now(&self) -> RecalcOutcome {
        Inner::run_isolated(Arc::clone(&self.inner)).await
    }

    pub fn stats(&self) -> RecalcStats {
        self.inner.counters.snapshot()
    }
}

impl Inner {
    fn lock_pending(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        // 持锁区间内无 panic 点，中毒时直接沿用内部值
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_guards(&self) -> Option<SkipReason> {
        if !self.preferences.auto_calculate() {
            return Some(SkipReason::AutoCalculateDisabled);
        }
        if !self.pulse.is_active() {
            return Some(SkipReason::PulseInactive);
        }
        if !self.store.has_current_project() {
            return Some(SkipReason::NoCurrentProject);
        }
        None
    }

    /// 在独立任务中执行重算，后端 panic 记为 Failed
    ///
    /// 计时触发与 trigger_now 共用，两条路径的计数一致
    async fn run_isolated(inner: Arc<Inner>) -> RecalcOutcome {
        let worker = Arc::clone(&inner);
        match tokio::spawn(async move { worker.run_guarded().await }).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(target: LOG_TARGET, "关键路径重算任务异常终止: {}", e);
                let outcome = RecalcOutcome::Failed {
                    run_id: String::new(),
                    message: e.to_string(),
                };
                inner.counters.record(&outcome);
                outcome
            }
        }
    }

    async fn run_guarded(&self) -> RecalcOutcome {
        let outcome = self.run_once().await;
        self.counters.record(&outcome);
        outcome
    }

    async fn run_once(&self) -> RecalcOutcome {
        if let Some(reason) = self.check_guards() {
            tracing::debug!(target: LOG_TARGET, reason = reason.as_str(), "跳过关键路径重算");
            return RecalcOutcome::Skipped(reason);
        }

        if self
            .in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(target: LOG_TARGET, "已有关键路径重算在执行，本次丢弃");
            return RecalcOutcome::Skipped(SkipReason::AlreadyRunning);
        }
        let _guard = InProgressGuard(&self.in_progress);

        let run_id = Uuid::new_v4().to_string();
        let started = Instant::now();
        tracing::info!(target: LOG_TARGET, run_id = %run_id, "开始关键路径重算");

        match self.store.recalculate_critical_path().await {
            Ok(()) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                tracing::info!(target: LOG_TARGET, run_id = %run_id, elapsed_ms, "关键路径重算完成");
                RecalcOutcome::Completed { run_id, elapsed_ms }
            }
            Err(e) => {
                tracing::error!(target: LOG_TARGET, run_id = %run_id, error = %e, "关键路径重算失败");
                RecalcOutcome::Failed {
                    run_id,
                    message: e.to_string(),
                }
            }
        }
    }
}

impl TaskEventPublisher for CriticalPathRecalcScheduler {
    fn publish(&self, event: TaskMutationEvent) -> ScheduleResult<()> {
        tracing::trace!(
            target: LOG_TARGET,
            mutation = event.mutation.as_str(),
            tasks = event.task_ids.len(),
            "收到任务变更事件"
        );
        self.try_schedule()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{StaticPreferences, UserPreferences};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[derive(Default)]
    struct CountingStore {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl ProjectStore for CountingStore {
        fn has_current_project(&self) -> bool {
            true
        }

        async fn recalculate_critical_path(&self) -> ScheduleResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ScheduleError::Backend("timeout".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn scheduler(store: Arc<CountingStore>, auto_calculate: bool) -> CriticalPathRecalcScheduler {
        let mut prefs = UserPreferences::default();
        prefs.editing.auto_calculate = auto_calculate;
        CriticalPathRecalcScheduler::new(
            RecalcSchedulerConfig::default(),
            Arc::new(StaticPreferences(prefs)),
            PulseFlag::default(),
            store,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_collapses_bursts() {
        let store = Arc::new(CountingStore::default());
        let s = scheduler(store.clone(), true);

        for _ in 0..5 {
            s.schedule();
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(s.is_pending());
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(700)).await;
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
        assert!(!s.is_pending());
        assert_eq!(s.stats().scheduled, 5);
        assert_eq!(s.stats().completed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_run() {
        let store = Arc::new(CountingStore::default());
        let s = scheduler(store.clone(), true);

        s.schedule();
        s.cancel();
        tokio::time::sleep(Duration::from_millis(700)).await;
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_trigger_now_respects_auto_calculate() {
        let store = Arc::new(CountingStore::default());
        let s = scheduler(store.clone(), false);

        let outcome = s.trigger_now().await;
        assert_eq!(outcome, RecalcOutcome::Skipped(SkipReason::AutoCalculateDisabled));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_is_reported_not_propagated() {
        let store = Arc::new(CountingStore {
            fail: true,
            ..Default::default()
        });
        let s = scheduler(store.clone(), true);

        let outcome = s.trigger_now().await;
        assert!(matches!(outcome, RecalcOutcome::Failed { ref message, .. } if message.contains("timeout")));
        assert!(!s.is_in_progress());
        assert_eq!(s.stats().failed, 1);
    }

    #[test]
    fn test_schedule_outside_runtime_is_noop() {
        let s = scheduler(Arc::new(CountingStore::default()), true);
        assert!(matches!(s.try_schedule(), Err(ScheduleError::NoRuntime(_))));
        s.schedule();
        assert!(!s.is_pending());
        assert_eq!(s.stats().scheduled, 0);
    }
}

use std::sync::OnceLock;
use std::time::Instant;

static PERF_ENABLED: OnceLock<bool> = OnceLock::new();

/// 环境变量开关取值解析
pub(crate) fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

/// 是否输出性能日志
///
/// 开关：
/// - Debug 默认开启；Release 默认关闭
/// - `SCHEDULE_CORE_PERF=1` 强制开启，`SCHEDULE_CORE_PERF=0` 强制关闭
fn perf_enabled() -> bool {
    *PERF_ENABLED.get_or_init(|| match std::env::var("SCHEDULE_CORE_PERF") {
        Ok(v) => is_true(&v),
        Err(_) => cfg!(debug_assertions),
    })
}

/// 性能统计 Guard：记录 elapsed_ms + 处理条目数
///
/// 使用方式：
/// ```ignore
/// let _perf = gantt_schedule_core::perf::PerfGuard::new("resource_usage", tasks.len());
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    items: usize,
    start: Instant,
}

impl PerfGuard {
    pub fn new(op: &'static str, items: usize) -> Self {
        Self {
            op,
            items,
            start: Instant::now(),
        }
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        if !perf_enabled() {
            return;
        }
        let elapsed_us = self.start.elapsed().as_micros() as u64;

        tracing::debug!(
            target: "perf",
            op = self.op,
            items = self.items,
            elapsed_us,
            "done"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_true() {
        assert!(is_true("1"));
        assert!(is_true(" On "));
        assert!(!is_true("0"));
        assert!(!is_true("off"));
        assert!(is_true("Y"));
        assert!(!is_true(""));
    }

    #[test]
    fn test_guard_drop_does_not_panic() {
        let guard = PerfGuard::new("unit", 3);
        drop(guard);
    }
}

// ==========================================
// 甘特排程核心 - 任务中断(拆分)服务
// ==========================================
// 状态: 未分段 (无 segments / 单一连续区间) <-> 已分段 (>= 2 段)
// 操作: split 拆分 / merge 合并 / shift 整体平移
// 红线: 分段按时间有序且互不重叠
// 红线: 非法输入返回 None（无变化），绝不 panic
// ==========================================

use crate::domain::task::{Task, TaskPatch, TaskSegment};
use chrono::{DateTime, Duration, Utc};
use tracing::instrument;

// ==========================================
// TaskSplitService - 任务中断服务
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskSplitService {
    // 无状态服务
}

impl TaskSplitService {
    pub fn new() -> Self {
        Self {}
    }

    /// 在 split_date 处插入长度为 gap 的中断
    ///
    /// # 规则
    /// 1) 仅当 start < split_date < end 且 gap > 0 时有效
    /// 2) 找到开区间包含 split_date 的分段（未分段时整个任务为一段）
    /// 3) 该段拆为 [seg_start, split_date] 与 [split_date + gap, seg_end + gap]
    /// 4) 之后的分段整体后移 gap，保持各自时长
    ///
    /// # 返回
    /// - Some(patch): 新 segments + 新 end_date（最后一段结束）
    /// - None: split_date 越界 / 落在边界或中断间隙内 / gap 非正 / 结果超出时间范围
    #[instrument(skip(self, task), fields(task_id = %task.id))]
    pub fn split(
        &self,
        task: &Task,
        split_date: DateTime<Utc>,
        gap: Duration,
    ) -> Option<TaskPatch> {
        if !(task.start_date < split_date && split_date < task.end_date) {
            tracing::debug!("拆分点不在任务区间内，忽略");
            return None;
        }
        if gap <= Duration::zero() {
            tracing::debug!(gap_ms = gap.num_milliseconds(), "中断时长非正，忽略");
            return None;
        }

        let segments = task.effective_segments();
        let index = segments.iter().position(|s| s.contains_strictly(split_date))?;

        let target = segments[index];
        let mut next = Vec::with_capacity(segments.len() + 1);
        next.extend_from_slice(&segments[..index]);
        next.push(TaskSegment::new(target.start_date, split_date));
        let (Some(resume), Some(target_end)) = (
            split_date.checked_add_signed(gap),
            target.end_date.checked_add_signed(gap),
        ) else {
            tracing::debug!(gap_ms = gap.num_milliseconds(), "中断后超出时间范围，忽略");
            return None;
        };
        next.push(TaskSegment::new(resume, target_end));
        for s in &segments[index + 1..] {
            next.push(s.shifted(gap)?);
        }

        let end_date = next.last().map(|s| s.end_date)?;

        tracing::debug!(segment_count = next.len(), %end_date, "任务已拆分");
        Some(TaskPatch {
            segments: Some(next),
            end_date: Some(end_date),
            ..Default::default()
        })
    }

    /// 合并全部分段，保持实际工作时长
    ///
    /// # 返回
    /// - Some({segments: [], end_date: start + Σ分段时长}): 原本 >= 2 段
    /// - Some({segments: []}): 存在 segments 字段但不足 2 段，仅清理
    /// - None: 没有 segments 字段
    #[instrument(skip(self, task), fields(task_id = %task.id))]
    pub fn merge(&self, task: &Task) -> Option<TaskPatch> {
        let segments = task.segments.as_ref()?;

        if segments.len() <= 1 {
            return Some(TaskPatch {
                segments: Some(Vec::new()),
                ..Default::default()
            });
        }

        let total = segments
            .iter()
            .fold(Duration::zero(), |acc, s| acc + s.duration());
        let end_date = task.start_date.checked_add_signed(total)?;

        tracing::debug!(working_ms = total.num_milliseconds(), %end_date, "任务分段已合并");
        Some(TaskPatch {
            segments: Some(Vec::new()),
            end_date: Some(end_date),
            ..Default::default()
        })
    }

    /// 任务整体移动时平移所有分段
    ///
    /// 未分段任务由调用方直接平移 start_date / end_date，这里返回 None
    pub fn shift(&self, task: &Task, delta: Duration) -> Option<TaskPatch> {
        let segments = task.segments.as_ref().filter(|s| !s.is_empty())?;
        if delta.is_zero() {
            return None;
        }

        let shifted = segments
            .iter()
            .map(|s| s.shifted(delta))
            .collect::<Option<Vec<_>>>();
        let Some(shifted) = shifted else {
            tracing::debug!(delta_ms = delta.num_milliseconds(), "平移超出时间范围，忽略");
            return None;
        };

        Some(TaskPatch {
            segments: Some(shifted),
            ..Default::default()
        })
    }

    /// 校验分段不变量：每段 start <= end，且按时间有序、互不重叠
    pub fn is_well_formed(segments: &[TaskSegment]) -> bool {
        segments.iter().all(|s| s.start_date <= s.end_date)
            && segments
                .windows(2)
                .all(|w| w[0].end_date <= w[1].start_date)
    }
}

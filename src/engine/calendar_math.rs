// ==========================================
// 甘特排程核心 - 日历工期计算服务
// ==========================================
// 职责: 两个时间点之间的工期换算（小时/天/周/月）
// 换算: 天 = 小时 / 每日工时；周 = 小时 / 每周工时；
//       月 = 小时 / (每日工时 × 每月天数)
// 红线: 纯函数，相同输入必得相同输出；非法输入产生 NaN/inf，绝不 panic
// ==========================================

use crate::config::CalendarPreferences;
use crate::domain::task::Task;
use crate::domain::types::DurationUnit;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const MS_PER_HOUR: f64 = 3_600_000.0;

// ==========================================
// DurationValue - 带单位的工期
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationValue {
    pub value: f64,
    pub unit: DurationUnit,
}

impl DurationValue {
    pub fn new(value: f64, unit: DurationUnit) -> Self {
        Self { value, unit }
    }

    /// 工期为负或为零（调用方据此提示"结束早于开始"）
    pub fn is_non_positive(&self) -> bool {
        self.value <= 0.0
    }
}

impl fmt::Display for DurationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 最多保留两位小数，去掉多余的 0
        let rounded = (self.value * 100.0).round() / 100.0;
        write!(f, "{} {}", rounded, self.unit)
    }
}

// ==========================================
// CalendarMathService - 日历工期计算服务
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarMathService {
    // 无状态服务，日历作为参数传入
}

impl CalendarMathService {
    pub fn new() -> Self {
        Self {}
    }

    /// 单位对应的小时数
    pub fn hours_per_unit(&self, unit: DurationUnit, prefs: &CalendarPreferences) -> f64 {
        match unit {
            DurationUnit::Hours => 1.0,
            DurationUnit::Days => prefs.hours_per_day,
            DurationUnit::Weeks => prefs.hours_per_week,
            DurationUnit::Months => prefs.hours_per_day * prefs.days_per_month,
        }
    }

    /// 计算两个时间点之间的工期
    ///
    /// # 说明
    /// - end <= start 时返回 0 或负值，不报错
    /// - 日历参数为 0 时结果为 inf/NaN，由展示层决定如何提示
    pub fn calculate_duration(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        unit: DurationUnit,
        prefs: &CalendarPreferences,
    ) -> DurationValue {
        let hours = (end - start).num_milliseconds() as f64 / MS_PER_HOUR;
        DurationValue::new(self.from_hours(hours, unit, prefs), unit)
    }

    /// 字符串版本：解析失败时 value 为 NaN
    ///
    /// 支持 RFC 3339（`2024-01-01T08:00:00Z`）与纯日期（`2024-01-01`，按 UTC 零点）
    pub fn calculate_duration_str(
        &self,
        start: &str,
        end: &str,
        unit: DurationUnit,
        prefs: &CalendarPreferences,
    ) -> DurationValue {
        match (parse_instant(start), parse_instant(end)) {
            (Some(s), Some(e)) => self.calculate_duration(s, e, unit, prefs),
            _ => DurationValue::new(f64::NAN, unit),
        }
    }

    /// 小时数换算为指定单位
    pub fn from_hours(&self, hours: f64, unit: DurationUnit, prefs: &CalendarPreferences) -> f64 {
        hours / self.hours_per_unit(unit, prefs)
    }

    /// 指定单位换算为小时数
    pub fn to_hours(&self, value: f64, unit: DurationUnit, prefs: &CalendarPreferences) -> f64 {
        value * self.hours_per_unit(unit, prefs)
    }

    /// 单位互换（例如 3 天 → 0.6 周）
    pub fn convert(
        &self,
        value: f64,
        from: DurationUnit,
        to: DurationUnit,
        prefs: &CalendarPreferences,
    ) -> f64 {
        if from == to {
            return value;
        }
        self.from_hours(self.to_hours(value, from, prefs), to, prefs)
    }

    /// 由开始时间与工期推算结束时间（calculate_duration 的逆运算）
    ///
    /// # 返回
    /// - None: 工期非有限值或结果超出时间范围
    pub fn add_duration(
        &self,
        start: DateTime<Utc>,
        value: f64,
        unit: DurationUnit,
        prefs: &CalendarPreferences,
    ) -> Option<DateTime<Utc>> {
        let ms = self.to_hours(value, unit, prefs) * MS_PER_HOUR;
        if !ms.is_finite() {
            return None;
        }
        let delta = Duration::try_milliseconds(ms.round() as i64)?;
        start.checked_add_signed(delta)
    }

    /// 任务实际工作时长：分段求和（不含中断间隙），未分段时为整个跨度
    pub fn working_duration(&self, task: &Task) -> Duration {
        task.effective_segments()
            .iter()
            .fold(Duration::zero(), |acc, seg| acc + seg.duration())
    }

    /// 任务工期（按实际工作时长换算）
    pub fn task_duration(
        &self,
        task: &Task,
        unit: DurationUnit,
        prefs: &CalendarPreferences,
    ) -> DurationValue {
        let hours = self.working_duration(task).num_milliseconds() as f64 / MS_PER_HOUR;
        DurationValue::new(self.from_hours(hours, unit, prefs), unit)
    }
}

/// 解析时间字符串（RFC 3339 或 YYYY-MM-DD）
pub fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::TaskSegment;
    use chrono::TimeZone;

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_hours_per_day_times_three_is_three_days() {
        let svc = CalendarMathService::new();
        let prefs = CalendarPreferences::default();
        let start = at(1, 0);
        let end = start + Duration::hours((prefs.hours_per_day * 3.0) as i64);

        let d = svc.calculate_duration(start, end, DurationUnit::Days, &prefs);
        assert_eq!(d.value, 3.0);
        assert_eq!(d.unit, DurationUnit::Days);
    }

    #[test]
    fn test_weeks_and_months() {
        let svc = CalendarMathService::new();
        let prefs = CalendarPreferences::default();
        let start = at(1, 0);

        let w = svc.calculate_duration(start, start + Duration::hours(80), DurationUnit::Weeks, &prefs);
        assert_eq!(w.value, 2.0);

        let m = svc.calculate_duration(start, start + Duration::hours(160), DurationUnit::Months, &prefs);
        assert_eq!(m.value, 1.0);

        let h = svc.calculate_duration(start, start + Duration::minutes(90), DurationUnit::Hours, &prefs);
        assert_eq!(h.value, 1.5);
    }

    #[test]
    fn test_end_before_start_is_negative() {
        let svc = CalendarMathService::new();
        let prefs = CalendarPreferences::default();
        let d = svc.calculate_duration(at(2, 0), at(1, 0), DurationUnit::Hours, &prefs);
        assert_eq!(d.value, -24.0);
        assert!(d.is_non_positive());

        let zero = svc.calculate_duration(at(1, 0), at(1, 0), DurationUnit::Days, &prefs);
        assert_eq!(zero.value, 0.0);
    }

    #[test]
    fn test_deterministic() {
        let svc = CalendarMathService::new();
        let prefs = CalendarPreferences::default();
        let a = svc.calculate_duration(at(1, 3), at(9, 17), DurationUnit::Weeks, &prefs);
        let b = svc.calculate_duration(at(1, 3), at(9, 17), DurationUnit::Weeks, &prefs);
        assert_eq!(a, b);
    }

    #[test]
    fn test_malformed_input_yields_nan() {
        let svc = CalendarMathService::new();
        let prefs = CalendarPreferences::default();
        let d = svc.calculate_duration_str("not-a-date", "2024-01-02", DurationUnit::Days, &prefs);
        assert!(d.value.is_nan());

        let ok = svc.calculate_duration_str("2024-01-01", "2024-01-02T00:00:00Z", DurationUnit::Hours, &prefs);
        assert_eq!(ok.value, 24.0);
    }

    #[test]
    fn test_zero_calendar_does_not_panic() {
        let svc = CalendarMathService::new();
        let prefs = CalendarPreferences {
            hours_per_day: 0.0,
            ..Default::default()
        };
        let d = svc.calculate_duration(at(1, 0), at(1, 0), DurationUnit::Days, &prefs);
        assert!(d.value.is_nan());
        assert!(svc.add_duration(at(1, 0), 1.0, DurationUnit::Hours, &prefs).is_some());
        assert!(svc.add_duration(at(1, 0), f64::NAN, DurationUnit::Days, &prefs).is_none());
    }

    #[test]
    fn test_add_duration_inverse() {
        let svc = CalendarMathService::new();
        let prefs = CalendarPreferences::default();
        let start = at(1, 8);
        let end = svc.add_duration(start, 2.5, DurationUnit::Days, &prefs).unwrap();
        assert_eq!(end, start + Duration::hours(20));
        let back = svc.calculate_duration(start, end, DurationUnit::Days, &prefs);
        assert_eq!(back.value, 2.5);
    }

    #[test]
    fn test_convert() {
        let svc = CalendarMathService::new();
        let prefs = CalendarPreferences::default();
        assert_eq!(svc.convert(3.0, DurationUnit::Days, DurationUnit::Hours, &prefs), 24.0);
        assert_eq!(svc.convert(10.0, DurationUnit::Days, DurationUnit::Weeks, &prefs), 2.0);
        assert_eq!(svc.convert(7.0, DurationUnit::Days, DurationUnit::Days, &prefs), 7.0);
    }

    #[test]
    fn test_working_duration_excludes_gaps() {
        let svc = CalendarMathService::new();
        let mut task = Task::new("TASK1", at(1, 0), at(13, 0));
        task.segments = Some(vec![
            TaskSegment::new(at(1, 0), at(5, 0)),
            TaskSegment::new(at(7, 0), at(13, 0)),
        ]);
        assert_eq!(svc.working_duration(&task), Duration::days(10));

        let prefs = CalendarPreferences::default();
        let hours = svc.task_duration(&task, DurationUnit::Hours, &prefs);
        assert_eq!(hours.value, 240.0);
    }

    #[test]
    fn test_display() {
        let d = DurationValue::new(2.3333333, DurationUnit::Days);
        assert_eq!(d.to_string(), "2.33 days");
    }
}

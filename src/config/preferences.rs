use crate::error::{ScheduleError, ScheduleResult};
use serde::{Deserialize, Serialize};

/// 工作日历偏好（进程级配置，所有工期计算必须使用同一份）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarPreferences {
    /// 每日工作小时数
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: f64,

    /// 每周工作小时数
    #[serde(default = "default_hours_per_week")]
    pub hours_per_week: f64,

    /// 每月工作天数
    #[serde(default = "default_days_per_month")]
    pub days_per_month: f64,
}

fn default_hours_per_day() -> f64 {
    8.0
}

fn default_hours_per_week() -> f64 {
    40.0
}

fn default_days_per_month() -> f64 {
    20.0
}

impl Default for CalendarPreferences {
    fn default() -> Self {
        Self {
            hours_per_day: default_hours_per_day(),
            hours_per_week: default_hours_per_week(),
            days_per_month: default_days_per_month(),
        }
    }
}

impl CalendarPreferences {
    /// 校验日历参数
    ///
    /// 计算层对非法值不报错（产生 inf/NaN），这里在写入配置时拦截
    pub fn validate(&self) -> ScheduleResult<()> {
        check_range("calendar.hoursPerDay", self.hours_per_day, 24.0)?;
        check_range("calendar.hoursPerWeek", self.hours_per_week, 168.0)?;
        check_range("calendar.daysPerMonth", self.days_per_month, 31.0)?;
        if self.hours_per_week < self.hours_per_day {
            return Err(ScheduleError::invalid_preference(
                "calendar.hoursPerWeek",
                format!(
                    "每周工时({})不能小于每日工时({})",
                    self.hours_per_week, self.hours_per_day
                ),
            ));
        }
        Ok(())
    }
}

fn check_range(field: &str, value: f64, max: f64) -> ScheduleResult<()> {
    if !value.is_finite() || value <= 0.0 || value > max {
        return Err(ScheduleError::invalid_preference(
            field,
            format!("取值 {} 超出范围 (0, {}]", value, max),
        ));
    }
    Ok(())
}

/// 编辑偏好
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditingPreferences {
    /// 任务变更后是否自动重算关键路径
    #[serde(default = "default_auto_calculate")]
    pub auto_calculate: bool,
}

fn default_auto_calculate() -> bool {
    true
}

impl Default for EditingPreferences {
    fn default() -> Self {
        Self {
            auto_calculate: default_auto_calculate(),
        }
    }
}

/// 关键路径重算调度偏好
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerPreferences {
    /// 防抖窗口（毫秒）
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    600
}

impl Default for SchedulerPreferences {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// 用户偏好（持久化对象）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    #[serde(default)]
    pub calendar: CalendarPreferences,

    #[serde(default)]
    pub editing: EditingPreferences,

    #[serde(default)]
    pub scheduler: SchedulerPreferences,
}

impl UserPreferences {
    pub fn validate(&self) -> ScheduleResult<()> {
        self.calendar.validate()?;
        if self.scheduler.debounce_ms == 0 {
            return Err(ScheduleError::invalid_preference(
                "scheduler.debounceMs",
                "防抖窗口必须大于 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = UserPreferences::default();
        assert_eq!(prefs.calendar.hours_per_day, 8.0);
        assert_eq!(prefs.calendar.hours_per_week, 40.0);
        assert_eq!(prefs.calendar.days_per_month, 20.0);
        assert!(prefs.editing.auto_calculate);
        assert_eq!(prefs.scheduler.debounce_ms, 600);
        assert!(prefs.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let prefs: UserPreferences =
            serde_json::from_str(r#"{"calendar":{"hoursPerDay":7.5}}"#).unwrap();
        assert_eq!(prefs.calendar.hours_per_day, 7.5);
        assert_eq!(prefs.calendar.hours_per_week, 40.0);
        assert!(prefs.editing.auto_calculate);
    }

    #[test]
    fn test_validate_rejects_bad_calendar() {
        let mut prefs = UserPreferences::default();
        prefs.calendar.hours_per_day = 0.0;
        assert!(prefs.validate().is_err());

        let mut prefs = UserPreferences::default();
        prefs.calendar.hours_per_week = 4.0;
        assert!(prefs.validate().is_err());

        let mut prefs = UserPreferences::default();
        prefs.calendar.days_per_month = f64::NAN;
        assert!(prefs.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_debounce() {
        let mut prefs = UserPreferences::default();
        prefs.scheduler.debounce_ms = 0;
        assert!(prefs.validate().is_err());
    }
}

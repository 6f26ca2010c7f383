// ==========================================
// 甘特排程核心 - 领域类型定义
// ==========================================
// 工期单位 / 进度分类 / 资源负荷分类 / 单位表示
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 实体标识 (Identified)
// ==========================================
// 用途: ID 生成器按"已有实体"计算下一个编号
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for String {
    fn id(&self) -> &str {
        self
    }
}

impl Identified for &str {
    fn id(&self) -> &str {
        self
    }
}

// ==========================================
// 工期单位 (Duration Unit)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Hours,
    Days,
    Weeks,
    Months,
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationUnit::Hours => write!(f, "hours"),
            DurationUnit::Days => write!(f, "days"),
            DurationUnit::Weeks => write!(f, "weeks"),
            DurationUnit::Months => write!(f, "months"),
        }
    }
}

impl DurationUnit {
    /// 从字符串解析工期单位（兼容单复数与缩写）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "h" | "hr" | "hour" | "hours" => Some(DurationUnit::Hours),
            "d" | "day" | "days" => Some(DurationUnit::Days),
            "w" | "wk" | "week" | "weeks" => Some(DurationUnit::Weeks),
            "mo" | "mon" | "month" | "months" => Some(DurationUnit::Months),
            _ => None,
        }
    }
}

// ==========================================
// 任务进度分类 (Progress Status)
// ==========================================
// 红线: 三类互斥且穷尽（仅针对非摘要任务）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressStatus {
    NotStarted, // 0%
    InProgress, // (0%, 100%)
    Completed,  // >= 100%
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressStatus::NotStarted => write!(f, "NOT_STARTED"),
            ProgressStatus::InProgress => write!(f, "IN_PROGRESS"),
            ProgressStatus::Completed => write!(f, "COMPLETED"),
        }
    }
}

// ==========================================
// 资源负荷分类 (Resource Load Status)
// ==========================================
// 红线: 三类互斥且穷尽
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceLoadStatus {
    Available,  // load = 0
    Busy,       // 0 < load <= 1
    Overloaded, // load > 1
}

impl fmt::Display for ResourceLoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceLoadStatus::Available => write!(f, "AVAILABLE"),
            ResourceLoadStatus::Busy => write!(f, "BUSY"),
            ResourceLoadStatus::Overloaded => write!(f, "OVERLOADED"),
        }
    }
}

impl ResourceLoadStatus {
    /// 按负荷比例分类
    ///
    /// NaN 负荷视为空闲（没有可解释的分配）
    pub fn from_load(load: f64) -> Self {
        if load > 1.0 {
            ResourceLoadStatus::Overloaded
        } else if load > 0.0 {
            ResourceLoadStatus::Busy
        } else {
            ResourceLoadStatus::Available
        }
    }
}

// ==========================================
// 资源单位表示 (Units Representation)
// ==========================================
// 系数: 1.0 = 100% 分配；百分比: 100 = 100% 分配
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitsRepresentation {
    Coefficient,
    Percent,
}

impl fmt::Display for UnitsRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitsRepresentation::Coefficient => write!(f, "COEFFICIENT"),
            UnitsRepresentation::Percent => write!(f, "PERCENT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_unit_parse() {
        assert_eq!(DurationUnit::parse("Days"), Some(DurationUnit::Days));
        assert_eq!(DurationUnit::parse(" h "), Some(DurationUnit::Hours));
        assert_eq!(DurationUnit::parse("wk"), Some(DurationUnit::Weeks));
        assert_eq!(DurationUnit::parse("month"), Some(DurationUnit::Months));
        assert_eq!(DurationUnit::parse("fortnight"), None);
    }

    #[test]
    fn test_load_status_boundaries() {
        assert_eq!(ResourceLoadStatus::from_load(0.0), ResourceLoadStatus::Available);
        assert_eq!(ResourceLoadStatus::from_load(0.01), ResourceLoadStatus::Busy);
        assert_eq!(ResourceLoadStatus::from_load(1.0), ResourceLoadStatus::Busy);
        assert_eq!(ResourceLoadStatus::from_load(1.01), ResourceLoadStatus::Overloaded);
        assert_eq!(ResourceLoadStatus::from_load(f64::NAN), ResourceLoadStatus::Available);
    }

    #[test]
    fn test_duration_unit_serde() {
        let json = serde_json::to_string(&DurationUnit::Weeks).unwrap();
        assert_eq!(json, "\"weeks\"");
    }
}

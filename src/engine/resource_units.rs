// ==========================================
// 甘特排程核心 - 资源单位换算
// ==========================================
// 背景: 外部排程引擎与界面对单位的表示不一致（1.0 vs 100）
// 规则: 数值 > 阈值(默认 10) 视为百分比，否则视为系数
// 注意: 阈值推断有歧义（系数 12.0 会被误判为百分比），
//       已知表示的调用方应使用 TaggedUnits 显式标注
// ==========================================

use crate::domain::types::UnitsRepresentation;
use serde::{Deserialize, Serialize};

/// 默认判定阈值
pub const DEFAULT_PERCENT_THRESHOLD: f64 = 10.0;

// ==========================================
// TaggedUnits - 显式标注表示的单位值
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaggedUnits {
    pub value: f64,
    pub representation: UnitsRepresentation,
}

impl TaggedUnits {
    pub fn coefficient(value: f64) -> Self {
        Self {
            value,
            representation: UnitsRepresentation::Coefficient,
        }
    }

    pub fn percent(value: f64) -> Self {
        Self {
            value,
            representation: UnitsRepresentation::Percent,
        }
    }

    pub fn to_coefficient(&self) -> f64 {
        match self.representation {
            UnitsRepresentation::Coefficient => self.value,
            UnitsRepresentation::Percent => self.value / 100.0,
        }
    }

    /// 百分比（取整到 1%）
    pub fn to_percent(&self) -> f64 {
        match self.representation {
            UnitsRepresentation::Coefficient => (self.value * 100.0).round(),
            UnitsRepresentation::Percent => self.value.round(),
        }
    }
}

// ==========================================
// ResourceUnitsConverter - 资源单位换算器
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct ResourceUnitsConverter {
    threshold: f64,
}

impl Default for ResourceUnitsConverter {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_PERCENT_THRESHOLD,
        }
    }
}

impl ResourceUnitsConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 自定义阈值
    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// 按数值大小推断表示
    pub fn detect(&self, value: f64) -> UnitsRepresentation {
        if value > self.threshold {
            UnitsRepresentation::Percent
        } else {
            UnitsRepresentation::Coefficient
        }
    }

    /// 推断表示并打标签
    pub fn tag(&self, value: f64) -> TaggedUnits {
        TaggedUnits {
            value,
            representation: self.detect(value),
        }
    }

    /// 转为系数（1.0 = 100%）
    pub fn to_coefficient(&self, value: f64) -> f64 {
        self.tag(value).to_coefficient()
    }

    /// 转为百分比（100 = 100%，取整）
    pub fn to_percent(&self, value: f64) -> f64 {
        self.tag(value).to_percent()
    }

    /// a 是否大于 b（统一为系数后比较）
    pub fn is_greater(&self, a: f64, b: f64) -> bool {
        self.to_coefficient(a) > self.to_coefficient(b)
    }

    /// a - b 的百分点差（取整）
    pub fn difference_percent(&self, a: f64, b: f64) -> f64 {
        ((self.to_coefficient(a) - self.to_coefficient(b)) * 100.0).round()
    }

    /// 展示用文本，例如 "150%"
    pub fn format_percent(&self, value: f64) -> String {
        format!("{}%", self.to_percent(value))
    }
}

// ==========================================
// 甘特排程核心 - 偏好读取 Trait
// ==========================================
// 职责: 定义引擎层所需的偏好读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::preferences::{CalendarPreferences, UserPreferences};

// ==========================================
// PreferencesReader Trait
// ==========================================
// 用途: 重算调度器与统计组件注入使用
// 实现者: PreferencesManager（JSON 文件）、StaticPreferences（固定值）
pub trait PreferencesReader: Send + Sync {
    /// 是否启用自动重算关键路径（editing.autoCalculate）
    ///
    /// # 默认值
    /// - true
    fn auto_calculate(&self) -> bool;

    /// 当前工作日历
    fn calendar(&self) -> CalendarPreferences;
}

// ==========================================
// StaticPreferences - 固定偏好
// ==========================================
// 用途: 宿主直接持有偏好对象、或单元测试
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticPreferences(pub UserPreferences);

impl PreferencesReader for StaticPreferences {
    fn auto_calculate(&self) -> bool {
        self.0.editing.auto_calculate
    }

    fn calendar(&self) -> CalendarPreferences {
        self.0.calendar
    }
}

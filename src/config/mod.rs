// ==========================================
// 甘特排程核心 - 配置层
// ==========================================
// 职责: 用户偏好（工作日历 / 自动重算 / 防抖窗口）
// 存储: JSON 文件
// ==========================================

pub mod preferences;
pub mod preferences_manager;
pub mod preferences_reader;

// 重导出
pub use preferences::{CalendarPreferences, EditingPreferences, SchedulerPreferences, UserPreferences};
pub use preferences_manager::{default_preferences_path, PreferencesManager, PREFERENCES_PATH_ENV};
pub use preferences_reader::{PreferencesReader, StaticPreferences};

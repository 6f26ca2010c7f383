// ==========================================
// 甘特排程核心 - 偏好管理器
// ==========================================
// 职责: 偏好加载、查询、覆写、快照/恢复
// 存储: JSON 文件（可选；无路径时仅驻留内存）
// ==========================================

use crate::config::preferences::{CalendarPreferences, UserPreferences};
use crate::config::preferences_reader::PreferencesReader;
use crate::error::{ScheduleError, ScheduleResult};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// 偏好文件路径环境变量
pub const PREFERENCES_PATH_ENV: &str = "SCHEDULE_CORE_PREFERENCES";

/// 获取默认偏好文件路径
///
/// 优先级:
/// 1. 环境变量 SCHEDULE_CORE_PREFERENCES
/// 2. 用户配置目录/gantt-schedule-core/preferences.json
/// 3. ./preferences.json
pub fn default_preferences_path() -> PathBuf {
    if let Ok(path) = std::env::var(PREFERENCES_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    match dirs::config_dir() {
        Some(dir) => dir.join("gantt-schedule-core").join("preferences.json"),
        None => PathBuf::from("./preferences.json"),
    }
}

/// 解析偏好 JSON
///
/// 顶层必须是对象；数组等其他形态会被 serde 按字段默认值接受，这里拒绝
fn parse_preferences(raw: &str) -> ScheduleResult<UserPreferences> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        return Err(ScheduleError::invalid_preference(
            "$",
            "偏好设置必须是 JSON 对象",
        ));
    }
    Ok(serde_json::from_value(value)?)
}

// ==========================================
// PreferencesManager - 偏好管理器
// ==========================================
pub struct PreferencesManager {
    path: Option<PathBuf>,
    current: RwLock<UserPreferences>,
}

impl PreferencesManager {
    /// 创建仅驻留内存的管理器
    pub fn in_memory(preferences: UserPreferences) -> Self {
        Self {
            path: None,
            current: RwLock::new(preferences),
        }
    }

    /// 从 JSON 文件加载
    ///
    /// 文件不存在时使用默认值（首次启动），不会创建文件
    pub fn load(path: impl AsRef<Path>) -> ScheduleResult<Self> {
        let path = path.as_ref().to_path_buf();

        let preferences = if path.exists() {
            let raw = std::fs::read_to_string(&path).map_err(|e| ScheduleError::PreferencesIo {
                path: path.display().to_string(),
                source: e,
            })?;
            let prefs = parse_preferences(&raw)?;
            prefs.validate()?;
            tracing::info!(path = %path.display(), "已加载偏好设置");
            prefs
        } else {
            tracing::info!(path = %path.display(), "偏好文件不存在，使用默认值");
            UserPreferences::default()
        };

        Ok(Self {
            path: Some(path),
            current: RwLock::new(preferences),
        })
    }

    /// 从默认路径加载
    pub fn load_default() -> ScheduleResult<Self> {
        Self::load(default_preferences_path())
    }

    /// 持久化当前偏好（无路径时为空操作）
    pub fn save(&self) -> ScheduleResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let json = self.get_snapshot()?;
        let io_err = |e: std::io::Error| ScheduleError::PreferencesIo {
            path: path.display().to_string(),
            source: e,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        std::fs::write(path, json).map_err(io_err)?;

        tracing::debug!(path = %path.display(), "偏好设置已保存");
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// 当前偏好副本
    pub fn get(&self) -> ScheduleResult<UserPreferences> {
        let guard = self
            .current
            .read()
            .map_err(|e| ScheduleError::LockError(e.to_string()))?;
        Ok(*guard)
    }

    /// 整体替换偏好（先校验）
    pub fn set(&self, preferences: UserPreferences) -> ScheduleResult<()> {
        preferences.validate()?;
        let mut guard = self
            .current
            .write()
            .map_err(|e| ScheduleError::LockError(e.to_string()))?;
        *guard = preferences;
        Ok(())
    }

    /// 更新工作日历
    pub fn set_calendar(&self, calendar: CalendarPreferences) -> ScheduleResult<()> {
        let mut next = self.get()?;
        next.calendar = calendar;
        self.set(next)
    }

    /// 开关自动重算
    pub fn set_auto_calculate(&self, enabled: bool) -> ScheduleResult<()> {
        let mut next = self.get()?;
        next.editing.auto_calculate = enabled;
        tracing::info!(enabled, "自动重算关键路径开关变更");
        self.set(next)
    }

    /// 获取偏好快照（JSON）
    ///
    /// # 用途
    /// - 创建基线时记录当时使用的日历
    /// - 撤销偏好修改
    pub fn get_snapshot(&self) -> ScheduleResult<String> {
        let prefs = self.get()?;
        Ok(serde_json::to_string_pretty(&prefs)?)
    }

    /// 从快照恢复偏好
    ///
    /// # 注意
    /// - 会覆盖当前偏好，但不会自动落盘
    pub fn restore_from_snapshot(&self, snapshot_json: &str) -> ScheduleResult<()> {
        let prefs = parse_preferences(snapshot_json)?;
        self.set(prefs)
    }
}

impl PreferencesReader for PreferencesManager {
    fn auto_calculate(&self) -> bool {
        match self.current.read() {
            Ok(guard) => guard.editing.auto_calculate,
            Err(e) => {
                tracing::warn!("偏好读锁失败，按关闭自动重算处理: {}", e);
                false
            }
        }
    }

    fn calendar(&self) -> CalendarPreferences {
        match self.current.read() {
            Ok(guard) => guard.calendar,
            Err(e) => {
                tracing::warn!("偏好读锁失败，使用默认日历: {}", e);
                CalendarPreferences::default()
            }
        }
    }
}

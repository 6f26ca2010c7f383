// ==========================================
// 甘特排程核心 - 错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 纯计算服务(工期/分段/统计)不返回错误,
//       仅配置层与外部引擎边界使用 Result
// ==========================================

use thiserror::Error;

/// 排程核心错误类型
#[derive(Error, Debug)]
pub enum ScheduleError {
    // ===== 配置错误 =====
    #[error("偏好设置读写失败: path={path}, {source}")]
    PreferencesIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("偏好设置解析失败: {0}")]
    PreferencesParse(#[from] serde_json::Error),

    #[error("偏好设置值无效 (field={field}): {message}")]
    InvalidPreference { field: String, message: String },

    // ===== 外部引擎错误 =====
    #[error("关键路径重算失败: {0}")]
    Backend(String),

    #[error("当前没有加载项目")]
    NoCurrentProject,

    // ===== 运行时错误 =====
    #[error("锁获取失败: {0}")]
    LockError(String),

    #[error("未处于 tokio 运行时中: {0}")]
    NoRuntime(String),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScheduleError {
    /// 构造配置值无效错误
    pub fn invalid_preference(field: &str, message: impl Into<String>) -> Self {
        ScheduleError::InvalidPreference {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Result 类型别名
pub type ScheduleResult<T> = Result<T, ScheduleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_preference_message() {
        let err = ScheduleError::invalid_preference("hours_per_day", "必须大于 0");
        let msg = err.to_string();
        assert!(msg.contains("hours_per_day"));
        assert!(msg.contains("必须大于 0"));
    }

    #[test]
    fn test_from_anyhow() {
        let err: ScheduleError = anyhow::anyhow!("engine offline").into();
        assert_eq!(err.to_string(), "engine offline");
    }
}

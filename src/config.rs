//! 配置系统
//! 从环境变量加载所有配置，使用 Secret 包装敏感信息

use config::{Config, ConfigError, Environment};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

/// 令牌有效期默认 7 天
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址，例如 "0.0.0.0:3000"
    pub addr: String,
    /// 优雅关闭超时时间（秒）
    pub graceful_shutdown_timeout_secs: u64,
    /// 请求体大小上限（字节）
    pub body_limit_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别: trace, debug, info, warn, error
    pub level: String,
    /// 日志格式: json, pretty
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// JWT 签名密钥，必须显式配置，没有默认值
    pub jwt_secret: Secret<String>,
    /// 会话令牌有效期（秒）
    pub token_ttl_secs: u64,
    /// 非资源所有者访问时的响应策略: not_found, forbidden
    pub ownership_denial: String,
}

/// 所有权校验失败时返回给调用方的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialPolicy {
    /// 返回 404，不暴露资源是否存在
    NotFound,
    /// 返回 403
    Forbidden,
}

impl SecurityConfig {
    pub fn denial_policy(&self) -> DenialPolicy {
        match self.ownership_denial.to_lowercase().as_str() {
            "forbidden" => DenialPolicy::Forbidden,
            _ => DenialPolicy::NotFound,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
}

impl AppConfig {
    /// 从环境变量加载配置
    ///
    /// `TASKTRACK_SECURITY__JWT_SECRET` 缺失时直接返回错误，进程不应启动。
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Config::builder();

        // 添加默认配置（签名密钥除外）
        settings = settings
            .set_default("server.addr", "0.0.0.0:3000")?
            .set_default("server.graceful_shutdown_timeout_secs", 30)?
            .set_default("server.body_limit_bytes", 1024 * 1024)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?
            .set_default("security.token_ttl_secs", DEFAULT_TOKEN_TTL_SECS)?
            .set_default("security.ownership_denial", "not_found")?;

        // 从环境变量加载配置（前缀为 TASKTRACK_）
        // 不开启 try_parsing：纯数字的密钥会被当成数字解析而改变原值
        settings = settings.add_source(
            Environment::with_prefix("TASKTRACK")
                .prefix_separator("_")
                .separator("__"),
        );

        let settings = settings.build()?;
        if settings.get_string("security.jwt_secret").is_err() {
            return Err(ConfigError::Message(
                "TASKTRACK_SECURITY__JWT_SECRET is required and has no default".to_string(),
            ));
        }

        let config: AppConfig = settings.try_deserialize()?;

        // 验证配置
        config.validate()?;

        Ok(config)
    }

    /// 验证配置合法性
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 验证端口范围
        if let Some(port_str) = self.server.addr.split(':').next_back() {
            if let Ok(port) = port_str.parse::<u16>() {
                if port != 0 && port < 1024 {
                    return Err(ConfigError::Message("Server port should be >= 1024".to_string()));
                }
            }
        }

        if self.server.body_limit_bytes == 0 {
            return Err(ConfigError::Message("body_limit_bytes must be > 0".to_string()));
        }

        // 验证日志级别
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                )))
            }
        }

        // 验证日志格式
        match self.logging.format.to_lowercase().as_str() {
            "json" | "pretty" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log format: {}. Must be one of: json, pretty",
                    self.logging.format
                )))
            }
        }

        // 验证 JWT 密钥长度（至少 32 字节）
        if self.security.jwt_secret.expose_secret().len() < 32 {
            return Err(ConfigError::Message(
                "JWT secret must be at least 32 characters long".to_string(),
            ));
        }

        // 验证令牌有效期
        if self.security.token_ttl_secs < 60 || self.security.token_ttl_secs > 30 * 86400 {
            return Err(ConfigError::Message(
                "token_ttl_secs must be between 60 and 2592000 (1 minute to 30 days)".to_string(),
            ));
        }

        match self.security.ownership_denial.to_lowercase().as_str() {
            "not_found" | "forbidden" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid ownership_denial: {}. Must be one of: not_found, forbidden",
                    self.security.ownership_denial
                )))
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const SECRET: &str = "unit-test-secret-key-at-least-32-chars";

    fn clear_env() {
        for key in [
            "TASKTRACK_SERVER__ADDR",
            "TASKTRACK_LOGGING__LEVEL",
            "TASKTRACK_LOGGING__FORMAT",
            "TASKTRACK_SECURITY__JWT_SECRET",
            "TASKTRACK_SECURITY__TOKEN_TTL_SECS",
            "TASKTRACK_SECURITY__OWNERSHIP_DENIAL",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_config_defaults() {
        clear_env();
        std::env::set_var("TASKTRACK_SECURITY__JWT_SECRET", SECRET);

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.server.addr, "0.0.0.0:3000");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.security.token_ttl_secs, DEFAULT_TOKEN_TTL_SECS);
        assert_eq!(config.security.denial_policy(), DenialPolicy::NotFound);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_missing_secret_is_fatal() {
        clear_env();

        let result = AppConfig::from_env();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("JWT_SECRET"));
    }

    #[test]
    #[serial]
    fn test_short_secret_rejected() {
        clear_env();
        std::env::set_var("TASKTRACK_SECURITY__JWT_SECRET", "too-short");

        assert!(AppConfig::from_env().is_err());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_config_validation_invalid_log_level() {
        clear_env();
        std::env::set_var("TASKTRACK_SECURITY__JWT_SECRET", SECRET);
        std::env::set_var("TASKTRACK_LOGGING__LEVEL", "invalid");

        assert!(AppConfig::from_env().is_err());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_numeric_secret_kept_verbatim() {
        clear_env();
        let numeric = "123456789012345678901234567890123";
        std::env::set_var("TASKTRACK_SECURITY__JWT_SECRET", numeric);
        std::env::set_var("TASKTRACK_SECURITY__TOKEN_TTL_SECS", "3600");

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.security.jwt_secret.expose_secret(), numeric);
        assert_eq!(config.security.token_ttl_secs, 3600);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_forbidden_policy_from_env() {
        clear_env();
        std::env::set_var("TASKTRACK_SECURITY__JWT_SECRET", SECRET);
        std::env::set_var("TASKTRACK_SECURITY__OWNERSHIP_DENIAL", "forbidden");

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.security.denial_policy(), DenialPolicy::Forbidden);

        clear_env();
    }
}

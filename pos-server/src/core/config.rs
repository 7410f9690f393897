use std::path::PathBuf;
use std::time::Duration;

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 |
/// | DB_PATH | {WORK_DIR}/restaurant.db | SQLite 数据库文件 |
/// | HTTP_PORT | 3001 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (无) | 日志目录, 存在时按天滚动写文件 |
/// | WRITE_TIMEOUT_MS | 5000 | 写操作超时(毫秒), 超时结果未知 |
/// | READ_RETRY_ATTEMPTS | 3 | 读操作最大尝试次数 |
/// | SEED_MENU | true | 空库时写入默认菜单 |
/// | CART_IDLE_TIMEOUT_SECS | 7200 | 购物车空闲多久后被回收 |
/// | CART_SWEEP_INTERVAL_SECS | 60 | 空闲购物车扫描间隔 (至少 1 秒) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/pos HTTP_PORT=8080 cargo run -p pos-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// SQLite 数据库路径
    pub db_path: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// 写操作截止时间 (毫秒)
    pub write_timeout_ms: u64,
    /// 读操作最大尝试次数 (含首次)
    pub read_retry_attempts: u32,
    /// 空菜单时写入默认数据
    pub seed_menu: bool,
    /// 购物车最后一次访问后保留的秒数
    pub cart_idle_timeout_secs: u64,
    pub cart_sweep_interval_secs: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let db_path = std::env::var("DB_PATH").unwrap_or_else(|_| {
            PathBuf::from(&work_dir)
                .join("restaurant.db")
                .to_string_lossy()
                .into_owned()
        });

        Self {
            work_dir,
            db_path,
            http_port: env_parse("HTTP_PORT", 3001),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            write_timeout_ms: env_parse("WRITE_TIMEOUT_MS", 5000),
            read_retry_attempts: env_parse("READ_RETRY_ATTEMPTS", 3),
            seed_menu: env_parse("SEED_MENU", true),
            cart_idle_timeout_secs: env_parse("CART_IDLE_TIMEOUT_SECS", 7200),
            cart_sweep_interval_secs: env_parse("CART_SWEEP_INTERVAL_SECS", 60),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.db_path = PathBuf::from(&config.work_dir)
            .join("restaurant.db")
            .to_string_lossy()
            .into_owned();
        config.http_port = http_port;
        config
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    pub fn cart_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.cart_idle_timeout_secs)
    }

    /// 扫描间隔, 0 按 1 秒处理 (`tokio::time::interval` 不接受零周期)
    pub fn cart_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.cart_sweep_interval_secs.max(1))
    }

    /// 确保工作目录存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.work_dir)?;
        if let Some(parent) = PathBuf::from(&self.db_path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

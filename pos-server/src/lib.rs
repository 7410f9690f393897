//! POS Server - 餐厅点餐后端
//!
//! # 架构概述
//!
//! - **菜单** (`menu`, `db`): SQLite 存储的菜品目录，含分类与可售状态
//! - **购物车** (`carts`): 服务端持有的购物车会话
//! - **订单** (`orders`): 订单存储、状态流转、乐观并发控制
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! pos-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── carts/         # 购物车会话
//! ├── db/            # 数据库层 (迁移、仓储、种子数据)
//! ├── menu/          # 菜单只读视图
//! ├── orders/        # 订单存储与服务
//! └── utils/         # 错误、日志
//! ```

pub mod api;
pub mod carts;
pub mod core;
pub mod db;
pub mod menu;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use carts::{CartSessions, CartView};
pub use core::{Config, Server, ServerState};
pub use menu::MenuCatalog;
pub use orders::{OrderService, OrderStore};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ErrorBody, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 按配置初始化日志 (生产环境输出 JSON)
///
/// 日志目录存在时写入按天滚动的文件，否则输出到终端
pub fn setup_environment(config: &Config) {
    let json = config.is_production();
    init_logger_with_file(Some(config.log_level.as_str()), Some(json), config.log_dir.as_deref());
}

pub fn print_banner() {
    println!(
        r#"
    ____  ____  _____
   / __ \/ __ \/ ___/
  / /_/ / / / /\__ \
 / ____/ /_/ /___/ /
/_/    \____//____/
    "#
    );
}

use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::carts::CartSessions;
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::db::seed::seed_menu_if_empty;
use crate::menu::{MenuCatalog, SqliteMenuCatalog};
use crate::orders::{InMemoryOrderStore, OrderService, OrderStore, SqliteOrderStore};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，每个请求 clone 一份。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | SQLite 连接池 (菜单) |
/// | catalog | Arc<dyn MenuCatalog> | 菜单只读视图 |
/// | orders | OrderService | 订单服务 (存储 + 截止时间 + 重试) |
/// | carts | Arc<CartSessions> | 购物车会话 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SQLite)
    pub db: DbService,
    /// 菜单只读视图
    pub catalog: Arc<dyn MenuCatalog>,
    /// 订单服务
    pub orders: OrderService,
    /// 购物车会话
    pub carts: Arc<CartSessions>,
}

impl ServerState {
    /// 手动构造 (注入自定义存储)
    pub fn new(
        config: Config,
        db: DbService,
        store: Arc<dyn OrderStore>,
        catalog: Arc<dyn MenuCatalog>,
    ) -> Self {
        let orders = OrderService::from_config(store, catalog.clone(), &config);
        Self {
            config,
            db,
            catalog,
            orders,
            carts: Arc::new(CartSessions::new()),
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (DB_PATH，默认 work_dir/restaurant.db) + 迁移
    /// 3. 默认菜单 (SEED_MENU 且菜单为空)
    /// 4. 订单存储、菜单视图、购物车会话
    pub async fn initialize(config: &Config) -> Result<Self> {
        config.ensure_work_dir_structure()?;

        let db = DbService::new(&config.db_path).await?;
        Self::seed(config, &db).await?;

        let store = Arc::new(SqliteOrderStore::new(db.pool.clone()));
        let catalog = Arc::new(SqliteMenuCatalog::new(db.pool.clone()));
        Ok(Self::new(config.clone(), db, store, catalog))
    }

    /// 全内存模式: 内存 SQLite 保存菜单，订单使用 [`InMemoryOrderStore`]
    ///
    /// 用于测试和演示，进程退出后数据丢失
    pub async fn initialize_in_memory(config: &Config) -> Result<Self> {
        let db = DbService::new_in_memory().await?;
        Self::seed(config, &db).await?;

        let store = Arc::new(InMemoryOrderStore::new());
        let catalog = Arc::new(SqliteMenuCatalog::new(db.pool.clone()));
        Ok(Self::new(config.clone(), db, store, catalog))
    }

    async fn seed(config: &Config, db: &DbService) -> Result<()> {
        if config.seed_menu {
            seed_menu_if_empty(&db.pool)
                .await
                .map_err(crate::utils::AppError::from)?;
        }
        Ok(())
    }

    /// 启动后台任务: 定期回收空闲购物车
    ///
    /// 正在结账的购物车不会被回收
    pub fn start_background_tasks(&self) -> JoinHandle<()> {
        let carts = self.carts.clone();
        let idle = self.config.cart_idle_timeout();
        let period = self.config.cart_sweep_interval();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let evicted = carts.sweep_idle(idle);
                if evicted > 0 {
                    tracing::info!(evicted, open = carts.len(), "Idle cart sessions evicted");
                }
            }
        })
    }

    /// 获取数据库连接池
    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_background_sweep_evicts_idle_carts() {
        let mut config = Config::with_overrides("/tmp/pos-state-test", 0);
        config.seed_menu = false;
        config.cart_idle_timeout_secs = 0;
        config.cart_sweep_interval_secs = 1;

        let state = ServerState::initialize_in_memory(&config).await.unwrap();
        state.carts.open();
        assert_eq!(state.carts.len(), 1);

        // First tick fires immediately
        let sweeper = state.start_background_tasks();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(state.carts.is_empty());
        sweeper.abort();
    }
}

//! 订单存储集成测试 - SQLite 与内存两种实现跑同一组场景

use futures::future::join_all;
use pos_server::db::DbService;
use pos_server::orders::{InMemoryOrderStore, OrderStore, SqliteOrderStore, StoreError};
use rust_decimal::Decimal;
use shared::models::{MenuItem, Order, OrderDetails, OrderType};
use shared::order::{Cart, OrderFactory, OrderStatus};
use std::collections::HashSet;
use std::sync::Arc;
use tempfile::TempDir;

fn menu_item(id: i64, name: &str, price: i64) -> MenuItem {
    MenuItem {
        id,
        name: name.to_string(),
        description: String::new(),
        category: "Mains".to_string(),
        full_price: Decimal::from(price),
        half_price: None,
        image: String::new(),
        is_veg: true,
        available: true,
        preparation_time: 15,
        created_at: 0,
        updated_at: 0,
    }
}

fn takeout(name: &str) -> OrderDetails {
    OrderDetails {
        customer_name: name.to_string(),
        order_type: OrderType::Takeout,
        ..Default::default()
    }
}

async fn build_order(store: &dyn OrderStore, customer: &str) -> Order {
    let mut cart = Cart::new();
    cart.add(menu_item(1, "Paneer Tikka", 250)).unwrap();
    cart.add(menu_item(1, "Paneer Tikka", 250)).unwrap();
    cart.add(menu_item(2, "Butter Naan", 50)).unwrap();
    cart.set_instructions(2, Some("extra butter"));

    let sequence = store.next_order_sequence().await.unwrap();
    OrderFactory::create_order(&cart, &takeout(customer), sequence).unwrap()
}

/// 返回 (名称, 存储, 临时目录守卫)
async fn backends() -> Vec<(&'static str, Arc<dyn OrderStore>, Option<TempDir>)> {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("orders.db");
    let db = DbService::new(path.to_str().unwrap()).await.unwrap();

    vec![
        (
            "sqlite",
            Arc::new(SqliteOrderStore::new(db.pool.clone())) as Arc<dyn OrderStore>,
            Some(dir),
        ),
        ("memory", Arc::new(InMemoryOrderStore::new()), None),
    ]
}

#[tokio::test]
async fn test_insert_and_get_round_trip() {
    for (name, store, _guard) in backends().await {
        let order = build_order(store.as_ref(), "Asha").await;
        store.insert(&order).await.unwrap();

        let loaded = store.get(&order.id).await.unwrap().expect(name);
        assert_eq!(loaded.order_number, "#001", "{name}");
        assert_eq!(loaded.total, Decimal::from(550), "{name}");
        assert_eq!(loaded.items.len(), 2, "{name}");
        assert_eq!(loaded.items[0].id, format!("{}-0", order.id), "{name}");
        assert_eq!(loaded.items[0].quantity, 2, "{name}");
        assert_eq!(
            loaded.items[1].special_instructions.as_deref(),
            Some("extra butter"),
            "{name}"
        );
        assert_eq!(loaded.status, OrderStatus::New, "{name}");
        assert_eq!(loaded.version, 1, "{name}");

        assert!(store.get("missing").await.unwrap().is_none(), "{name}");
    }
}

#[tokio::test]
async fn test_list_is_newest_first() {
    for (name, store, _guard) in backends().await {
        let mut ids = Vec::new();
        for customer in ["A", "B", "C"] {
            let order = build_order(store.as_ref(), customer).await;
            store.insert(&order).await.unwrap();
            ids.push(order.id);
        }

        // Inserted last but created a minute earlier: sorts by creation time
        let mut backdated = build_order(store.as_ref(), "D").await;
        backdated.created_at -= 60_000;
        backdated.updated_at = backdated.created_at;
        store.insert(&backdated).await.unwrap();

        let listed: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();
        ids.reverse();
        ids.push(backdated.id);
        assert_eq!(listed, ids, "{name}");
    }
}

#[tokio::test]
async fn test_reads_never_see_partial_orders() {
    for (name, store, _guard) in backends().await {
        let mut orders = Vec::new();
        for i in 0..10 {
            let order = build_order(store.as_ref(), &format!("Guest {i}")).await;
            store.insert(&order).await.unwrap();
            orders.push(order);
        }

        let deletes = orders.iter().map(|o| store.delete(&o.id));
        let gets = orders.iter().map(|o| store.get(&o.id));
        let lists = (0..5).map(|_| store.list());
        let (deleted, fetched, listed) =
            tokio::join!(join_all(deletes), join_all(gets), join_all(lists));

        assert!(deleted.into_iter().all(|r| r.unwrap()), "{name}");
        for order in fetched.into_iter().filter_map(|r| r.unwrap()) {
            assert_eq!(order.items.len(), 2, "{name}");
        }
        for snapshot in listed {
            for order in snapshot.unwrap() {
                assert_eq!(order.items.len(), 2, "{name}");
            }
        }
        assert!(store.list().await.unwrap().is_empty(), "{name}");
    }
}

#[tokio::test]
async fn test_status_update_bumps_version_and_timestamp() {
    for (name, store, _guard) in backends().await {
        let order = build_order(store.as_ref(), "Ravi").await;
        store.insert(&order).await.unwrap();

        let updated = store
            .update_status(&order.id, OrderStatus::Preparing, Some(1))
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Preparing, "{name}");
        assert_eq!(updated.version, 2, "{name}");
        assert!(updated.updated_at > order.updated_at, "{name}");
        assert_eq!(updated.created_at, order.created_at, "{name}");
    }
}

#[tokio::test]
async fn test_stale_version_is_rejected() {
    for (name, store, _guard) in backends().await {
        let order = build_order(store.as_ref(), "Meera").await;
        store.insert(&order).await.unwrap();

        store
            .update_status(&order.id, OrderStatus::Preparing, Some(1))
            .await
            .unwrap();
        let err = store
            .update_status(&order.id, OrderStatus::Ready, Some(1))
            .await
            .unwrap_err();
        assert!(
            matches!(err, StoreError::VersionConflict { expected: 1, actual: 2, .. }),
            "{name}: {err:?}"
        );

        let current = store.get(&order.id).await.unwrap().unwrap();
        assert_eq!(current.status, OrderStatus::Preparing, "{name}");
    }
}

#[tokio::test]
async fn test_skipping_workflow_steps_is_rejected() {
    for (name, store, _guard) in backends().await {
        let order = build_order(store.as_ref(), "Kiran").await;
        store.insert(&order).await.unwrap();

        let err = store
            .update_status(&order.id, OrderStatus::Completed, None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::IllegalTransition(_)), "{name}: {err:?}");

        let err = store
            .update_status("missing", OrderStatus::Preparing, None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::OrderNotFound(_)), "{name}: {err:?}");
    }
}

#[tokio::test]
async fn test_concurrent_updates_with_same_version_have_one_winner() {
    for (name, store, _guard) in backends().await {
        let order = build_order(store.as_ref(), "Dev").await;
        store.insert(&order).await.unwrap();

        let attempts = (0..8).map(|_| {
            let store = store.clone();
            let id = order.id.clone();
            tokio::spawn(async move {
                store
                    .update_status(&id, OrderStatus::Preparing, Some(1))
                    .await
            })
        });
        let results: Vec<_> = join_all(attempts)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .collect();

        let winners = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1, "{name}");
        for err in results.into_iter().filter_map(Result::err) {
            assert!(matches!(err, StoreError::VersionConflict { .. }), "{name}: {err:?}");
        }

        let current = store.get(&order.id).await.unwrap().unwrap();
        assert_eq!(current.version, 2, "{name}");
    }
}

#[tokio::test]
async fn test_concurrent_order_numbers_are_unique() {
    for (name, store, _guard) in backends().await {
        let tasks = (0..50).map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.next_order_sequence().await.unwrap() })
        });
        let sequences: HashSet<i64> = join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .collect();

        assert_eq!(sequences.len(), 50, "{name}");
        assert_eq!(sequences.iter().min(), Some(&1), "{name}");
        assert_eq!(sequences.iter().max(), Some(&50), "{name}");
    }
}

#[tokio::test]
async fn test_delete_removes_order_and_items() {
    for (name, store, _guard) in backends().await {
        let order = build_order(store.as_ref(), "Nila").await;
        store.insert(&order).await.unwrap();

        assert!(store.delete(&order.id).await.unwrap(), "{name}");
        assert!(store.get(&order.id).await.unwrap().is_none(), "{name}");
        assert!(!store.delete(&order.id).await.unwrap(), "{name}");
        assert!(store.list().await.unwrap().is_empty(), "{name}");
    }
}

#[tokio::test]
async fn test_sqlite_delete_cascades_to_items() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cascade.db");
    let db = DbService::new(path.to_str().unwrap()).await.unwrap();
    let store = SqliteOrderStore::new(db.pool.clone());

    let order = build_order(&store, "Isha").await;
    store.insert(&order).await.unwrap();
    store.delete(&order.id).await.unwrap();

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items WHERE order_id = ?")
        .bind(&order.id)
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

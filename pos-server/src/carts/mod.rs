//! Server-held cart sessions
//!
//! One `Cart` per session id. Each cart sits behind its own mutex so taps on
//! the same cart apply one after another, while different carts never
//! contend. A cart lock is never held across an `.await`.
//!
//! Only one checkout per cart may be in flight; a second one gets
//! `CheckoutInProgress` until the first finishes. Sessions untouched for
//! longer than the idle timeout are dropped by [`CartSessions::sweep_idle`].

use crate::utils::{AppError, AppResult, ErrorCode};
use dashmap::DashMap;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::order::{Cart, CartLine};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Cart as returned by the API
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub id: Uuid,
    pub lines: Vec<CartLine>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub item_count: u32,
}

impl CartView {
    fn new(id: Uuid, cart: &Cart) -> Self {
        Self {
            id,
            lines: cart.lines().to_vec(),
            total: cart.total(),
            item_count: cart.item_count(),
        }
    }
}

#[derive(Debug)]
struct Session {
    cart: Cart,
    checking_out: bool,
    touched: Instant,
}

impl Session {
    fn new() -> Self {
        Self {
            cart: Cart::new(),
            checking_out: false,
            touched: Instant::now(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CartSessions {
    carts: DashMap<Uuid, Arc<Mutex<Session>>>,
}

impl CartSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an empty cart and return its session id
    pub fn open(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.carts.insert(id, Arc::new(Mutex::new(Session::new())));
        tracing::debug!(cart_id = %id, "Cart session opened");
        id
    }

    /// Drop a session. Returns whether it existed.
    pub fn discard(&self, id: Uuid) -> bool {
        self.carts.remove(&id).is_some()
    }

    /// Number of open sessions
    pub fn len(&self) -> usize {
        self.carts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.carts.is_empty()
    }

    fn handle(&self, id: Uuid) -> AppResult<Arc<Mutex<Session>>> {
        // Clone the Arc out so the shard lock is released before locking the cart
        self.carts
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| AppError::cart_not_found(id.to_string()))
    }

    /// Run `f` against the cart under its lock
    pub fn with_cart<R>(&self, id: Uuid, f: impl FnOnce(&mut Cart) -> R) -> AppResult<R> {
        let handle = self.handle(id)?;
        let mut session = handle.lock();
        session.touched = Instant::now();
        Ok(f(&mut session.cart))
    }

    /// Apply a fallible mutation and return the resulting view
    pub fn mutate<E>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Cart) -> Result<(), E>,
    ) -> AppResult<CartView>
    where
        AppError: From<E>,
    {
        self.with_cart(id, |cart| -> AppResult<CartView> {
            f(cart)?;
            Ok(CartView::new(id, cart))
        })?
    }

    pub fn view(&self, id: Uuid) -> AppResult<CartView> {
        self.with_cart(id, |cart| CartView::new(id, cart))
    }

    /// Claim the cart for checkout and copy its contents.
    ///
    /// The claim is released when the returned guard drops, whether or not
    /// the order was placed.
    pub fn begin_checkout(&self, id: Uuid) -> AppResult<Checkout> {
        let handle = self.handle(id)?;
        let snapshot = {
            let mut session = handle.lock();
            if session.checking_out {
                return Err(AppError::with_message(
                    ErrorCode::CheckoutInProgress,
                    format!("Cart {id} is already being checked out"),
                )
                .with_detail("cart_id", id.to_string()));
            }
            session.checking_out = true;
            session.touched = Instant::now();
            session.cart.clone()
        };
        Ok(Checkout {
            session: handle,
            snapshot,
        })
    }

    /// Drop sessions idle for at least `max_idle`. Carts that are locked or
    /// mid-checkout are kept. Returns how many were evicted.
    pub fn sweep_idle(&self, max_idle: Duration) -> usize {
        self.sweep_idle_at(Instant::now(), max_idle)
    }

    fn sweep_idle_at(&self, now: Instant, max_idle: Duration) -> usize {
        let mut evicted = 0;
        self.carts.retain(|_, handle| {
            let keep = match handle.try_lock() {
                Some(session) => {
                    session.checking_out
                        || now.saturating_duration_since(session.touched) < max_idle
                }
                None => true,
            };
            if !keep {
                evicted += 1;
            }
            keep
        });
        evicted
    }
}

/// An in-flight checkout holding the cart's claim
#[derive(Debug)]
pub struct Checkout {
    session: Arc<Mutex<Session>>,
    snapshot: Cart,
}

impl Checkout {
    /// Contents of the cart when checkout began
    pub fn cart(&self) -> &Cart {
        &self.snapshot
    }

    /// Remove what went into the order from the live cart. Lines added after
    /// checkout began survive.
    pub fn settle(self) {
        let mut session = self.session.lock();
        for line in self.snapshot.lines() {
            session.cart.reduce(line.menu_item.id, line.quantity);
        }
    }
}

impl Drop for Checkout {
    fn drop(&mut self) {
        self.session.lock().checking_out = false;
    }
}

//! Checkout Module
//!
//! Turns one seller's slice of a buyer's cart into one order. The steps
//! run in a fixed sequence:
//!
//! 1. validate the delivery method and inputs
//! 2. price the lines (pure)
//! 3. charge the buyer through the payment gateway
//! 4. snapshot the lines and create the order in `PENDING`
//! 5. clear that seller's lines from the cart
//!
//! A failure at or before step 3 leaves cart and orders untouched. After
//! the order exists (step 4) the checkout is committed: a failure clearing
//! the cart is logged and the order is still returned.

use std::sync::Arc;

use shared::models::{DeliveryMethod, OrderLine, PricingBreakdown};
use shared::{ApiError, ApiResult};

use crate::auth::{Actor, CartIdentity};
use crate::cart::CartService;
use crate::core::ServerState;
use crate::db::models::Order;
use crate::db::repository::OrderRepository;
use crate::pricing::{compute_checkout, validate_delivery};
use crate::services::PaymentGateway;
use crate::utils::time::now_millis;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};

pub struct CheckoutService {
    cart: CartService,
    orders: OrderRepository,
    payments: Arc<dyn PaymentGateway>,
}

impl CheckoutService {
    pub fn new(state: &ServerState) -> Self {
        Self {
            cart: CartService::new(state),
            orders: OrderRepository::new(state.db.clone()),
            payments: state.payments.clone(),
        }
    }

    /// Price one seller's checkout without committing anything
    ///
    /// Works for guests too; an empty slice prices to all zeros.
    pub async fn preview(
        &self,
        who: &CartIdentity,
        seller: &str,
        method: DeliveryMethod,
    ) -> ApiResult<PricingBreakdown> {
        let lines = self.cart.seller_lines(who, seller).await?;
        Ok(compute_checkout(&lines, method))
    }

    /// Check out one seller's lines into a `PENDING` order
    pub async fn checkout(
        &self,
        actor: &Actor,
        seller: &str,
        method: DeliveryMethod,
        address: Option<String>,
        note: Option<String>,
    ) -> ApiResult<Order> {
        if seller.trim().is_empty() {
            return Err(ApiError::validation("Seller must not be empty"));
        }
        validate_delivery(method, &address)?;
        validate_optional_text(&note, "Note", MAX_NOTE_LEN)?;

        let who = CartIdentity::User {
            profile: actor.profile_id.clone(),
        };
        let lines = self.cart.seller_lines(&who, seller).await?;
        if lines.is_empty() {
            return Err(ApiError::validation(format!(
                "Cart has no lines for seller {seller}"
            )));
        }

        let pricing = compute_checkout(&lines, method);

        // Nothing has been written yet; a declined charge stops here
        let outcome = self
            .payments
            .charge(&actor.profile_id, seller, pricing.total)
            .await?;

        let order_lines: Vec<OrderLine> = lines
            .iter()
            .map(|line| OrderLine {
                item: line.item.clone(),
                name: line.name.clone(),
                unit_price: line.unit_price,
                quantity: line.quantity,
                note: line.note.clone(),
            })
            .collect();

        let now = now_millis();
        let order = Order {
            id: None,
            buyer: actor.profile_id.clone(),
            seller: seller.to_string(),
            lines: order_lines,
            delivery_method: method,
            delivery_address: if method.requires_address() {
                address
            } else {
                None
            },
            note,
            subtotal: pricing.subtotal,
            delivery_fee: pricing.delivery_fee,
            commission: pricing.commission,
            total: pricing.total,
            payment_ref: Some(outcome.reference.clone()),
            status: Default::default(),
            settled: false,
            created_at: now,
            updated_at: now,
            confirmed_at: None,
            processing_at: None,
            shipped_at: None,
            delivered_at: None,
            cancelled_at: None,
            refunded_at: None,
            settled_at: None,
        };

        let order = match self.orders.create(order).await {
            Ok(order) => order,
            Err(err) => {
                // The charge went through but the order did not land; the
                // reference is the handle for reconciling the charge.
                tracing::error!(
                    reference = %outcome.reference,
                    buyer = %actor.profile_id,
                    seller = %seller,
                    "Order creation failed after successful charge: {err}"
                );
                return Err(err.into());
            }
        };

        if let Err(err) = self.cart.clear(&who, Some(seller)).await {
            // The order is committed; stale cart lines are an annoyance,
            // not a rollback reason.
            tracing::error!(
                order = %order.id_string(),
                "Failed to clear cart lines after checkout: {err}"
            );
        }

        tracing::info!(
            order = %order.id_string(),
            buyer = %order.buyer,
            seller = %order.seller,
            total = %order.total,
            "Checkout complete"
        );
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{CatalogItem, ItemKind};
    use crate::db::repository::CatalogRepository;
    use crate::services::PaymentOutcome;
    use async_trait::async_trait;
    use shared::models::Role;
    use surrealdb::RecordId;

    struct DecliningPayments;

    #[async_trait]
    impl PaymentGateway for DecliningPayments {
        async fn charge(&self, _: &str, _: &str, _: f64) -> ApiResult<PaymentOutcome> {
            Err(ApiError::payment_failed("Card declined"))
        }
    }

    async fn seed_item(
        state: &ServerState,
        key: &str,
        seller: &str,
        unit_price: f64,
        commission_percent: Option<f64>,
    ) {
        let repo = CatalogRepository::new(state.db.clone());
        repo.create(CatalogItem {
            id: Some(RecordId::from_table_key("catalog_item", key)),
            kind: ItemKind::Product,
            seller: seller.to_string(),
            name: format!("Item {key}"),
            unit_price,
            commission_percent,
            available: true,
            created_at: 1_000,
            updated_at: 1_000,
        })
        .await
        .unwrap();
    }

    fn buyer() -> Actor {
        Actor::new("u1", "cust1", Role::Customer)
    }

    fn buyer_cart() -> CartIdentity {
        CartIdentity::User {
            profile: "cust1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_checkout_happy_path() {
        let state = ServerState::in_memory().await.unwrap();
        seed_item(&state, "p1", "biz1", 500.0, Some(10.0)).await;
        seed_item(&state, "p2", "biz1", 1000.0, Some(20.0)).await;

        let cart = CartService::new(&state);
        cart.add_line(&buyer_cart(), "PRODUCT", "p1", 2, None)
            .await
            .unwrap();
        cart.add_line(&buyer_cart(), "PRODUCT", "p2", 1, None)
            .await
            .unwrap();

        let service = CheckoutService::new(&state);
        let order = service
            .checkout(
                &buyer(),
                "biz1",
                DeliveryMethod::Standard,
                Some("12 Marina Rd".to_string()),
                None,
            )
            .await
            .unwrap();

        // subtotal 2000, fee 300, commission at mean 15% = 300, total 2600
        assert_eq!(order.subtotal, 2000.0);
        assert_eq!(order.delivery_fee, 300.0);
        assert_eq!(order.commission, 300.0);
        assert_eq!(order.total, 2600.0);
        assert_eq!(order.status, shared::models::OrderStatus::Pending);
        assert!(order.payment_ref.is_some());
        assert_eq!(order.lines.len(), 2);

        // That seller's lines are gone from the cart
        let remaining = cart.seller_lines(&buyer_cart(), "biz1").await.unwrap();
        assert!(remaining.is_empty());
    }

    #[tokio::test]
    async fn test_declined_charge_leaves_cart_untouched() {
        let state = ServerState::in_memory()
            .await
            .unwrap()
            .with_payments(Arc::new(DecliningPayments));
        seed_item(&state, "p1", "biz1", 500.0, None).await;

        let cart = CartService::new(&state);
        cart.add_line(&buyer_cart(), "PRODUCT", "p1", 1, None)
            .await
            .unwrap();

        let service = CheckoutService::new(&state);
        let err = service
            .checkout(&buyer(), "biz1", DeliveryMethod::Pickup, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::PaymentFailed { .. }));

        let lines = cart.seller_lines(&buyer_cart(), "biz1").await.unwrap();
        assert_eq!(lines.len(), 1);

        let orders = OrderRepository::new(state.db.clone())
            .list_for_buyer("cust1")
            .await
            .unwrap();
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn test_empty_cart_cannot_check_out() {
        let state = ServerState::in_memory().await.unwrap();
        let service = CheckoutService::new(&state);
        let err = service
            .checkout(&buyer(), "biz1", DeliveryMethod::Pickup, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_checkout_leaves_other_sellers_lines() {
        let state = ServerState::in_memory().await.unwrap();
        seed_item(&state, "p1", "biz1", 500.0, None).await;
        seed_item(&state, "p2", "biz2", 800.0, None).await;

        let cart = CartService::new(&state);
        cart.add_line(&buyer_cart(), "PRODUCT", "p1", 1, None)
            .await
            .unwrap();
        cart.add_line(&buyer_cart(), "PRODUCT", "p2", 1, None)
            .await
            .unwrap();

        let service = CheckoutService::new(&state);
        service
            .checkout(&buyer(), "biz1", DeliveryMethod::Pickup, None, None)
            .await
            .unwrap();

        let other = cart.seller_lines(&buyer_cart(), "biz2").await.unwrap();
        assert_eq!(other.len(), 1);
    }

    #[tokio::test]
    async fn test_courier_checkout_requires_address() {
        let state = ServerState::in_memory().await.unwrap();
        seed_item(&state, "p1", "biz1", 500.0, None).await;

        let cart = CartService::new(&state);
        cart.add_line(&buyer_cart(), "PRODUCT", "p1", 1, None)
            .await
            .unwrap();

        let service = CheckoutService::new(&state);
        let err = service
            .checkout(&buyer(), "biz1", DeliveryMethod::Express, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_preview_prices_without_committing() {
        let state = ServerState::in_memory().await.unwrap();
        seed_item(&state, "p1", "biz1", 500.0, Some(10.0)).await;

        let cart = CartService::new(&state);
        cart.add_line(&buyer_cart(), "PRODUCT", "p1", 2, None)
            .await
            .unwrap();

        let service = CheckoutService::new(&state);
        let pricing = service
            .preview(&buyer_cart(), "biz1", DeliveryMethod::Express)
            .await
            .unwrap();
        assert_eq!(pricing.subtotal, 1000.0);
        assert_eq!(pricing.delivery_fee, 750.0);
        assert_eq!(pricing.commission, 100.0);
        assert_eq!(pricing.total, 1850.0);

        // Preview commits nothing
        assert_eq!(cart.seller_lines(&buyer_cart(), "biz1").await.unwrap().len(), 1);
    }
}

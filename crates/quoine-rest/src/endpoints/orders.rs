//! Order management endpoints

use reqwest::Method;
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use super::{order_body, CallContext};
use crate::error::RestResult;
use crate::request::QueryParams;
use crate::types::{CreateOrderRequest, EditOrderRequest, Order, OrderFilter, Orders, Trade};

/// Order management endpoints
#[derive(Debug, Clone, Copy)]
pub struct OrderEndpoints<'a> {
    ctx: CallContext<'a>,
}

impl<'a> OrderEndpoints<'a> {
    pub(crate) fn new(ctx: CallContext<'a>) -> Self {
        Self { ctx }
    }

    /// Get a single order
    #[instrument(skip(self))]
    pub async fn get_order(&self, order_id: u64) -> RestResult<Order> {
        self.ctx.get(&format!("/orders/{}", order_id), None).await
    }

    /// List orders matching a filter
    #[instrument(skip(self))]
    pub async fn get_orders(&self, filter: &OrderFilter) -> RestResult<Orders> {
        let query = QueryParams::new()
            .with_opt("product_id", filter.product_id)
            .with_opt("funding_currency", filter.funding_currency.as_deref())
            .with_opt("status", filter.status)
            .with_opt("with_details", filter.with_details.then_some(1));

        self.ctx.get("/orders", Some(&query)).await
    }

    /// Place a new order
    ///
    /// # Errors
    /// Returns [`RestError::OrderAlreadyExists`](crate::RestError::OrderAlreadyExists)
    /// when the order's `client_order_id` has been used before.
    #[instrument(skip(self, order), fields(product_id = order.product_id, side = %order.side, order_type = %order.order_type))]
    pub async fn create_order(&self, order: &CreateOrderRequest) -> RestResult<Order> {
        let body = order_body(order)?;

        debug!(
            "Placing {} {} order for {} on product {}",
            order.side, order.order_type, order.quantity, order.product_id
        );

        self.ctx.call(Method::POST, "/orders/", Some(body), None).await
    }

    /// Cancel an order
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: u64) -> RestResult<Order> {
        self.ctx
            .call(Method::PUT, &format!("/orders/{}/cancel", order_id), None, None)
            .await
    }

    /// Change the quantity and price of a live order
    #[instrument(skip(self))]
    pub async fn edit_order(
        &self,
        order_id: u64,
        quantity: Decimal,
        price: Decimal,
    ) -> RestResult<Order> {
        let body = order_body(&EditOrderRequest::new(quantity, price))?;

        self.ctx
            .call(Method::PUT, &format!("/orders/{}", order_id), Some(body), None)
            .await
    }

    /// Get the trades opened by an order
    #[instrument(skip(self))]
    pub async fn get_order_trades(&self, order_id: u64) -> RestResult<Vec<Trade>> {
        self.ctx
            .get(&format!("/orders/{}/trades", order_id), None)
            .await
    }
}

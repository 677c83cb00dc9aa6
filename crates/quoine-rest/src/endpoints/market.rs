//! Market data endpoints
//!
//! Products, order books, interest rate ladders and public executions.

use tracing::{debug, instrument};

use super::CallContext;
use crate::error::RestResult;
use crate::request::QueryParams;
use crate::types::{Execution, Executions, InterestRates, PriceLevels, Product};

/// Market data endpoints
#[derive(Debug, Clone, Copy)]
pub struct MarketEndpoints<'a> {
    ctx: CallContext<'a>,
}

impl<'a> MarketEndpoints<'a> {
    pub(crate) fn new(ctx: CallContext<'a>) -> Self {
        Self { ctx }
    }

    /// Get all products
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> RestResult<Vec<Product>> {
        debug!("Fetching products");
        self.ctx.get("/products", None).await
    }

    /// Get a single product
    #[instrument(skip(self))]
    pub async fn get_product(&self, product_id: u64) -> RestResult<Product> {
        self.ctx.get(&format!("/products/{}", product_id), None).await
    }

    /// Get the order book for a product
    ///
    /// # Arguments
    /// * `product_id` - Product id
    /// * `full` - Request the full depth instead of the top levels
    #[instrument(skip(self))]
    pub async fn get_order_book(&self, product_id: u64, full: bool) -> RestResult<PriceLevels> {
        let path = format!("/products/{}/price_levels", product_id);
        if full {
            let query = QueryParams::new().with("full", 1);
            self.ctx.get(&path, Some(&query)).await
        } else {
            self.ctx.get(&path, None).await
        }
    }

    /// Get the margin interest rate ladder for a currency
    ///
    /// # Arguments
    /// * `currency` - Funding currency (e.g., "USD", "JPY")
    #[instrument(skip(self))]
    pub async fn get_interest_rates(&self, currency: &str) -> RestResult<InterestRates> {
        self.ctx
            .get(&format!("/ir_ladders/{}", currency), None)
            .await
    }

    /// Get a page of recent executions for a product
    ///
    /// # Arguments
    /// * `product_id` - Product id
    /// * `limit` - Executions per page
    /// * `page` - Page number, starting at 1
    #[instrument(skip(self))]
    pub async fn get_executions(
        &self,
        product_id: u64,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> RestResult<Executions> {
        let query = QueryParams::new()
            .with("product_id", product_id)
            .with_opt("limit", limit)
            .with_opt("page", page);

        self.ctx.get("/executions", Some(&query)).await
    }

    /// Get executions for a product after a timestamp
    ///
    /// # Arguments
    /// * `product_id` - Product id
    /// * `timestamp` - Unix seconds; only later executions are returned
    /// * `limit` - Maximum number of executions
    #[instrument(skip(self))]
    pub async fn get_executions_by_timestamp(
        &self,
        product_id: u64,
        timestamp: i64,
        limit: Option<u32>,
    ) -> RestResult<Vec<Execution>> {
        let query = QueryParams::new()
            .with("product_id", product_id)
            .with("timestamp", timestamp)
            .with_opt("limit", limit);

        self.ctx.get("/executions", Some(&query)).await
    }
}

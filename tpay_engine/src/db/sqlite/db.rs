use std::fmt::Debug;

use log::*;
use sqlx::{migrate, SqlitePool};

use super::{db_url, new_pool, orders, SqliteDatabaseError};
use crate::{
    db_types::{NewOrder, Order, OrderStatusType, Serial},
    traits::{OrderRepository, OrderRepositoryError},
};

const DEFAULT_MAX_CONNECTIONS: u32 = 25;

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl OrderRepository for SqliteDatabase {
    async fn fetch_order_by_serial(&self, serial: &Serial) -> Result<Option<Order>, OrderRepositoryError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order_by_serial(serial, &mut conn).await
    }

    async fn update_order_status(
        &self,
        serial: &Serial,
        expected: OrderStatusType,
        new_status: OrderStatusType,
        note: Option<&str>,
    ) -> Result<Option<Order>, OrderRepositoryError> {
        let mut conn = self.pool.acquire().await?;
        let result = orders::update_order_status(serial, expected, new_status, note, &mut conn).await?;
        if result.is_some() {
            debug!("🗃️ Order {serial} is now {new_status}");
        }
        Ok(result)
    }

    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderRepositoryError> {
        let mut conn = self.pool.acquire().await?;
        orders::insert_order(order, &mut conn).await
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the URL in `TPAY_DATABASE_URL`
    pub async fn new() -> Result<Self, SqliteDatabaseError> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), DEFAULT_MAX_CONNECTIONS).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Brings the schema up to date. Safe to call on every start-up.
    pub async fn run_migrations(&self) -> Result<(), SqliteDatabaseError> {
        migrate!("./src/db/sqlite/migrations").run(&self.pool).await?;
        debug!("🗃️ Database migrations are up to date");
        Ok(())
    }

    pub async fn close(&mut self) -> Result<(), SqliteDatabaseError> {
        self.pool.close().await;
        Ok(())
    }
}

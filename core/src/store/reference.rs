use super::DatasetStore;
use crate::benchmark_stage::BenchmarkRow;
use crate::clock::fmt_ts;
use crate::config::LocationSeed;
use crate::error::GenResult;
use crate::types::RowId;
use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension};
use std::collections::HashMap;

/// A product as seen by the commerce stage: id and unit price.
#[derive(Debug, Clone, Copy)]
pub struct ProductRef {
    pub product_id: RowId,
    pub price: f64,
}

impl DatasetStore {
    // ── Products ──────────────────────────────────────────────────

    pub fn insert_product(
        &self,
        product_id: RowId,
        name: &str,
        category: &str,
        price: f64,
        revenue_type: &str,
    ) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO products (product_id, name, category, price, revenue_type)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![product_id, name, category, price, revenue_type],
        )?;
        Ok(())
    }

    /// Category → product pool, each pool in product-id order.
    pub fn products_by_category(&self) -> GenResult<HashMap<String, Vec<ProductRef>>> {
        let mut stmt = self
            .conn
            .prepare("SELECT category, product_id, price FROM products ORDER BY product_id")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    ProductRef {
                        product_id: row.get(1)?,
                        price: row.get(2)?,
                    },
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut pools: HashMap<String, Vec<ProductRef>> = HashMap::new();
        for (category, product) in rows {
            pools.entry(category).or_default().push(product);
        }
        Ok(pools)
    }

    pub fn all_product_ids(&self) -> GenResult<Vec<RowId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT product_id FROM products ORDER BY product_id")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    // ── Locations ─────────────────────────────────────────────────

    /// Fixed office seed rows; REPLACE keeps re-runs idempotent.
    pub fn upsert_location(&self, location_id: RowId, seed: &LocationSeed) -> GenResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO locations (location_id, name, address, city, state, postal_code, country)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                location_id,
                &seed.name,
                &seed.address,
                &seed.city,
                &seed.state,
                &seed.postal_code,
                &seed.country
            ],
        )?;
        Ok(())
    }

    // ── App installs ──────────────────────────────────────────────

    pub fn max_install_id(&self) -> GenResult<Option<RowId>> {
        let max = self
            .conn
            .query_row("SELECT MAX(install_id) FROM app_installs", [], |row| {
                row.get::<_, Option<i64>>(0)
            })
            .optional()?
            .flatten();
        Ok(max)
    }

    pub fn insert_app_install(
        &self,
        install_id: RowId,
        location_id: RowId,
        product_id: RowId,
        install_date: NaiveDateTime,
    ) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO app_installs (install_id, location_id, product_id, install_date)
             VALUES (?1, ?2, ?3, ?4)",
            params![install_id, location_id, product_id, fmt_ts(install_date)],
        )?;
        Ok(())
    }

    // ── Discounts ─────────────────────────────────────────────────

    pub fn max_discount_id(&self) -> GenResult<Option<RowId>> {
        let max = self
            .conn
            .query_row("SELECT MAX(discount_id) FROM discounts", [], |row| {
                row.get::<_, Option<i64>>(0)
            })
            .optional()?
            .flatten();
        Ok(max)
    }

    pub fn insert_discount(
        &self,
        discount_id: RowId,
        code: &str,
        percent: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO discounts (discount_id, discount_code, discount_percent, start_date, end_date)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![discount_id, code, percent, fmt_ts(start), fmt_ts(end)],
        )?;
        Ok(())
    }

    pub fn insert_order_discount(&self, order_id: RowId, discount_id: RowId) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO order_discounts (order_id, discount_id) VALUES (?1, ?2)",
            params![order_id, discount_id],
        )?;
        Ok(())
    }

    pub fn order_discount_pairs(&self) -> GenResult<Vec<(RowId, RowId)>> {
        let mut stmt = self.conn.prepare(
            "SELECT order_id, discount_id FROM order_discounts ORDER BY order_id, discount_id",
        )?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ── Marketing spend / web traffic ─────────────────────────────

    pub fn insert_marketing_spend(&self, segment: &str, month: &str, budget: f64) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO marketing_spend (segment, month, monthly_budget) VALUES (?1, ?2, ?3)",
            params![segment, month, budget],
        )?;
        Ok(())
    }

    /// Web traffic is a safe-refresh table: cleared before re-insert.
    pub fn clear_web_traffic(&self) -> GenResult<()> {
        self.conn.execute("DELETE FROM web_traffic", [])?;
        Ok(())
    }

    pub fn insert_web_traffic(
        &self,
        traffic_month: &str,
        channel: &str,
        visitors: i64,
        leads: i64,
        mqls: i64,
    ) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO web_traffic (traffic_date, source_channel, visitors, leads, mqls)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![traffic_month, channel, visitors, leads, mqls],
        )?;
        Ok(())
    }

    // ── Benchmarks ────────────────────────────────────────────────

    /// Full idempotent table replace from an imported reference file.
    pub fn replace_benchmarks(&self, rows: &[BenchmarkRow]) -> GenResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM benchmarks", [])?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO benchmarks (
                    benchmark_id, metric_category, segment, metric_name,
                    target_value, description, target_period
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for b in rows {
                stmt.execute(params![
                    &b.benchmark_id,
                    &b.metric_category,
                    &b.segment,
                    &b.metric_name,
                    b.target_value,
                    &b.description,
                    &b.target_period,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

use super::DatasetStore;
use crate::clock::{fmt_ts, parse_ts};
use crate::error::GenResult;
use crate::types::RowId;
use chrono::NaiveDateTime;
use rusqlite::params;

impl DatasetStore {
    // ── Orders ────────────────────────────────────────────────────

    pub fn insert_order(
        &self,
        order_id: RowId,
        customer_id: RowId,
        order_date: NaiveDateTime,
        total_amount: f64,
    ) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO orders (order_id, customer_id, order_date, total_amount)
             VALUES (?1, ?2, ?3, ?4)",
            params![order_id, customer_id, fmt_ts(order_date), total_amount],
        )?;
        Ok(())
    }

    /// The one permitted cross-row update: an order's total is written
    /// once, immediately after its items are known, by the stage that
    /// created the order.
    pub fn update_order_total(&self, order_id: RowId, total_amount: f64) -> GenResult<()> {
        self.conn.execute(
            "UPDATE orders SET total_amount = ?1 WHERE order_id = ?2",
            params![total_amount, order_id],
        )?;
        Ok(())
    }

    pub fn insert_order_item(
        &self,
        order_item_id: RowId,
        order_id: RowId,
        product_id: RowId,
        quantity: i64,
        subtotal: f64,
    ) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO order_items (order_item_id, order_id, product_id, quantity, subtotal)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![order_item_id, order_id, product_id, quantity, subtotal],
        )?;
        Ok(())
    }

    pub fn insert_payment(
        &self,
        payment_id: RowId,
        customer_id: RowId,
        amount: f64,
        payment_date: NaiveDateTime,
        method: &str,
        success: bool,
    ) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO payments (payment_id, customer_id, payment_amount, payment_date, payment_method, success)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                payment_id,
                customer_id,
                amount,
                fmt_ts(payment_date),
                method,
                if success { 1 } else { 0 }
            ],
        )?;
        Ok(())
    }

    /// Order dates of one customer, in order-id order. The expansion
    /// stage picks its anchor from this list.
    pub fn order_dates_for_customer(&self, customer_id: RowId) -> GenResult<Vec<NaiveDateTime>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT order_date FROM orders WHERE customer_id = ?1 ORDER BY order_id",
        )?;
        let raw = stmt
            .query_map(params![customer_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        raw.iter()
            .map(|s| parse_ts(s).map_err(Into::into))
            .collect()
    }

    pub fn all_order_ids(&self) -> GenResult<Vec<RowId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT order_id FROM orders ORDER BY order_id")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    // ── Test helpers ──────────────────────────────────────────────

    /// (order_id, total_amount, sum of item subtotals, item count).
    pub fn order_item_reconciliation(&self) -> GenResult<Vec<(RowId, f64, f64, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT o.order_id, o.total_amount,
                    COALESCE(SUM(i.subtotal), 0.0), COUNT(i.order_item_id)
             FROM orders o
             LEFT JOIN order_items i ON i.order_id = o.order_id
             GROUP BY o.order_id
             ORDER BY o.order_id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Payments joined to their order by the shared id:
    /// (order_date, payment_date, order_total, payment_amount).
    pub fn payment_order_pairs(&self) -> GenResult<Vec<(String, String, f64, f64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT o.order_date, p.payment_date, o.total_amount, p.payment_amount
             FROM payments p
             JOIN orders o ON o.order_id = p.payment_id
             ORDER BY p.payment_id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

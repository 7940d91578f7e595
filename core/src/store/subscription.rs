use super::DatasetStore;
use crate::clock::{fmt_ts, parse_ts};
use crate::error::GenResult;
use crate::subscription_stage::NewSubscription;
use crate::types::RowId;
use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension};
use std::collections::HashMap;

impl DatasetStore {
    // ── Subscriptions ─────────────────────────────────────────────

    /// Current maximum subscription id, if any. The subscription-writing
    /// stages re-seed their allocator from this so repeated runs against
    /// a partially populated sink never collide.
    pub fn max_subscription_id(&self) -> GenResult<Option<RowId>> {
        let max = self
            .conn
            .query_row("SELECT MAX(subscription_id) FROM subscriptions", [], |row| {
                row.get::<_, Option<i64>>(0)
            })
            .optional()?
            .flatten();
        Ok(max)
    }

    pub fn insert_subscription(&self, sub: &NewSubscription) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO subscriptions (
                subscription_id, customer_id, plan_type, subscription_price,
                start_date, end_date, status, change_type
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                sub.subscription_id,
                sub.customer_id,
                &sub.plan_type,
                sub.price,
                fmt_ts(sub.start),
                sub.end.map(fmt_ts),
                sub.status,
                sub.change_type,
            ],
        )?;
        Ok(())
    }

    /// Batched variant for the main signup/upgrade pass.
    pub fn insert_subscriptions(&self, batch: &[NewSubscription]) -> GenResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO subscriptions (
                    subscription_id, customer_id, plan_type, subscription_price,
                    start_date, end_date, status, change_type
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for sub in batch {
                stmt.execute(params![
                    sub.subscription_id,
                    sub.customer_id,
                    &sub.plan_type,
                    sub.price,
                    fmt_ts(sub.start),
                    sub.end.map(fmt_ts),
                    sub.status,
                    sub.change_type,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Earliest `signup` subscription start per customer. The churn and
    /// reactivation stages consult this so no reactivation row can ever
    /// predate the signup row it presupposes.
    pub fn signup_subscription_starts(&self) -> GenResult<HashMap<RowId, NaiveDateTime>> {
        let mut stmt = self.conn.prepare(
            "SELECT customer_id, MIN(start_date) FROM subscriptions
             WHERE change_type = 'signup' GROUP BY customer_id",
        )?;
        let raw = stmt
            .query_map([], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut starts = HashMap::with_capacity(raw.len());
        for (customer_id, start_raw) in raw {
            starts.insert(customer_id, parse_ts(&start_raw)?);
        }
        Ok(starts)
    }

    // ── Test helpers ──────────────────────────────────────────────

    /// (customer_id, change_type, start_date, plan_type, price),
    /// in subscription-id order.
    pub fn subscription_timeline(&self) -> GenResult<Vec<(RowId, String, String, String, f64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT customer_id, change_type, start_date, plan_type, subscription_price
             FROM subscriptions ORDER BY subscription_id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn subscription_count_by_change_type(&self, change_type: &str) -> GenResult<i64> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM subscriptions WHERE change_type = ?1",
                params![change_type],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }
}

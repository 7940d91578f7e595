use super::DatasetStore;
use crate::clock::{fmt_ts, parse_ts};
use crate::customer_stage::CustomerRecord;
use crate::error::{GenError, GenResult};
use crate::stage::CustomerRef;
use crate::types::Segment;
use rusqlite::params;

impl DatasetStore {
    // ── Customers ─────────────────────────────────────────────────

    /// Insert a batch of customers inside one transaction.
    pub fn insert_customers(&self, batch: &[CustomerRecord]) -> GenResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO customers (
                    customer_id, name, email, billing_address, shipping_address,
                    signup_date, customer_segment, acquisition_source,
                    store_slug, store_domain
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for c in batch {
                stmt.execute(params![
                    c.customer_id,
                    &c.name,
                    &c.email,
                    &c.billing_address,
                    &c.shipping_address,
                    fmt_ts(c.signup),
                    c.segment.as_str(),
                    &c.source,
                    &c.slug,
                    &c.domain,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Lightweight directory of every customer, in id order.
    /// This is the typed view later stages iterate instead of
    /// re-querying per customer.
    pub fn customer_directory(&self) -> GenResult<Vec<CustomerRef>> {
        let mut stmt = self.conn.prepare(
            "SELECT customer_id, customer_segment, signup_date
             FROM customers ORDER BY customer_id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(customer_id, segment_label, signup_raw)| {
                let segment = Segment::from_label(&segment_label).ok_or_else(|| {
                    GenError::UnknownSegment {
                        label: segment_label.clone(),
                    }
                })?;
                Ok(CustomerRef {
                    customer_id,
                    segment,
                    signup: parse_ts(&signup_raw)?,
                })
            })
            .collect()
    }

    // ── Test helpers ──────────────────────────────────────────────

    pub fn customer_segment_sources(&self) -> GenResult<Vec<(String, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT customer_segment, acquisition_source FROM customers ORDER BY customer_id",
        )?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn customer_store_identities(&self) -> GenResult<Vec<(String, String, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, store_slug, store_domain FROM customers ORDER BY customer_id",
        )?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

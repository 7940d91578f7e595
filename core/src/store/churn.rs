use super::DatasetStore;
use crate::churn_stage::SupportProfile;
use crate::clock::{fmt_ts, parse_ts};
use crate::error::{GenError, GenResult};
use crate::reactivation_stage::ChurnedCustomer;
use crate::types::{RowId, Segment};
use chrono::NaiveDateTime;
use rusqlite::params;

impl DatasetStore {
    // ── Churn inputs ──────────────────────────────────────────────

    /// Per-customer support aggregate, computed once for the whole
    /// population: ticket count, earliest ticket, mean resolution days,
    /// billing-category ticket count. The churn stage consumes this as
    /// its typed upstream view.
    pub fn support_profiles(&self) -> GenResult<Vec<SupportProfile>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                c.customer_id,
                c.customer_segment,
                c.signup_date,
                COUNT(st.ticket_id),
                MIN(st.created_at),
                AVG(JULIANDAY(st.resolved_at) - JULIANDAY(st.created_at)),
                SUM(CASE WHEN st.ticket_category = 'Billing' THEN 1 ELSE 0 END)
             FROM customers c
             LEFT JOIN support_tickets st ON c.customer_id = st.customer_id
             GROUP BY c.customer_id
             ORDER BY c.customer_id",
        )?;
        let raw = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, Option<f64>>(5)?,
                    row.get::<_, Option<i64>>(6)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        raw.into_iter()
            .map(
                |(customer_id, segment_label, signup_raw, tickets, first, avg_days, billing)| {
                    let segment = Segment::from_label(&segment_label).ok_or_else(|| {
                        GenError::UnknownSegment {
                            label: segment_label.clone(),
                        }
                    })?;
                    let first_ticket = match first {
                        Some(raw) => Some(parse_ts(&raw)?),
                        None => None,
                    };
                    Ok(SupportProfile {
                        customer_id,
                        segment,
                        signup: parse_ts(&signup_raw)?,
                        total_tickets: tickets,
                        first_ticket,
                        avg_resolution_days: avg_days,
                        billing_tickets: billing.unwrap_or(0),
                    })
                },
            )
            .collect()
    }

    // ── Churn events ──────────────────────────────────────────────

    pub fn insert_churn_event(
        &self,
        churn_id: RowId,
        customer_id: RowId,
        churn_date: NaiveDateTime,
        reason: &str,
    ) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO churn_events (churn_id, customer_id, churn_date, churn_reason)
             VALUES (?1, ?2, ?3, ?4)",
            params![churn_id, customer_id, fmt_ts(churn_date), reason],
        )?;
        Ok(())
    }

    /// Every recorded churn event with its customer's segment, in
    /// churn-id order. Input view for the reactivation pass.
    pub fn churned_customers(&self) -> GenResult<Vec<ChurnedCustomer>> {
        let mut stmt = self.conn.prepare(
            "SELECT e.customer_id, e.churn_date, c.customer_segment
             FROM churn_events e
             JOIN customers c ON c.customer_id = e.customer_id
             ORDER BY e.churn_id",
        )?;
        let raw = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        raw.into_iter()
            .map(|(customer_id, churn_raw, segment_label)| {
                let segment = Segment::from_label(&segment_label).ok_or_else(|| {
                    GenError::UnknownSegment {
                        label: segment_label.clone(),
                    }
                })?;
                Ok(ChurnedCustomer {
                    customer_id,
                    churn_date: parse_ts(&churn_raw)?,
                    segment,
                })
            })
            .collect()
    }

    // ── Test helpers ──────────────────────────────────────────────

    /// (segment, signup_date, churn_date) for every churn event.
    pub fn churn_tenures(&self) -> GenResult<Vec<(String, String, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.customer_segment, c.signup_date, e.churn_date
             FROM churn_events e
             JOIN customers c ON c.customer_id = e.customer_id
             ORDER BY e.churn_id",
        )?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

use super::DatasetStore;
use crate::clock::fmt_ts;
use crate::error::GenResult;
use crate::support_stage::TicketRecord;
use rusqlite::params;

impl DatasetStore {
    // ── Support tickets ───────────────────────────────────────────

    pub fn insert_support_tickets(&self, batch: &[TicketRecord]) -> GenResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO support_tickets (ticket_id, customer_id, ticket_category, created_at, resolved_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for t in batch {
                stmt.execute(params![
                    t.ticket_id,
                    t.customer_id,
                    &t.category,
                    fmt_ts(t.created),
                    fmt_ts(t.resolved),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    // ── Test helpers ──────────────────────────────────────────────

    pub fn ticket_windows(&self) -> GenResult<Vec<(String, String, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT ticket_category, created_at, resolved_at
             FROM support_tickets ORDER BY ticket_id",
        )?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn customers_with_tickets(&self) -> GenResult<i64> {
        self.conn
            .query_row(
                "SELECT COUNT(DISTINCT customer_id) FROM support_tickets",
                [],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }
}

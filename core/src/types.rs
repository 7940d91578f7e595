//! Shared primitive types used across the entire generator.

use serde::{Deserialize, Serialize};

/// Row identifier in the relational sink. All lifecycle tables use
/// plain integer primary keys allocated by the owning stage.
pub type RowId = i64;

/// Customer size/tier classification. Fixed at creation; drives nearly
/// every downstream probability and price range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Segment {
    Smb,
    MidMarket,
    Enterprise,
}

impl Segment {
    pub const ALL: [Segment; 3] = [Segment::Smb, Segment::MidMarket, Segment::Enterprise];

    /// Canonical label as stored in the `customer_segment` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Smb => "SMB",
            Segment::MidMarket => "Mid-Market",
            Segment::Enterprise => "Enterprise",
        }
    }

    pub fn from_label(label: &str) -> Option<Segment> {
        match label {
            "SMB" => Some(Segment::Smb),
            "Mid-Market" => Some(Segment::MidMarket),
            "Enterprise" => Some(Segment::Enterprise),
            _ => None,
        }
    }
}

/// A value carried per customer segment.
/// Tighter than a string-keyed map: lookups cannot miss.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerSegment<T> {
    pub smb: T,
    pub mid_market: T,
    pub enterprise: T,
}

impl<T> PerSegment<T> {
    pub fn get(&self, segment: Segment) -> &T {
        match segment {
            Segment::Smb => &self.smb,
            Segment::MidMarket => &self.mid_market,
            Segment::Enterprise => &self.enterprise,
        }
    }
}

/// Round a money amount to cents. The sink stores money as REAL, so all
/// generated amounts are rounded once, at the point of computation.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

//! Generation profile: every tunable the pipeline consumes.
//!
//! The embedded `standard()` profile reproduces the production dataset
//! shape (36 months of history, ~2k signups/month). `compact()` is the
//! same behavior at roughly 1/100 scale for tests and smoke runs. A
//! profile can also be loaded from a JSON file to override either.

use crate::rng::GenRng;
use crate::types::{PerSegment, RowId};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Inclusive integer range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IntRange {
    pub lo: i64,
    pub hi: i64,
}

impl IntRange {
    pub const fn new(lo: i64, hi: i64) -> Self {
        Self { lo, hi }
    }

    pub fn sample(&self, rng: &mut GenRng) -> i64 {
        rng.int_in(self.lo, self.hi)
    }
}

/// Half-open float range [lo, hi).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FloatRange {
    pub lo: f64,
    pub hi: f64,
}

impl FloatRange {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    pub fn sample(&self, rng: &mut GenRng) -> f64 {
        rng.uniform(self.lo, self.hi)
    }
}

// ── Acquisition ──────────────────────────────────────────────────────

/// Seasonal cohort-size bands. A month falls into exactly one band;
/// the April promotional spike fires with `promo_probability`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquisitionConfig {
    pub summer_months: Vec<u32>,
    pub winter_months: Vec<u32>,
    pub promo_month: u32,
    pub promo_probability: f64,
    pub summer: IntRange,
    pub winter: IntRange,
    pub promo: IntRange,
    pub baseline: IntRange,
}

// ── Customers ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerConfig {
    /// Categorical segment mix, drawn independently per customer.
    pub segment_weights: PerSegment<f64>,
    /// Channel weight vector per segment, aligned with [`CHANNELS`].
    pub channel_weights: PerSegment<Vec<f64>>,
    /// Insert batch size. Performance knob, not a correctness contract.
    pub batch_size: usize,
    pub domain_suffix: String,
}

/// Fixed acquisition channel set; weight vectors index into this order.
pub const CHANNELS: [&str; 5] = ["Organic", "Social", "Paid Search", "Referral", "Direct"];

// ── Commerce ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommerceConfig {
    pub order_count: PerSegment<IntRange>,
    /// Orders land uniformly within this many months before "now".
    pub order_history_months: i32,
    pub items_per_order: IntRange,
    pub quantity: IntRange,
    /// (category, weight) affinity list per segment.
    pub category_affinity: PerSegment<Vec<(String, f64)>>,
    pub payment_methods: Vec<String>,
    pub payment_failure_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpansionConfig {
    pub rate: PerSegment<f64>,
    pub factor: PerSegment<FloatRange>,
    pub monthly_orders: IntRange,
    pub base_revenue: FloatRange,
    /// Disjoint ID origin keeping expansion rows clear of base commerce.
    pub id_origin: RowId,
}

// ── Subscriptions ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanBand {
    pub plans: Vec<String>,
    pub price: FloatRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionConfig {
    /// Signup subscription starts within this many months of signup.
    pub start_lag_months: i64,
    pub duration_months: IntRange,
    pub plans: PerSegment<PlanBand>,
    pub upgrade_chance: PerSegment<f64>,
    pub upgrade_delay_days: IntRange,
    pub upgrade_multiplier: FloatRange,
}

// ── Support ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketVolume {
    pub counts: Vec<i64>,
    pub weights: Vec<f64>,
    pub resolution_hours: IntRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportConfig {
    /// At most this many customers receive tickets, sampled without
    /// replacement; everyone when the population is smaller.
    pub sample_cap: usize,
    pub volume: PerSegment<TicketVolume>,
    pub window_start_days_ago: i64,
    pub window_end_days_ago: i64,
    pub categories: Vec<String>,
}

// ── Churn ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineReactivationConfig {
    pub chance: f64,
    pub delay_days: IntRange,
    pub plan: String,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChurnConfig {
    pub base_rate: PerSegment<f64>,
    pub recent_signup_days: i64,
    pub recent_signup_multiplier: f64,
    pub mid_signup_days: i64,
    pub mid_signup_multiplier: f64,
    pub heavy_ticket_threshold: i64,
    pub heavy_ticket_penalty: PerSegment<f64>,
    pub light_ticket_relief: f64,
    pub slow_resolution_days: f64,
    pub slow_resolution_penalty: PerSegment<f64>,
    pub billing_ticket_threshold: i64,
    pub billing_ticket_penalty: PerSegment<f64>,
    pub first_ticket_delay_days: i64,
    pub first_ticket_delay_penalty: PerSegment<f64>,
    pub max_probability: f64,
    pub min_tenure_days: PerSegment<i64>,
    pub reasons: Vec<String>,
    pub inline_reactivation: InlineReactivationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactivationConfig {
    pub chance: PerSegment<f64>,
    pub delay_days: IntRange,
    pub plans: PerSegment<PlanBand>,
}

// ── Reference data ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationSeed {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceConfig {
    pub static_products: usize,
    pub dynamic_products: usize,
    pub product_price: FloatRange,
    pub categories: Vec<String>,
    pub revenue_types: Vec<String>,
    pub locations: Vec<LocationSeed>,
    pub installs_per_location: IntRange,
    pub install_window_days: i64,
    pub discount_count: usize,
    pub discount_percents: Vec<i64>,
    pub discount_start_days_ago: IntRange,
    pub discount_length_days: IntRange,
    pub discount_order_sample: usize,
    pub discount_pair_retries: u32,
    pub marketing_bands: PerSegment<FloatRange>,
    pub marketing_fluctuation: f64,
    pub traffic_months: u32,
    pub traffic_channels: Vec<String>,
    pub organic_visitors: IntRange,
    pub paid_visitors: IntRange,
    pub lead_rate: FloatRange,
    pub mql_rate: FloatRange,
}

// ── Top-level profile ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenConfig {
    pub months_of_history: u32,
    pub acquisition: AcquisitionConfig,
    pub customer: CustomerConfig,
    pub commerce: CommerceConfig,
    pub expansion: ExpansionConfig,
    pub subscription: SubscriptionConfig,
    pub support: SupportConfig,
    pub churn: ChurnConfig,
    pub reactivation: ReactivationConfig,
    pub reference: ReferenceConfig,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl GenConfig {
    pub fn load(path: &Path) -> anyhow::Result<GenConfig> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading generation profile {}", path.display()))?;
        let config: GenConfig = serde_json::from_str(&raw)
            .with_context(|| format!("parsing generation profile {}", path.display()))?;
        Ok(config)
    }

    /// Production-shaped profile: 36 months, ~2k signups/month.
    pub fn standard() -> Self {
        Self::with_scale(36, 1)
    }

    /// ~1/100 scale for tests and smoke runs. Same distributions,
    /// same seasonal shape, two-digit cohorts.
    pub fn compact() -> Self {
        Self::with_scale(6, 100)
    }

    fn with_scale(months_of_history: u32, divisor: i64) -> Self {
        let shrink = |r: IntRange| IntRange::new((r.lo / divisor).max(1), (r.hi / divisor).max(2));
        let cap = |n: usize| if divisor == 1 { n } else { (n / divisor as usize).max(50) };

        GenConfig {
            months_of_history,
            acquisition: AcquisitionConfig {
                summer_months: vec![6, 7, 8],
                winter_months: vec![11, 12, 1],
                promo_month: 4,
                promo_probability: 0.3,
                summer: shrink(IntRange::new(1200, 1800)),
                winter: shrink(IntRange::new(2200, 3000)),
                promo: shrink(IntRange::new(3000, 4000)),
                baseline: shrink(IntRange::new(1800, 2300)),
            },
            customer: CustomerConfig {
                segment_weights: PerSegment { smb: 0.6, mid_market: 0.3, enterprise: 0.1 },
                channel_weights: PerSegment {
                    // Aligned with CHANNELS: Organic, Social, Paid Search, Referral, Direct
                    smb: vec![0.45, 0.25, 0.20, 0.05, 0.05],
                    mid_market: vec![0.20, 0.15, 0.30, 0.25, 0.10],
                    enterprise: vec![0.10, 0.05, 0.30, 0.35, 0.20],
                },
                batch_size: 1000,
                domain_suffix: "hopify.com".into(),
            },
            commerce: CommerceConfig {
                order_count: PerSegment {
                    smb: IntRange::new(1, 3),
                    mid_market: IntRange::new(2, 4),
                    enterprise: IntRange::new(3, 6),
                },
                order_history_months: 24,
                items_per_order: IntRange::new(1, 5),
                quantity: IntRange::new(1, 3),
                category_affinity: PerSegment {
                    smb: vec![
                        ("Storefront Tools".into(), 0.5),
                        ("Marketing & Growth".into(), 0.3),
                        ("Logistics & Shipping".into(), 0.2),
                    ],
                    mid_market: vec![
                        ("Apps & Integrations".into(), 0.4),
                        ("Storefront Tools".into(), 0.4),
                        ("Marketing & Growth".into(), 0.2),
                    ],
                    enterprise: vec![
                        ("POS Hardware & Software".into(), 0.4),
                        ("Payments & Finance".into(), 0.3),
                        ("Financial Services".into(), 0.2),
                        ("Apps & Integrations".into(), 0.1),
                    ],
                },
                payment_methods: vec!["Card".into(), "ACH".into(), "PayPal".into(), "Hop Pay".into()],
                payment_failure_rate: 0.03,
            },
            expansion: ExpansionConfig {
                rate: PerSegment { smb: 0.03, mid_market: 0.10, enterprise: 0.15 },
                factor: PerSegment {
                    smb: FloatRange::new(0.05, 0.10),
                    mid_market: FloatRange::new(0.08, 0.15),
                    enterprise: FloatRange::new(0.10, 0.20),
                },
                monthly_orders: IntRange::new(1, 4),
                base_revenue: FloatRange::new(100.0, 1000.0),
                id_origin: 900_000,
            },
            subscription: SubscriptionConfig {
                start_lag_months: 3,
                duration_months: IntRange::new(6, 24),
                plans: PerSegment {
                    smb: PlanBand {
                        plans: vec!["Starter".into(), "Standard".into()],
                        price: FloatRange::new(30.0, 100.0),
                    },
                    mid_market: PlanBand {
                        plans: vec!["Standard".into(), "Pro".into()],
                        price: FloatRange::new(100.0, 300.0),
                    },
                    enterprise: PlanBand {
                        plans: vec!["Pro".into(), "Enterprise".into()],
                        price: FloatRange::new(300.0, 800.0),
                    },
                },
                upgrade_chance: PerSegment { smb: 0.1, mid_market: 0.2, enterprise: 0.3 },
                upgrade_delay_days: IntRange::new(90, 365),
                upgrade_multiplier: FloatRange::new(1.2, 1.6),
            },
            support: SupportConfig {
                sample_cap: cap(20_000),
                volume: PerSegment {
                    smb: TicketVolume {
                        counts: vec![0, 1, 2, 3],
                        weights: vec![50.0, 30.0, 15.0, 5.0],
                        resolution_hours: IntRange::new(24, 120),
                    },
                    mid_market: TicketVolume {
                        counts: vec![2, 3, 4, 5, 6],
                        weights: vec![30.0, 30.0, 20.0, 15.0, 5.0],
                        resolution_hours: IntRange::new(12, 72),
                    },
                    enterprise: TicketVolume {
                        counts: vec![5, 6, 7, 8, 9, 10],
                        weights: vec![20.0, 30.0, 25.0, 15.0, 7.0, 3.0],
                        resolution_hours: IntRange::new(6, 36),
                    },
                },
                window_start_days_ago: 365,
                window_end_days_ago: 7,
                categories: vec![
                    "Billing".into(),
                    "Technical".into(),
                    "Onboarding".into(),
                    "Account Access".into(),
                    "General Inquiry".into(),
                ],
            },
            churn: ChurnConfig {
                base_rate: PerSegment { smb: 0.12, mid_market: 0.05, enterprise: 0.02 },
                recent_signup_days: 90,
                recent_signup_multiplier: 0.2,
                mid_signup_days: 180,
                mid_signup_multiplier: 0.5,
                heavy_ticket_threshold: 5,
                heavy_ticket_penalty: PerSegment { smb: 0.15, mid_market: 0.10, enterprise: 0.10 },
                light_ticket_relief: 0.05,
                slow_resolution_days: 3.0,
                slow_resolution_penalty: PerSegment { smb: 0.10, mid_market: 0.10, enterprise: 0.05 },
                billing_ticket_threshold: 2,
                billing_ticket_penalty: PerSegment { smb: 0.10, mid_market: 0.10, enterprise: 0.15 },
                first_ticket_delay_days: 90,
                first_ticket_delay_penalty: PerSegment { smb: 0.10, mid_market: 0.05, enterprise: 0.05 },
                max_probability: 0.9,
                min_tenure_days: PerSegment { smb: 30, mid_market: 60, enterprise: 120 },
                reasons: vec![
                    "Too expensive".into(),
                    "Switched provider".into(),
                    "Lack of features".into(),
                    "Poor support".into(),
                    "Other".into(),
                ],
                inline_reactivation: InlineReactivationConfig {
                    chance: 0.1,
                    delay_days: IntRange::new(30, 120),
                    plan: "Hopify Standard".into(),
                    price: 299.0,
                },
            },
            reactivation: ReactivationConfig {
                chance: PerSegment { smb: 0.05, mid_market: 0.10, enterprise: 0.20 },
                delay_days: IntRange::new(30, 180),
                plans: PerSegment {
                    smb: PlanBand {
                        plans: vec!["Starter".into(), "Standard".into()],
                        price: FloatRange::new(40.0, 120.0),
                    },
                    mid_market: PlanBand {
                        plans: vec!["Standard".into(), "Pro".into()],
                        price: FloatRange::new(120.0, 350.0),
                    },
                    enterprise: PlanBand {
                        plans: vec!["Pro".into(), "Enterprise".into()],
                        price: FloatRange::new(350.0, 900.0),
                    },
                },
            },
            reference: ReferenceConfig {
                static_products: 30,
                dynamic_products: 50,
                product_price: FloatRange::new(20.0, 500.0),
                categories: vec![
                    "POS Hardware & Software".into(),
                    "Payments & Finance".into(),
                    "Financial Services".into(),
                    "Apps & Integrations".into(),
                    "Storefront Tools".into(),
                    "Marketing & Growth".into(),
                    "Logistics & Shipping".into(),
                ],
                revenue_types: vec!["One-Time".into(), "Subscription".into()],
                locations: vec![
                    LocationSeed {
                        name: "Hopify NYC HQ".into(),
                        address: "150 Elgin St".into(),
                        city: "New York City".into(),
                        state: "NY".into(),
                        postal_code: "10001".into(),
                        country: "United States".into(),
                    },
                    LocationSeed {
                        name: "Hopify Canada Hub".into(),
                        address: "123 King St".into(),
                        city: "Toronto".into(),
                        state: "ON".into(),
                        postal_code: "M5H 1J9".into(),
                        country: "Canada".into(),
                    },
                    LocationSeed {
                        name: "Hopify Brazil Hub".into(),
                        address: "50 Paulista Ave".into(),
                        city: "Sao Paulo".into(),
                        state: "SP".into(),
                        postal_code: "01310-100".into(),
                        country: "Brazil".into(),
                    },
                    LocationSeed {
                        name: "Hopify Germany Hub".into(),
                        address: "Unter den Linden 1".into(),
                        city: "Berlin".into(),
                        state: "BE".into(),
                        postal_code: "10117".into(),
                        country: "Germany".into(),
                    },
                    LocationSeed {
                        name: "Hopify Singapore Hub".into(),
                        address: "1 Raffles Place".into(),
                        city: "Singapore".into(),
                        state: "Singapore".into(),
                        postal_code: "048616".into(),
                        country: "Singapore".into(),
                    },
                ],
                installs_per_location: IntRange::new(5, 12),
                install_window_days: 365,
                discount_count: 50,
                discount_percents: vec![5, 10, 15, 20, 25, 30],
                discount_start_days_ago: IntRange::new(30, 365),
                discount_length_days: IntRange::new(7, 90),
                discount_order_sample: cap(20_000),
                discount_pair_retries: 10,
                marketing_bands: PerSegment {
                    smb: FloatRange::new(10_000.0, 25_000.0),
                    mid_market: FloatRange::new(50_000.0, 80_000.0),
                    enterprise: FloatRange::new(100_000.0, 150_000.0),
                },
                marketing_fluctuation: 0.1,
                traffic_months: if divisor == 1 { 24 } else { 6 },
                traffic_channels: vec!["Paid Search".into(), "Social Media".into(), "Organic".into()],
                organic_visitors: IntRange::new(50_000, 100_000),
                paid_visitors: IntRange::new(10_000, 30_000),
                lead_rate: FloatRange::new(0.02, 0.05),
                mql_rate: FloatRange::new(0.2, 0.4),
            },
        }
    }
}

use serde::Serialize;

// ---------------------------------------------------------------------------
// PriceBucket: one histogram range
// ---------------------------------------------------------------------------

/// A fixed price range used by the bar-chart histogram.
///
/// `floor` is exclusive and `ceiling` inclusive, so consecutive buckets share
/// a boundary without overlapping: `(100, 200]` follows `[.., 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceBucket {
    pub label: &'static str,
    pub floor: Option<f64>,
    pub ceiling: Option<f64>,
}

impl PriceBucket {
    const fn new(label: &'static str, floor: Option<f64>, ceiling: Option<f64>) -> Self {
        Self {
            label,
            floor,
            ceiling,
        }
    }

    /// Whether `price` falls in this bucket.
    pub fn contains(&self, price: f64) -> bool {
        self.floor.map_or(true, |floor| price > floor)
            && self.ceiling.map_or(true, |ceiling| price <= ceiling)
    }

    /// The bucket `price` belongs to. Every price lands in exactly one.
    pub fn for_price(price: f64) -> &'static PriceBucket {
        PRICE_BUCKETS
            .iter()
            .find(|bucket| bucket.contains(price))
            .unwrap_or(&PRICE_BUCKETS[PRICE_BUCKETS.len() - 1])
    }
}

/// The ten histogram buckets in ascending order.
pub static PRICE_BUCKETS: [PriceBucket; 10] = [
    PriceBucket::new("0-100", None, Some(100.0)),
    PriceBucket::new("101-200", Some(100.0), Some(200.0)),
    PriceBucket::new("201-300", Some(200.0), Some(300.0)),
    PriceBucket::new("301-400", Some(300.0), Some(400.0)),
    PriceBucket::new("401-500", Some(400.0), Some(500.0)),
    PriceBucket::new("501-600", Some(500.0), Some(600.0)),
    PriceBucket::new("601-700", Some(600.0), Some(700.0)),
    PriceBucket::new("701-800", Some(700.0), Some(800.0)),
    PriceBucket::new("801-900", Some(800.0), Some(900.0)),
    PriceBucket::new("901-above", Some(900.0), None),
];

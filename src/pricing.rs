// Booking cost calculation: room-type pricing, discount and VAT

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::DEFAULT_CURRENCY;

pub const DEFAULT_BASE_PRICE: f64 = 1000.0;
pub const DEFAULT_VAT_RATE: f64 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomType {
    Standard,
    Deluxe,
    Superior,
    Suite,
    PresidentialSuite,
}

impl RoomType {
    pub const ALL: [RoomType; 5] = [
        RoomType::Standard,
        RoomType::Deluxe,
        RoomType::Superior,
        RoomType::Suite,
        RoomType::PresidentialSuite,
    ];

    pub fn multiplier(self) -> f64 {
        match self {
            RoomType::Standard => 1.0,
            RoomType::Deluxe => 1.3,
            RoomType::Superior => 1.5,
            RoomType::Suite => 2.0,
            RoomType::PresidentialSuite => 3.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RoomType::Standard => "Standard Room",
            RoomType::Deluxe => "Deluxe Room",
            RoomType::Superior => "Superior Room",
            RoomType::Suite => "Suite Room",
            RoomType::PresidentialSuite => "Presidential Suite",
        }
    }

    fn from_label(label: &str) -> Option<RoomType> {
        let normalized = label.trim().to_lowercase();
        let key = normalized
            .strip_suffix(" room")
            .unwrap_or(&normalized)
            .trim_end();

        match key {
            "standard" => Some(RoomType::Standard),
            "deluxe" => Some(RoomType::Deluxe),
            "superior" => Some(RoomType::Superior),
            "suite" => Some(RoomType::Suite),
            "presidential suite" | "presidential" => Some(RoomType::PresidentialSuite),
            _ => None,
        }
    }

    // Unknown labels price as Standard; the fallback is reported, never raised
    pub fn resolve(label: &str) -> (RoomType, Option<PricingFallback>) {
        match Self::from_label(label) {
            Some(room_type) => (room_type, None),
            None => (
                RoomType::Standard,
                Some(PricingFallback::UnknownRoomType {
                    requested: label.to_string(),
                }),
            ),
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Input coercions applied while pricing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PricingFallback {
    UnknownRoomType { requested: String },
    DaysBelowMinimum { requested: i64 },
    DaysAboveMaximum { requested: i64 },
    MissingBasePrice,
    InvalidBasePrice { requested: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub room_type: String,
    pub days: u32,
    pub price_per_night: f64,
    pub subtotal: f64,
    // Percent
    pub discount: f64,
    pub discount_amount: f64,
    pub after_discount: f64,
    // Percent
    pub vat_rate: f64,
    pub vat_amount: f64,
    pub total: f64,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fallbacks: Vec<PricingFallback>,
}

impl CostBreakdown {
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn used_fallback(&self) -> bool {
        !self.fallbacks.is_empty()
    }

    // Fields forwarded to the next booking step as URL query parameters
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("roomType", self.room_type.clone()),
            ("days", self.days.to_string()),
            ("pricePerNight", self.price_per_night.to_string()),
            ("subtotal", self.subtotal.to_string()),
            ("discount", self.discount.to_string()),
            ("discountAmount", self.discount_amount.to_string()),
            ("afterDiscount", self.after_discount.to_string()),
            ("vatRate", self.vat_rate.to_string()),
            ("vatAmount", self.vat_amount.to_string()),
            ("total", self.total.to_string()),
            ("currency", self.currency.clone()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingPolicy {
    pub default_base_price: f64,
    pub vat_rate: f64,
    pub discount: f64,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            default_base_price: DEFAULT_BASE_PRICE,
            vat_rate: DEFAULT_VAT_RATE,
            discount: 0.0,
        }
    }
}

impl PricingPolicy {
    // Base price the listing shows and the booking charges; unusable
    // catalog prices are replaced by `default_base_price`
    pub fn base_price(&self, price: Option<f64>) -> f64 {
        match price {
            Some(p) if p.is_finite() && p >= 0.0 => p,
            _ => self.default_base_price,
        }
    }

    pub fn nightly_rate(&self, room_type: RoomType, base_price: f64) -> f64 {
        base_price * room_type.multiplier()
    }

    pub fn calculate(&self, room_type: &str, days: i64, base_price: Option<f64>) -> CostBreakdown {
        let mut fallbacks = Vec::new();

        let (resolved, room_fallback) = RoomType::resolve(room_type);
        fallbacks.extend(room_fallback);

        let days = if days < 1 {
            fallbacks.push(PricingFallback::DaysBelowMinimum { requested: days });
            1
        } else {
            u32::try_from(days).unwrap_or_else(|_| {
                fallbacks.push(PricingFallback::DaysAboveMaximum { requested: days });
                u32::MAX
            })
        };

        let base_price = match base_price {
            Some(p) if p.is_finite() && p >= 0.0 => p,
            Some(p) => {
                fallbacks.push(PricingFallback::InvalidBasePrice { requested: p });
                self.default_base_price
            }
            None => {
                fallbacks.push(PricingFallback::MissingBasePrice);
                self.default_base_price
            }
        };

        let price_per_night = self.nightly_rate(resolved, base_price);
        let subtotal = price_per_night * days as f64;
        let discount_amount = subtotal * self.discount / 100.0;
        let after_discount = subtotal - discount_amount;
        let vat_amount = after_discount * self.vat_rate / 100.0;
        let total = after_discount + vat_amount;

        CostBreakdown {
            room_type: room_type.to_string(),
            days,
            price_per_night,
            subtotal,
            discount: self.discount,
            discount_amount,
            after_discount,
            vat_rate: self.vat_rate,
            vat_amount,
            total,
            currency: DEFAULT_CURRENCY.to_string(),
            fallbacks,
        }
    }
}

pub fn calculate_cost(room_type: &str, days: i64, base_price: Option<f64>) -> CostBreakdown {
    PricingPolicy::default().calculate(room_type, days, base_price)
}

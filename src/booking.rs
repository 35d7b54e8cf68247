// Booking flow: guest details, the query-parameter hand-off between the
// review/payment/success steps, and the simulated payment

use std::{collections::HashMap, fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use validator::Validate;

use crate::catalog::DEFAULT_CURRENCY;
use crate::params::{encode_query, parse_query};
use crate::pricing::CostBreakdown;
use crate::search::SearchState;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Invalid guest details: {0}")]
    InvalidGuestDetails(#[from] validator::ValidationErrors),

    #[error("Invalid payment amount: {0}")]
    InvalidAmount(f64),

    #[error("Unknown payment method: {0}")]
    UnknownPaymentMethod(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GuestDetails {
    #[validate(length(min = 1, message = "first name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last name is required"))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 20))]
    pub mobile: String,
    #[serde(default)]
    pub special_request: String,
}

// In-progress booking; lives only in the URL between steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingParams {
    pub hotel_id: Option<u32>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub guests: Option<String>,
    pub cost: CostBreakdown,
}

fn parse_f64(params: &HashMap<String, String>, key: &str) -> f64 {
    params
        .get(key)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

impl BookingParams {
    pub fn new(hotel_id: u32, search: &SearchState, cost: CostBreakdown) -> Self {
        Self {
            hotel_id: Some(hotel_id),
            check_in: Some(search.check_in),
            check_out: Some(search.check_out),
            guests: search.guests.clone(),
            cost,
        }
    }

    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if let Some(id) = self.hotel_id {
            pairs.push(("id", id.to_string()));
        }
        if let Some(check_in) = self.check_in {
            pairs.push(("checkIn", check_in.format(DATE_FORMAT).to_string()));
        }
        if let Some(check_out) = self.check_out {
            pairs.push(("checkOut", check_out.format(DATE_FORMAT).to_string()));
        }
        if let Some(guests) = &self.guests {
            pairs.push(("guests", guests.clone()));
        }
        pairs.extend(self.cost.to_query_pairs());
        encode_query(&pairs)
    }

    // Missing amounts read as 0, days as 1 and currency as BAHT
    pub fn from_query_string(query: &str) -> Self {
        let params = parse_query(query);

        let date = |key: &str| {
            params
                .get(key)
                .and_then(|v| NaiveDate::parse_from_str(v, DATE_FORMAT).ok())
        };

        let days = params
            .get("days")
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|d| *d >= 1)
            .map_or(1, |d| u32::try_from(d).unwrap_or(u32::MAX));

        let cost = CostBreakdown {
            room_type: params.get("roomType").cloned().unwrap_or_default(),
            days,
            price_per_night: parse_f64(&params, "pricePerNight"),
            subtotal: parse_f64(&params, "subtotal"),
            discount: parse_f64(&params, "discount"),
            discount_amount: parse_f64(&params, "discountAmount"),
            after_discount: parse_f64(&params, "afterDiscount"),
            vat_rate: parse_f64(&params, "vatRate"),
            vat_amount: parse_f64(&params, "vatAmount"),
            total: parse_f64(&params, "total"),
            currency: params
                .get("currency")
                .filter(|c| !c.is_empty())
                .cloned()
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            fallbacks: Vec::new(),
        };

        Self {
            hotel_id: params.get("id").and_then(|v| v.parse().ok()),
            check_in: date("checkIn"),
            check_out: date("checkOut"),
            guests: params.get("guests").filter(|g| !g.is_empty()).cloned(),
            cost,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStep {
    HotelDetail,
    Review,
    Payment,
    Success,
}

impl BookingStep {
    pub fn next(self) -> BookingStep {
        match self {
            BookingStep::HotelDetail => BookingStep::Review,
            BookingStep::Review => BookingStep::Payment,
            BookingStep::Payment | BookingStep::Success => BookingStep::Success,
        }
    }

    pub fn path(self, params: &BookingParams) -> String {
        match self {
            BookingStep::HotelDetail => match params.hotel_id {
                Some(id) => format!("/exploreHotel?id={id}"),
                None => "/exploreHotel".to_string(),
            },
            BookingStep::Review => format!("/review?{}", params.to_query_string()),
            BookingStep::Payment => format!("/payment?{}", params.to_query_string()),
            BookingStep::Success => "/success".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    #[default]
    DebitCard,
    Upi,
    #[serde(rename = "phonepe")]
    PhonePe,
    NetBanking,
    CreditCard,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::DebitCard,
        PaymentMethod::Upi,
        PaymentMethod::PhonePe,
        PaymentMethod::NetBanking,
        PaymentMethod::CreditCard,
    ];

    pub fn id(self) -> &'static str {
        match self {
            PaymentMethod::DebitCard => "debit-card",
            PaymentMethod::Upi => "upi",
            PaymentMethod::PhonePe => "phonepe",
            PaymentMethod::NetBanking => "net-banking",
            PaymentMethod::CreditCard => "credit-card",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            PaymentMethod::DebitCard => "Debit Card",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::PhonePe => "PhonePay",
            PaymentMethod::NetBanking => "Net Banking",
            PaymentMethod::CreditCard => "Credit Card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for PaymentMethod {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|m| m.id() == s.trim())
            .ok_or_else(|| BookingError::UnknownPaymentMethod(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub confirmation_code: String,
    pub status: BookingStatus,
    pub hotel_id: Option<u32>,
    pub guest_name: String,
    pub amount: f64,
    pub currency: String,
    pub method: PaymentMethod,
    pub paid_at: DateTime<Utc>,
}

fn confirmation_code() -> String {
    let code: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    format!("HB-{}", code.to_uppercase())
}

// Nothing is charged; a confirmation is issued for any valid request
pub fn simulate_payment(
    params: &BookingParams,
    guest: &GuestDetails,
    method: PaymentMethod,
) -> Result<BookingConfirmation, BookingError> {
    guest.validate()?;

    let amount = params.cost.total;
    if !(amount.is_finite() && amount > 0.0) {
        return Err(BookingError::InvalidAmount(amount));
    }

    let confirmation = BookingConfirmation {
        confirmation_code: confirmation_code(),
        status: BookingStatus::Confirmed,
        hotel_id: params.hotel_id,
        guest_name: format!("{} {}", guest.first_name, guest.last_name),
        amount,
        currency: params.cost.currency.clone(),
        method,
        paid_at: Utc::now(),
    };

    info!(
        code = %confirmation.confirmation_code,
        hotel_id = ?confirmation.hotel_id,
        amount = confirmation.amount,
        method = method.id(),
        "booking confirmed"
    );

    Ok(confirmation)
}

// Display projections of hotel records for the listing and detail pages

use serde::Serialize;

use crate::catalog::HotelRecord;
use crate::pricing::{PricingPolicy, RoomType};

pub fn rating_text(rating: f64) -> &'static str {
    if rating >= 4.5 {
        "Excellent"
    } else if rating >= 4.0 {
        "Very Good"
    } else if rating >= 3.5 {
        "Good"
    } else if rating >= 3.0 {
        "Fair"
    } else {
        "Poor"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StarRating {
    pub full: u8,
    pub half: bool,
    pub empty: u8,
}

impl StarRating {
    pub const MAX_STARS: u8 = 5;

    pub fn from_rating(rating: f64) -> Self {
        let clamped = rating.clamp(0.0, Self::MAX_STARS as f64);
        let full = clamped.floor() as u8;
        let half = clamped.fract() > 0.0;
        let empty = Self::MAX_STARS - full - u8::from(half);
        Self { full, half, empty }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelCardView {
    pub id: u32,
    pub name: String,
    pub location: String,
    pub rating: f64,
    pub reviews: String,
    pub price: String,
    pub image: String,
}

impl HotelCardView {
    // Listed price is the Standard rate the booking would charge
    pub fn from_record(hotel: &HotelRecord, policy: &PricingPolicy) -> Self {
        let unit = if hotel.currency == "USD" {
            "night"
        } else {
            hotel.currency.as_str()
        };

        Self {
            id: hotel.id,
            name: hotel.name.clone(),
            location: hotel.location.clone(),
            rating: hotel.rating,
            reviews: hotel.reviews.clone(),
            price: format!(
                "Price starts from {}/{}",
                policy.base_price(hotel.price_numeric),
                unit
            ),
            image: hotel.image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingBreakdown {
    pub housekeeping: f64,
    pub food: f64,
    pub service: f64,
    pub staff: f64,
}

impl RatingBreakdown {
    pub fn from_rating(rating: f64) -> Self {
        Self {
            housekeeping: rating.min(5.0),
            food: (rating + 0.2).min(5.0),
            service: (rating + 0.1).min(5.0),
            staff: (rating - 0.1).min(5.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomOption {
    pub room_type: RoomType,
    pub label: String,
    pub price_per_night: f64,
    pub price: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelDetailView {
    pub id: u32,
    pub name: String,
    pub location: String,
    pub description: String,
    pub rating: f64,
    pub rating_text: &'static str,
    pub stars: StarRating,
    pub ratings: RatingBreakdown,
    pub reviews: String,
    pub price: String,
    pub currency: String,
    pub images: Vec<String>,
    pub amenities: Vec<String>,
    pub rooms: Vec<RoomOption>,
}

impl HotelDetailView {
    // Room types offered on the detail page, most expensive first
    pub const ROOM_TYPES: [RoomType; 2] = [RoomType::Deluxe, RoomType::Standard];

    pub fn from_record(hotel: &HotelRecord, policy: &PricingPolicy) -> Self {
        let base_price = policy.base_price(hotel.price_numeric);

        let rooms = Self::ROOM_TYPES
            .iter()
            .map(|&room_type| {
                let nightly = policy.nightly_rate(room_type, base_price).round();
                RoomOption {
                    room_type,
                    label: room_type.label().to_string(),
                    price_per_night: nightly,
                    price: format!("{} {}/night", nightly, hotel.currency),
                    image: hotel.image.clone(),
                }
            })
            .collect();

        Self {
            id: hotel.id,
            name: hotel.name.clone(),
            location: hotel.location.clone(),
            description: hotel.description.clone(),
            rating: hotel.rating,
            rating_text: rating_text(hotel.rating),
            stars: StarRating::from_rating(hotel.rating),
            ratings: RatingBreakdown::from_rating(hotel.rating),
            reviews: hotel.reviews.clone(),
            price: format!("{} {}", base_price, hotel.currency),
            currency: hotel.currency.clone(),
            images: vec![hotel.image.clone(); 4],
            amenities: hotel.amenities.clone(),
            rooms,
        }
    }
}

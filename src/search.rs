// Search state: the criteria entered on the search form, passed explicitly
// into the query pipeline and forwarded between pages as query parameters

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::params::{encode_query, parse_query};
use crate::pricing::RoomType;
use crate::query::{normalize_guests, QueryCriteria, ALL_GUESTS};

// Text the search box shows when empty; never used as a query
pub const SEARCH_PLACEHOLDER: &str = "Search city, Country, Place for Travel advisory";

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchState {
    pub location: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    // None means all guests
    pub guests: Option<String>,
    pub room_type: String,
    pub search_query: String,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}

fn next_day(date: NaiveDate) -> NaiveDate {
    date.succ_opt().unwrap_or(date)
}

impl SearchState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            location: String::new(),
            check_in: today,
            check_out: next_day(today),
            guests: None,
            room_type: RoomType::Standard.label().to_string(),
            search_query: String::new(),
        }
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
    }

    // Check-out is pushed to the following day when it would not be after
    // the new check-in
    pub fn set_check_in(&mut self, check_in: NaiveDate) {
        self.check_in = check_in;
        if check_in >= self.check_out {
            self.check_out = next_day(check_in);
        }
    }

    pub fn set_check_out(&mut self, check_out: NaiveDate) {
        self.check_out = check_out;
    }

    pub fn set_guests(&mut self, guests: impl Into<String>) {
        self.guests = normalize_guests(Some(guests.into()));
    }

    pub fn set_room_type(&mut self, room_type: impl Into<String>) {
        self.room_type = room_type.into();
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn nights(&self) -> i64 {
        match (self.check_out - self.check_in).num_days().abs() {
            0 => 1,
            n => n,
        }
    }

    pub fn query_text(&self) -> &str {
        let text = if self.search_query.is_empty() {
            self.location.as_str()
        } else {
            self.search_query.as_str()
        };

        if text == SEARCH_PLACEHOLDER {
            ""
        } else {
            text
        }
    }

    pub fn criteria(&self) -> QueryCriteria {
        QueryCriteria::new(self.query_text(), self.guests.clone())
    }

    pub fn guests_label(&self) -> &str {
        self.guests.as_deref().unwrap_or(ALL_GUESTS)
    }

    pub fn to_query_string(&self) -> String {
        let mut pairs = vec![
            ("q", self.query_text().to_string()),
            ("location", self.location.clone()),
            ("checkIn", self.check_in.format(DATE_FORMAT).to_string()),
            ("checkOut", self.check_out.format(DATE_FORMAT).to_string()),
            ("roomType", self.room_type.clone()),
        ];
        if let Some(guests) = &self.guests {
            pairs.push(("guests", guests.clone()));
        }
        encode_query(&pairs)
    }

    // Missing or malformed values keep the defaults for `today`
    pub fn from_query_string(query: &str, today: NaiveDate) -> Self {
        let params = parse_query(query);
        let mut state = Self::new(today);

        if let Some(location) = params.get("location") {
            state.location = location.clone();
        }
        if let Some(q) = params.get("q") {
            state.search_query = q.clone();
        }
        if let Some(room_type) = params.get("roomType").filter(|r| !r.is_empty()) {
            state.room_type = room_type.clone();
        }
        if let Some(guests) = params.get("guests") {
            state.set_guests(guests.clone());
        }

        let parse_date = |key: &str| {
            params
                .get(key)
                .and_then(|v| NaiveDate::parse_from_str(v, DATE_FORMAT).ok())
        };
        if let Some(check_in) = parse_date("checkIn") {
            state.check_in = check_in;
            state.check_out = next_day(check_in);
        }
        if let Some(check_out) = parse_date("checkOut") {
            state.check_out = check_out;
        }

        state
    }
}

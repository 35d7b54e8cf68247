// Hotel query pipeline: text/guest filtering followed by an optional sort

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, HotelRecord};
use crate::pricing::PricingPolicy;

// Guest-capacity sentinel meaning "no guest filter"
pub const ALL_GUESTS: &str = "All Guests";

// Canonical guest-capacity strings offered by the search form
pub const GUEST_CAPACITY_OPTIONS: [&str; 7] = [
    "1 adult, 0 children - 1 room",
    "2 adult, 0 children - 1 room",
    "2 adult, 1 children - 1 room",
    "2 adult, 2 children - 1 room",
    "3 adult, 0 children - 1 room",
    "4 adult, 0 children - 1 room",
    "2 adult, 0 children - 2 room",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Default,
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
    RatingDesc,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Default => "default",
            SortKey::NameAsc => "name-asc",
            SortKey::NameDesc => "name-desc",
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
            SortKey::RatingDesc => "rating-desc",
        }
    }

    // Unknown keys fall back to the default order
    pub fn parse_lenient(s: &str) -> SortKey {
        s.parse().unwrap_or_default()
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown sort key: {0}")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "default" | "" => Ok(SortKey::Default),
            "name-asc" => Ok(SortKey::NameAsc),
            "name-desc" => Ok(SortKey::NameDesc),
            "price-asc" => Ok(SortKey::PriceAsc),
            "price-desc" => Ok(SortKey::PriceDesc),
            "rating-desc" => Ok(SortKey::RatingDesc),
            other => Err(UnknownSortKey(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryCriteria {
    pub text: String,
    pub guests: Option<String>,
}

impl QueryCriteria {
    pub fn new(text: impl Into<String>, guests: Option<String>) -> Self {
        Self {
            text: text.into(),
            guests: normalize_guests(guests),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(text, None)
    }

    // The raw text is matched; only the empty string matches everything
    fn matches_text(&self, hotel: &HotelRecord) -> bool {
        let needle = self.text.to_lowercase();
        if needle.is_empty() {
            return true;
        }

        let contains = |field: &str| field.to_lowercase().contains(&needle);

        contains(hotel.name.as_str())
            || contains(hotel.location.as_str())
            || contains(hotel.description.as_str())
            || hotel.amenities.iter().any(|a| contains(a.as_str()))
    }

    fn matches_guests(&self, hotel: &HotelRecord) -> bool {
        self.guests
            .as_deref()
            .map_or(true, |capacity| hotel.supports_guests(capacity))
    }
}

// Blank strings and the "All Guests" sentinel disable the guest filter
pub fn normalize_guests(guests: Option<String>) -> Option<String> {
    guests.filter(|g| {
        let g = g.trim();
        !g.is_empty() && g != ALL_GUESTS
    })
}

pub fn filter_hotels(hotels: &[HotelRecord], criteria: &QueryCriteria) -> Vec<HotelRecord> {
    hotels
        .iter()
        .filter(|h| criteria.matches_text(h))
        .filter(|h| criteria.matches_guests(h))
        .cloned()
        .collect()
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

// Stable, non-mutating; `Default` returns the input order unchanged.
// Prices sort by the base price the policy would charge.
pub fn sort_hotels(hotels: &[HotelRecord], sort_key: SortKey, policy: &PricingPolicy) -> Vec<HotelRecord> {
    let mut sorted = hotels.to_vec();
    let price = |h: &HotelRecord| policy.base_price(h.price_numeric);

    match sort_key {
        SortKey::Default => {}
        SortKey::NameAsc => sorted.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortKey::NameDesc => sorted.sort_by(|a, b| compare_names(&b.name, &a.name)),
        SortKey::PriceAsc => sorted.sort_by(|a, b| price(a).total_cmp(&price(b))),
        SortKey::PriceDesc => sorted.sort_by(|a, b| price(b).total_cmp(&price(a))),
        SortKey::RatingDesc => sorted.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
    }

    sorted
}

pub fn run_query(
    catalog: &Catalog,
    criteria: &QueryCriteria,
    sort_key: SortKey,
    policy: &PricingPolicy,
) -> Vec<HotelRecord> {
    sort_hotels(&filter_hotels(catalog.hotels(), criteria), sort_key, policy)
}

// Listing state: the filter-stage output is kept apart from the displayed
// order so that switching back to `Default` restores it exactly
#[derive(Debug, Clone)]
pub struct ResultsView {
    catalog: Catalog,
    criteria: QueryCriteria,
    pricing: PricingPolicy,
    sort_key: SortKey,
    filtered: Vec<HotelRecord>,
    displayed: Vec<HotelRecord>,
}

impl ResultsView {
    pub fn new(catalog: Catalog, criteria: QueryCriteria, pricing: PricingPolicy) -> Self {
        let filtered = filter_hotels(catalog.hotels(), &criteria);
        Self {
            catalog,
            criteria,
            pricing,
            sort_key: SortKey::Default,
            displayed: filtered.clone(),
            filtered,
        }
    }

    // New criteria always reset the sort override
    pub fn apply_criteria(&mut self, criteria: QueryCriteria) {
        self.criteria = criteria;
        self.refilter();
    }

    pub fn refresh_catalog(&mut self, catalog: Catalog) {
        self.catalog = catalog;
        self.refilter();
    }

    pub fn set_sort(&mut self, sort_key: SortKey) {
        self.sort_key = sort_key;
        self.displayed = sort_hotels(&self.filtered, sort_key, &self.pricing);
    }

    fn refilter(&mut self) {
        self.filtered = filter_hotels(self.catalog.hotels(), &self.criteria);
        self.sort_key = SortKey::Default;
        self.displayed = self.filtered.clone();
    }

    pub fn criteria(&self) -> &QueryCriteria {
        &self.criteria
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn filtered(&self) -> &[HotelRecord] {
        &self.filtered
    }

    pub fn displayed(&self) -> &[HotelRecord] {
        &self.displayed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::hotel;

    fn sample_catalog() -> Catalog {
        Catalog::new(vec![
            hotel(1, "B", "Bangkok", 1000.0, 4.0),
            hotel(2, "A", "Chiang Mai", 500.0, 4.5),
            hotel(3, "C", "Phuket", 1500.0, 3.0),
        ])
    }

    fn policy() -> PricingPolicy {
        PricingPolicy::default()
    }

    fn ids(hotels: &[HotelRecord]) -> Vec<u32> {
        hotels.iter().map(|h| h.id).collect()
    }

    fn prices(hotels: &[HotelRecord]) -> Vec<f64> {
        hotels.iter().filter_map(|h| h.price_numeric).collect()
    }

    fn names(hotels: &[HotelRecord]) -> Vec<&str> {
        hotels.iter().map(|h| h.name.as_str()).collect()
    }

    #[test]
    fn test_sort_example() {
        let catalog = sample_catalog();
        let criteria = QueryCriteria::default();

        let by_price = run_query(&catalog, &criteria, SortKey::PriceAsc, &policy());
        assert_eq!(prices(&by_price), vec![500.0, 1000.0, 1500.0]);

        let by_name = run_query(&catalog, &criteria, SortKey::NameAsc, &policy());
        assert_eq!(names(&by_name), vec!["A", "B", "C"]);

        let default = run_query(&catalog, &criteria, SortKey::Default, &policy());
        assert_eq!(ids(&default), vec![1, 2, 3]);
    }

    #[test]
    fn test_descending_sorts() {
        let catalog = sample_catalog();
        let criteria = QueryCriteria::default();

        assert_eq!(
            prices(&run_query(&catalog, &criteria, SortKey::PriceDesc, &policy())),
            vec![1500.0, 1000.0, 500.0]
        );
        assert_eq!(
            names(&run_query(&catalog, &criteria, SortKey::NameDesc, &policy())),
            vec!["C", "B", "A"]
        );
        assert_eq!(
            ids(&run_query(&catalog, &criteria, SortKey::RatingDesc, &policy())),
            vec![2, 1, 3]
        );
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let hotels = vec![
            hotel(1, "X", "L", 100.0, 4.0),
            hotel(2, "Y", "L", 100.0, 4.0),
            hotel(3, "Z", "L", 50.0, 4.0),
            hotel(4, "W", "L", 100.0, 4.0),
        ];

        assert_eq!(ids(&sort_hotels(&hotels, SortKey::PriceAsc, &policy())), vec![3, 1, 2, 4]);
        assert_eq!(ids(&sort_hotels(&hotels, SortKey::PriceDesc, &policy())), vec![1, 2, 4, 3]);
        assert_eq!(ids(&sort_hotels(&hotels, SortKey::RatingDesc, &policy())), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_unpriced_hotel_sorts_at_default_price() {
        let mut unpriced = hotel(1, "Hostel", "L", 0.0, 3.0);
        unpriced.price_numeric = None;
        let hotels = vec![
            unpriced,
            hotel(2, "Cheap", "L", 500.0, 4.0),
            hotel(3, "Dear", "L", 1500.0, 4.0),
        ];

        assert_eq!(ids(&sort_hotels(&hotels, SortKey::PriceAsc, &policy())), vec![2, 1, 3]);

        let cheap_default = PricingPolicy {
            default_base_price: 100.0,
            ..Default::default()
        };
        assert_eq!(ids(&sort_hotels(&hotels, SortKey::PriceAsc, &cheap_default)), vec![1, 2, 3]);
    }

    #[test]
    fn test_whitespace_query_is_matched_literally() {
        let catalog = sample_catalog();
        assert!(filter_hotels(catalog.hotels(), &QueryCriteria::text("   ")).is_empty());
        assert_eq!(filter_hotels(catalog.hotels(), &QueryCriteria::text("")).len(), 3);
    }

    #[test]
    fn test_name_collation_ignores_case() {
        let hotels = vec![
            hotel(1, "bravo", "L", 1.0, 1.0),
            hotel(2, "Alpha", "L", 1.0, 1.0),
            hotel(3, "Charlie", "L", 1.0, 1.0),
        ];
        assert_eq!(
            names(&sort_hotels(&hotels, SortKey::NameAsc, &policy())),
            vec!["Alpha", "bravo", "Charlie"]
        );
    }

    #[test]
    fn test_sort_does_not_mutate_input() {
        let catalog = sample_catalog();
        let _ = sort_hotels(catalog.hotels(), SortKey::NameAsc, &policy());
        assert_eq!(ids(catalog.hotels()), vec![1, 2, 3]);
    }

    #[test]
    fn test_text_filter_or_semantics() {
        let mut spa = hotel(1, "Riverside", "Bangkok", 1000.0, 4.0);
        spa.amenities = vec!["Spa".to_string(), "Gym".to_string()];
        let mut described = hotel(2, "Hillside", "Chiang Mai", 500.0, 4.0);
        described.description = "A quiet SPA retreat".to_string();
        let plain = hotel(3, "Seaside", "Phuket", 800.0, 4.0);
        let catalog = Catalog::new(vec![spa, described, plain]);

        let result = filter_hotels(catalog.hotels(), &QueryCriteria::text("spa"));
        assert_eq!(ids(&result), vec![1, 2]);

        let result = filter_hotels(catalog.hotels(), &QueryCriteria::text("PHUKET"));
        assert_eq!(ids(&result), vec![3]);

        let result = filter_hotels(catalog.hotels(), &QueryCriteria::text("side"));
        assert_eq!(ids(&result), vec![1, 2, 3]);
    }

    #[test]
    fn test_amenity_only_match_is_included() {
        let mut gym = hotel(1, "Plain Name", "Plain Place", 1.0, 1.0);
        gym.amenities = vec!["Rooftop Gym".to_string()];
        let result = filter_hotels(&[gym], &QueryCriteria::text("gym"));
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_guest_filter_exact_membership() {
        let mut h = hotel(1, "A", "L", 1.0, 1.0);
        h.guests = vec!["2 adult, 0 children - 1 room".to_string()];
        let no_guests = hotel(2, "B", "L", 1.0, 1.0);
        let hotels = vec![h, no_guests];

        let exact = QueryCriteria::new("", Some("2 adult, 0 children - 1 room".to_string()));
        assert_eq!(ids(&filter_hotels(&hotels, &exact)), vec![1]);

        let other = QueryCriteria::new("", Some("2 adult, 1 children - 1 room".to_string()));
        assert!(filter_hotels(&hotels, &other).is_empty());

        let all = QueryCriteria::new("", Some(ALL_GUESTS.to_string()));
        assert_eq!(all.guests, None);
        assert_eq!(ids(&filter_hotels(&hotels, &all)), vec![1, 2]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let mut catalog_hotels = sample_catalog().hotels().to_vec();
        catalog_hotels[0].amenities = vec!["Pool".to_string()];
        let criteria = QueryCriteria::text("o");

        let once = filter_hotels(&catalog_hotels, &criteria);
        let twice = filter_hotels(&once, &criteria);
        assert_eq!(once, twice);
        assert_eq!(once, filter_hotels(&catalog_hotels, &criteria));
    }

    #[test]
    fn test_empty_result_is_valid() {
        let result = run_query(&sample_catalog(), &QueryCriteria::text("zzz"), SortKey::PriceAsc, &policy());
        assert!(result.is_empty());
    }

    #[test]
    fn test_results_view_restores_default_order() {
        let mut view = ResultsView::new(sample_catalog(), QueryCriteria::default(), policy());
        assert_eq!(ids(view.displayed()), vec![1, 2, 3]);

        view.set_sort(SortKey::PriceDesc);
        assert_eq!(ids(view.displayed()), vec![3, 1, 2]);
        view.set_sort(SortKey::NameAsc);
        assert_eq!(ids(view.displayed()), vec![2, 1, 3]);

        view.set_sort(SortKey::Default);
        assert_eq!(ids(view.displayed()), vec![1, 2, 3]);
        assert_eq!(view.filtered(), view.displayed());
    }

    #[test]
    fn test_results_view_resets_sort_on_new_criteria() {
        let mut view = ResultsView::new(sample_catalog(), QueryCriteria::default(), policy());
        view.set_sort(SortKey::PriceAsc);
        assert_eq!(view.sort_key(), SortKey::PriceAsc);

        view.apply_criteria(QueryCriteria::text("a"));
        assert_eq!(view.sort_key(), SortKey::Default);
        assert_eq!(view.displayed(), view.filtered());
        assert_eq!(view.criteria().text, "a");
    }

    #[test]
    fn test_results_view_refresh_catalog() {
        let mut view = ResultsView::new(sample_catalog(), QueryCriteria::default(), policy());
        view.set_sort(SortKey::RatingDesc);

        view.refresh_catalog(Catalog::new(vec![hotel(9, "New", "L", 1.0, 1.0)]));
        assert_eq!(ids(view.displayed()), vec![9]);
        assert_eq!(view.sort_key(), SortKey::Default);
    }

    #[test]
    fn test_sort_key_parsing() {
        for key in [
            SortKey::Default,
            SortKey::NameAsc,
            SortKey::NameDesc,
            SortKey::PriceAsc,
            SortKey::PriceDesc,
            SortKey::RatingDesc,
        ] {
            assert_eq!(key.as_str().parse::<SortKey>(), Ok(key));
        }
        let err = "cheapest".parse::<SortKey>().unwrap_err();
        assert_eq!(err, UnknownSortKey("cheapest".to_string()));
        assert_eq!(err.to_string(), "unknown sort key: cheapest");
        assert_eq!(SortKey::parse_lenient("cheapest"), SortKey::Default);
    }
}

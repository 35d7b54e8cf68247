use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use hotel_booking_flow::booking::BookingStatus;
use hotel_booking_flow::{
    simulate_payment, BookingParams, BookingStep, GuestDetails, HotelService, PaymentMethod, PricingPolicy,
    SearchState, SortKey, StaticCatalogSource,
};

fn service() -> HotelService {
    HotelService::new(
        Arc::new(StaticCatalogSource::embedded()),
        Duration::from_secs(60),
        PricingPolicy::default(),
    )
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn search_to_confirmation() {
    let service = service();

    // Search page -> results page
    let mut search = SearchState::new(date(2025, 12, 20));
    search.set_location("Thailand");
    search.set_guests("2 adult, 1 children - 1 room");
    search.set_check_out(date(2025, 12, 23));
    search.set_room_type("Deluxe Room");

    let restored = SearchState::from_query_string(&search.to_query_string(), date(2025, 1, 1));
    assert_eq!(restored.criteria(), search.criteria());
    assert_eq!(restored.nights(), 3);

    let mut view = service.results_view(&restored).await.unwrap();
    let ids: Vec<u32> = view.displayed().iter().map(|h| h.id).collect();
    assert_eq!(ids, vec![1, 3]);

    view.set_sort(SortKey::PriceDesc);
    let ids: Vec<u32> = view.displayed().iter().map(|h| h.id).collect();
    assert_eq!(ids, vec![3, 1]);

    // Detail page -> review page
    let hotel_id = view.displayed()[0].id;
    let detail = service.hotel_detail(hotel_id).await.unwrap();
    assert_eq!(detail.rating_text, "Excellent");

    let params = service.start_booking(hotel_id, &restored).await.unwrap();
    assert_eq!(params.cost.room_type, "Deluxe Room");
    assert_eq!(params.cost.days, 3);
    assert!((params.cost.subtotal - 1500.0 * 1.3 * 3.0).abs() < 1e-6);

    // Review page -> payment page, carried only in the URL
    let payment_url = BookingStep::Payment.path(&params);
    let query = payment_url.split_once('?').map(|(_, q)| q).unwrap();
    let on_payment_page = BookingParams::from_query_string(query);
    assert_eq!(on_payment_page.cost.total, params.cost.total);
    assert_eq!(on_payment_page.guests.as_deref(), Some("2 adult, 1 children - 1 room"));

    let guest = GuestDetails {
        first_name: "Anong".to_string(),
        last_name: "Suksan".to_string(),
        email: "anong@example.com".to_string(),
        mobile: "0812345678".to_string(),
        special_request: "Late check-in".to_string(),
    };
    let confirmation = simulate_payment(&on_payment_page, &guest, PaymentMethod::CreditCard).unwrap();
    assert_eq!(confirmation.status, BookingStatus::Confirmed);
    assert_eq!(confirmation.hotel_id, Some(3));
    assert_eq!(BookingStep::Payment.next().path(&on_payment_page), "/success");
}

#[tokio::test]
async fn changing_criteria_resets_sort() {
    let service = service();
    let search = SearchState::new(date(2025, 6, 1));
    let mut view = service.results_view(&search).await.unwrap();
    let default_order: Vec<u32> = view.displayed().iter().map(|h| h.id).collect();

    view.set_sort(SortKey::RatingDesc);
    assert_ne!(
        view.displayed().iter().map(|h| h.id).collect::<Vec<_>>(),
        default_order
    );

    let mut narrowed = search.clone();
    narrowed.set_search_query("gym");
    view.apply_criteria(narrowed.criteria());
    assert_eq!(view.sort_key(), SortKey::Default);
    let ids: Vec<u32> = view.displayed().iter().map(|h| h.id).collect();
    assert_eq!(ids, vec![1, 5]);

    view.apply_criteria(search.criteria());
    let ids: Vec<u32> = view.displayed().iter().map(|h| h.id).collect();
    assert_eq!(ids, default_order);
}

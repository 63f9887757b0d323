//! End-to-end ticket lifecycle through `TicketService`.
//!
//! Runs the service over the in-process adapters: sell, look up, refund,
//! open boarding, scan and report.

use std::sync::Arc;

use uuid::Uuid;

use ticket_core::adapters::{FixedDepartureSchedule, InMemoryEventBus, InMemoryTicketStore};
use ticket_core::application::{
    MarkBoardingCommand, SellTicketCommand, ServiceDeps, ServiceSettings, TicketService,
};
use ticket_core::domain::boarding::ScanMethod;
use ticket_core::domain::foundation::{Money, Timestamp, TripId, UserId};
use ticket_core::domain::refund::{PenaltyTiers, RefundPolicy};
use ticket_core::domain::ticket::{
    ConflictReason, ErrorKind, Passenger, PaymentMethod, TicketStatus,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Harness {
    service: TicketService,
    schedule: Arc<FixedDepartureSchedule>,
    events: Arc<InMemoryEventBus>,
}

fn harness_with(settings: ServiceSettings) -> Harness {
    let store = Arc::new(InMemoryTicketStore::new());
    let schedule = Arc::new(FixedDepartureSchedule::new());
    let events = Arc::new(InMemoryEventBus::new());
    let deps = ServiceDeps {
        tickets: store.clone(),
        boarding: store,
        schedule: schedule.clone(),
        events: events.clone(),
    };
    Harness {
        service: TicketService::new(deps, settings),
        schedule,
        events,
    }
}

fn harness() -> Harness {
    harness_with(ServiceSettings::default())
}

fn sale(trip_id: TripId, seat: Option<&str>, price: i64) -> SellTicketCommand {
    SellTicketCommand {
        trip_id,
        seat_id: seat.map(str::to_string),
        price: Money::from_major(price),
        payment_method: PaymentMethod::Cash,
        passenger: Passenger {
            name: Some("  Ana Perez ".to_string()),
            document: Some("".to_string()),
            ..Passenger::anonymous()
        },
    }
}

fn user(name: &str) -> UserId {
    UserId::new(name).unwrap()
}

// =============================================================================
// Selling and lookup
// =============================================================================

#[tokio::test]
async fn sold_ticket_is_active_and_reachable_by_every_key() {
    let h = harness();
    let trip = TripId::new();

    let ticket = h.service.sell_ticket(sale(trip, Some("12"), 850)).await.unwrap();

    assert_eq!(ticket.status, TicketStatus::Active);
    assert_eq!(ticket.price, Money::from_major(850));
    assert_eq!(ticket.passenger.name.as_deref(), Some("Ana Perez"));
    assert_eq!(ticket.passenger.document, None);
    assert_ne!(ticket.qr_code, ticket.bar_code);

    let by_id = h.service.get_ticket(ticket.id).await.unwrap();
    let by_qr = h.service.get_ticket_by_qr(&ticket.qr_code).await.unwrap();
    let by_bar = h.service.get_ticket_by_bar_code(&ticket.bar_code).await.unwrap();
    assert_eq!(by_id, ticket);
    assert_eq!(by_qr, ticket);
    assert_eq!(by_bar, ticket);

    let sold = h.events.events_of_type("ticket.sold");
    assert_eq!(sold.len(), 1);
    assert_eq!(sold[0].aggregate_id, ticket.id.to_string());
}

#[tokio::test]
async fn invalid_sales_are_rejected_without_side_effects() {
    let h = harness();
    let trip = TripId::new();

    let zero_price = h.service.sell_ticket(sale(trip, None, 0)).await.unwrap_err();
    let nil_trip = h
        .service
        .sell_ticket(sale(TripId::from_uuid(Uuid::nil()), None, 100))
        .await
        .unwrap_err();

    assert_eq!(zero_price.kind(), ErrorKind::Validation);
    assert_eq!(nil_trip.kind(), ErrorKind::Validation);
    assert!(h.service.list_tickets_by_trip(trip).await.unwrap().is_empty());
    assert_eq!(h.events.event_count(), 0);
}

#[tokio::test]
async fn unknown_codes_are_not_found() {
    let h = harness();

    let by_qr = h.service.get_ticket_by_qr("TK-nothing").await.unwrap_err();
    let by_bar = h.service.get_ticket_by_bar_code("000000000000").await.unwrap_err();

    assert_eq!(by_qr.kind(), ErrorKind::NotFound);
    assert_eq!(by_bar.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn taken_seat_is_a_conflict_until_returned() {
    let h = harness();
    let trip = TripId::new();
    let first = h.service.sell_ticket(sale(trip, Some("3A"), 500)).await.unwrap();

    let err = h.service.sell_ticket(sale(trip, Some("3A"), 500)).await.unwrap_err();
    assert_eq!(err.conflict_reason(), Some(ConflictReason::SeatTaken));

    h.service.refund_ticket(first.id, user("cashier")).await.unwrap();
    let resold = h.service.sell_ticket(sale(trip, Some("3A"), 500)).await.unwrap();

    assert_eq!(resold.seat_id, first.seat_id);
    let listed = h.service.list_tickets_by_trip(trip).await.unwrap();
    assert_eq!(
        listed.iter().map(|t| t.id).collect::<Vec<_>>(),
        vec![first.id, resold.id]
    );
}

// =============================================================================
// Refunds
// =============================================================================

#[tokio::test]
async fn refund_tiers_follow_departure() {
    let cases = [
        (48, Money::from_major(100)),
        (24, Money::from_major(200)),
        (12, Money::from_major(300)),
        (1, Money::from_major(300)),
    ];

    for (hours, expected_penalty) in cases {
        let h = harness();
        let trip = TripId::new();
        // A minute of slack keeps the boundary cases on the lower tier.
        h.schedule.set(trip, Timestamp::now().plus_hours(hours).plus_minutes(-1));
        let ticket = h.service.sell_ticket(sale(trip, None, 1000)).await.unwrap();

        let quote = h.service.refund_ticket(ticket.id, user("cashier")).await.unwrap();

        assert_eq!(quote.penalty, expected_penalty, "{}h before departure", hours);
        assert_eq!(
            quote.refund_amount.saturating_add(quote.penalty),
            ticket.price,
            "{}h before departure",
            hours
        );
    }
}

#[tokio::test]
async fn departed_trip_uses_highest_penalty() {
    let h = harness();
    let trip = TripId::new();
    h.schedule.set(trip, Timestamp::now().plus_hours(-3));
    let ticket = h.service.sell_ticket(sale(trip, None, 1000)).await.unwrap();

    let quote = h.service.refund_ticket(ticket.id, user("cashier")).await.unwrap();

    assert_eq!(quote.refund_amount, Money::from_major(700));
}

#[tokio::test]
async fn configured_tiers_are_applied() {
    let tiers = PenaltyTiers::new(0.0, 0.5, 1.0).unwrap();
    let h = harness_with(ServiceSettings {
        policy: RefundPolicy::new(tiers, 25.0),
        ..ServiceSettings::default()
    });
    let ticket = h.service.sell_ticket(sale(TripId::new(), None, 400)).await.unwrap();

    // No departure known: the fallback lead time lands in the first tier.
    let quote = h.service.refund_ticket(ticket.id, user("cashier")).await.unwrap();

    assert_eq!(quote.penalty, Money::ZERO);
    assert_eq!(quote.refund_amount, Money::from_major(400));
}

#[tokio::test]
async fn refunded_ticket_records_amounts_and_stays_returned() {
    let h = harness();
    let trip = TripId::new();
    h.schedule.set(trip, Timestamp::now().plus_hours(30));
    let ticket = h.service.sell_ticket(sale(trip, Some("8"), 1000)).await.unwrap();

    h.service.refund_ticket(ticket.id, user("cashier")).await.unwrap();
    let again = h.service.refund_ticket(ticket.id, user("cashier")).await.unwrap_err();

    let stored = h.service.get_ticket(ticket.id).await.unwrap();
    assert_eq!(stored.status, TicketStatus::Returned);
    let refund = stored.refund.unwrap();
    assert_eq!(refund.refund_amount, Money::from_major(900));
    assert_eq!(refund.refund_penalty, Money::from_major(100));
    assert_eq!(again.conflict_reason(), Some(ConflictReason::TicketNotActive));

    assert_eq!(h.events.events_of_type("ticket.returned").len(), 1);
    let audit = h.events.events_of_type("audit.log");
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].metadata.user_id.as_deref(), Some("cashier"));
}

#[tokio::test]
async fn event_amounts_share_major_units() {
    let h = harness();
    let trip = TripId::new();
    h.schedule.set(trip, Timestamp::now().plus_hours(30));
    let ticket = h.service.sell_ticket(sale(trip, None, 1000)).await.unwrap();
    h.service.refund_ticket(ticket.id, user("cashier")).await.unwrap();

    let sold = h.events.events_of_type("ticket.sold");
    let returned = h.events.events_of_type("ticket.returned");
    let audit = h.events.events_of_type("audit.log");

    assert_eq!(sold[0].payload["ticket"]["price"], 1000.0);
    assert_eq!(returned[0].payload["ticket"]["price"], 1000.0);
    assert_eq!(returned[0].payload["ticket"]["refund"]["refund_amount"], 900.0);
    assert_eq!(returned[0].payload["ticket"]["refund"]["refund_penalty"], 100.0);
    assert_eq!(audit[0].payload["old_value"], sold[0].payload["ticket"]["price"]);
    assert_eq!(
        audit[0].payload["new_value"],
        returned[0].payload["ticket"]["refund"]["refund_amount"]
    );
}

#[tokio::test]
async fn sales_stats_count_returns_and_retained_penalties() {
    let h = harness();
    let trip = TripId::new();
    h.schedule.set(trip, Timestamp::now().plus_hours(5));
    let kept = h.service.sell_ticket(sale(trip, None, 1000)).await.unwrap();
    let returned = h.service.sell_ticket(sale(trip, None, 1000)).await.unwrap();
    h.service.refund_ticket(returned.id, user("cashier")).await.unwrap();

    let stats = h.service.get_sales_stats(kept.created_at.date()).await.unwrap();

    assert_eq!(stats.tickets_sold, 2);
    assert_eq!(stats.tickets_returned, 1);
    assert_eq!(stats.revenue, Money::from_major(1300));

    let other_day = kept.created_at.date().pred_opt().unwrap();
    let empty = h.service.get_sales_stats(other_day).await.unwrap();
    assert_eq!(empty.tickets_sold, 0);
}

// =============================================================================
// Boarding
// =============================================================================

#[tokio::test]
async fn boarding_flow_end_to_end() {
    let h = harness();
    let trip = TripId::new();
    let first = h.service.sell_ticket(sale(trip, Some("1"), 600)).await.unwrap();
    let second = h.service.sell_ticket(sale(trip, Some("2"), 600)).await.unwrap();
    let returned = h.service.sell_ticket(sale(trip, Some("3"), 600)).await.unwrap();
    h.service.refund_ticket(returned.id, user("cashier")).await.unwrap();

    let early = h
        .service
        .mark_boarding(MarkBoardingCommand {
            ticket_id: first.id,
            marked_by: user("controller"),
            scan_method: ScanMethod::Manual,
        })
        .await
        .unwrap_err();
    assert_eq!(early.conflict_reason(), Some(ConflictReason::BoardingNotStarted));

    let gate = h.service.start_boarding(trip, user("dispatcher")).await.unwrap();
    let twice = h.service.start_boarding(trip, user("dispatcher")).await.unwrap_err();
    assert_eq!(twice.conflict_reason(), Some(ConflictReason::BoardingAlreadyStarted));

    let scanned = h.service.scan_ticket(&first.qr_code, user("controller")).await.unwrap();
    assert_eq!(scanned.mark.scan_method, ScanMethod::Qr);
    let rescanned = h
        .service
        .scan_ticket(&first.bar_code, user("controller"))
        .await
        .unwrap_err();
    assert_eq!(rescanned.conflict_reason(), Some(ConflictReason::AlreadyMarked));
    let returned_scan = h
        .service
        .scan_ticket(&returned.qr_code, user("controller"))
        .await
        .unwrap_err();
    assert_eq!(returned_scan.conflict_reason(), Some(ConflictReason::TicketNotActive));

    let status = h.service.get_boarding_status(trip).await.unwrap();
    assert!(status.boarding_active);
    assert_eq!(status.started_at, Some(gate.started_at));
    let listed = h.service.list_tickets_by_trip(trip).await.unwrap();
    assert_eq!(status.total_tickets, listed.len() as u64);
    assert_eq!(status.total_tickets, 3);
    assert_eq!(status.boarded_count, 1);

    let refund = h.service.refund_ticket(second.id, user("cashier")).await.unwrap_err();
    assert_eq!(refund.conflict_reason(), Some(ConflictReason::BoardingAlreadyStarted));
    assert!(h.service.get_ticket(second.id).await.unwrap().is_active());

    let started = h.events.events_of_type("boarding.started");
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].metadata.user_id.as_deref(), Some("dispatcher"));
}

#[tokio::test]
async fn boarding_status_counts_returned_tickets() {
    let h = harness();
    let trip = TripId::new();
    h.service.sell_ticket(sale(trip, Some("1"), 600)).await.unwrap();
    let returned = h.service.sell_ticket(sale(trip, Some("2"), 600)).await.unwrap();
    h.service.refund_ticket(returned.id, user("cashier")).await.unwrap();

    let listed = h.service.list_tickets_by_trip(trip).await.unwrap();
    let status = h.service.get_boarding_status(trip).await.unwrap();

    assert_eq!(listed.len(), 2);
    assert_eq!(status.total_tickets, 2);
}

#[tokio::test]
async fn blank_or_unknown_scan_is_rejected() {
    let h = harness();

    let blank = h.service.scan_ticket("   ", user("controller")).await.unwrap_err();
    let unknown = h.service.scan_ticket("TK-unknown", user("controller")).await.unwrap_err();

    assert_eq!(blank.kind(), ErrorKind::Validation);
    assert_eq!(unknown.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn event_bus_outage_does_not_fail_operations() {
    let h = harness();
    h.events.set_failing(true);
    let trip = TripId::new();

    let ticket = h.service.sell_ticket(sale(trip, None, 300)).await.unwrap();
    h.service.start_boarding(trip, user("dispatcher")).await.unwrap();
    h.service.scan_ticket(&ticket.qr_code, user("controller")).await.unwrap();

    assert_eq!(h.events.event_count(), 0);
    let status = h.service.get_boarding_status(trip).await.unwrap();
    assert_eq!(status.boarded_count, 1);
}

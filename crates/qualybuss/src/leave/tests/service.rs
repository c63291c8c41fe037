use super::common::*;
use chrono::Duration;
use std::sync::Arc;

use crate::calendar::BlockReason;
use crate::leave::domain::{LeaveStatus, LeaveType};
use crate::leave::repository::LeaveRepository;
use crate::leave::service::{LeaveError, LeaveService};

#[tokio::test]
async fn submit_stores_pending_request() {
    let (service, repository) = build_service();

    let request = service.submit(vacation(), now()).await.expect("submitted");

    assert_eq!(request.status, LeaveStatus::Pending);
    assert_eq!(request.days(), 10);
    assert!(request.id.0.starts_with("leave-"));
    let stored = repository.fetch(&request.id).expect("fetch").expect("present");
    assert_eq!(stored, request);
}

#[tokio::test]
async fn submit_rejects_inverted_period() {
    let (service, _) = build_service();
    let mut submission = vacation();
    submission.end_date = date(2025, 11, 1);

    match service.submit(submission, now()).await {
        Err(LeaveError::InvalidPeriod { start, end }) => {
            assert_eq!(start, date(2025, 11, 5));
            assert_eq!(end, date(2025, 11, 1));
        }
        other => panic!("expected invalid period, got {other:?}"),
    }
}

#[tokio::test]
async fn vacation_before_holiday_is_refused() {
    let (service, repository) = build_service();
    let mut submission = vacation();
    // Tuesday, two days before Dia da Consciência Negra
    submission.start_date = date(2025, 11, 18);
    submission.end_date = date(2025, 11, 28);

    match service.submit(submission, now()).await {
        Err(LeaveError::BlockedStart { reasons, .. }) => {
            assert_eq!(
                reasons,
                vec![BlockReason::PrecedesHoliday {
                    name: "Dia da Consciência Negra".to_string(),
                    days_before: 2
                }]
            );
        }
        other => panic!("expected blocked start, got {other:?}"),
    }
    assert!(repository.list().expect("list").is_empty());
}

#[tokio::test]
async fn non_vacation_leave_skips_start_rules() {
    let (service, _) = build_service();
    let mut submission = vacation();
    submission.leave_type = LeaveType::SickNote;
    submission.start_date = date(2025, 11, 9);
    submission.end_date = date(2025, 11, 9);

    let request = service.submit(submission, now()).await.expect("sick note accepted");
    assert_eq!(request.leave_type, LeaveType::SickNote);
}

#[tokio::test]
async fn holiday_outage_fails_vacation_submission() {
    let repository = Arc::new(MemoryRepository::default());
    let service = LeaveService::new(repository, calendar(OfflineHolidays), &leave_config());

    assert!(matches!(
        service.submit(vacation(), now()).await,
        Err(LeaveError::Calendar(_))
    ));
}

#[tokio::test]
async fn approve_then_cancel_is_allowed() {
    let (service, _) = build_service();
    let request = service.submit(vacation(), now()).await.expect("submitted");

    let approved = service.approve(&request.id, now()).expect("approved");
    assert_eq!(approved.status, LeaveStatus::Approved);
    assert_eq!(approved.decided_at, Some(now()));

    let cancelled = service
        .cancel(&request.id, now() + Duration::minutes(1))
        .expect("cancelled");
    assert_eq!(cancelled.status, LeaveStatus::Cancelled);
    assert_eq!(cancelled.cancelled_at, Some(now() + Duration::minutes(1)));
}

#[tokio::test]
async fn decided_requests_are_terminal() {
    let (service, _) = build_service();
    let request = service.submit(vacation(), now()).await.expect("submitted");
    service.reject(&request.id, now()).expect("rejected");

    match service.approve(&request.id, now()) {
        Err(LeaveError::IllegalTransition { from, to }) => {
            assert_eq!(from, LeaveStatus::Rejected);
            assert_eq!(to, LeaveStatus::Approved);
        }
        other => panic!("expected illegal transition, got {other:?}"),
    }
}

#[tokio::test]
async fn cancelled_requests_disappear_after_visibility_window() {
    let (service, _) = build_service();
    let kept = service.submit(vacation(), now()).await.expect("kept");
    let dropped = service.submit(vacation(), now()).await.expect("dropped");
    service.cancel(&dropped.id, now()).expect("cancelled");

    let soon = service.visible(now() + Duration::minutes(9)).expect("list");
    assert_eq!(soon.len(), 2);

    let later = service.visible(now() + Duration::minutes(11)).expect("list");
    assert_eq!(later.len(), 1);
    assert_eq!(later[0].id, kept.id);
}

#[tokio::test]
async fn unknown_request_is_not_found() {
    let (service, _) = build_service();
    let missing = crate::leave::LeaveRequestId("leave-missing".to_string());
    assert!(matches!(
        service.cancel(&missing, now()),
        Err(LeaveError::NotFound(id)) if id == missing
    ));
}

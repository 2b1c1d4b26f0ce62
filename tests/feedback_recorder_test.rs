use cardio_sentinel::domain::error::{Collection, ServiceError};
use cardio_sentinel::domain::feedback::Usefulness;
use cardio_sentinel::domain::id::Reference;
use cardio_sentinel::infra::memory::MemoryRecordStore;
use cardio_sentinel::services::feedback_recorder::{FeedbackRecorder, FeedbackSubmission};
use chrono::Utc;
use std::sync::Arc;

fn recorder() -> (Arc<MemoryRecordStore>, FeedbackRecorder) {
    let store = Arc::new(MemoryRecordStore::new());
    (store.clone(), FeedbackRecorder::new(store))
}

#[tokio::test]
async fn incorrect_feedback_is_stored() {
    let (store, feedback) = recorder();
    let before = Utc::now();

    let entry = feedback
        .record(
            FeedbackSubmission::new("docA", "recB")
                .usefulness("incorrect")
                .comments("missed anomaly"),
        )
        .await
        .unwrap();

    assert_eq!(entry.doctor().as_str(), "docA");
    assert_eq!(entry.health_record().as_str(), "recB");
    assert_eq!(entry.usefulness(), Some(Usefulness::Incorrect));
    assert_eq!(entry.comments(), Some("missed anomaly"));
    assert_eq!(entry.alert(), None);
    assert!(entry.created_at() >= before);
    assert_eq!(store.feedback_count(), 1);

    let found = feedback.find(entry.id()).await.unwrap();
    assert_eq!(found, entry);
}

#[tokio::test]
async fn out_of_range_usefulness_is_rejected() {
    let (store, feedback) = recorder();

    for bad in ["wrong-value", "Useful", "USEFUL", "", " neutral"] {
        let err = feedback
            .record(FeedbackSubmission::new("docA", "recB").usefulness(bad))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)), "{bad:?}: {err}");
    }
    assert_eq!(store.feedback_count(), 0);
}

#[tokio::test]
async fn every_enumerated_value_is_accepted() {
    let (store, feedback) = recorder();

    for usefulness in Usefulness::ALL {
        let entry = feedback
            .record(FeedbackSubmission::new("docA", "recB").usefulness(usefulness.as_str()))
            .await
            .unwrap();
        assert_eq!(entry.usefulness(), Some(usefulness));
    }
    assert_eq!(store.feedback_count(), 3);
}

#[tokio::test]
async fn usefulness_is_optional() {
    let (_store, feedback) = recorder();
    let entry = feedback
        .record(FeedbackSubmission::new("docA", "recB"))
        .await
        .unwrap();
    assert_eq!(entry.usefulness(), None);
    assert_eq!(entry.comments(), None);
}

#[tokio::test]
async fn doctor_and_record_are_required() {
    let (store, feedback) = recorder();

    let err = feedback
        .record(FeedbackSubmission::new("", "recB"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(ref m) if m.contains("doctor")));

    let err = feedback
        .record(FeedbackSubmission::new("docA", "  "))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(ref m) if m.contains("healthRecord")));

    assert_eq!(store.feedback_count(), 0);
}

#[tokio::test]
async fn orphaned_references_are_accepted() {
    let (_store, feedback) = recorder();
    let entry = feedback
        .record(
            FeedbackSubmission::new("doctor-that-does-not-exist", "record-that-does-not-exist")
                .alert("alert-that-does-not-exist")
                .usefulness("useful"),
        )
        .await
        .unwrap();
    assert_eq!(
        entry.alert().map(Reference::as_str),
        Some("alert-that-does-not-exist")
    );
}

#[tokio::test]
async fn identical_submissions_are_not_deduplicated() {
    let (store, feedback) = recorder();
    let submission = FeedbackSubmission::new("docA", "recB").usefulness("neutral");

    let first = feedback.record(submission.clone()).await.unwrap();
    let second = feedback.record(submission).await.unwrap();

    assert_ne!(first.id(), second.id());
    assert_eq!(store.feedback_count(), 2);
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let (_store, feedback) = recorder();
    let err = feedback.find(uuid::Uuid::now_v7()).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            collection: Collection::Feedback,
            ..
        }
    ));
}

#[tokio::test]
async fn entry_serializes_with_camel_case_fields() {
    let (_store, feedback) = recorder();
    let entry = feedback
        .record(
            FeedbackSubmission::new("docA", "recB")
                .alert("al-1")
                .usefulness("useful"),
        )
        .await
        .unwrap();

    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["doctor"], "docA");
    assert_eq!(json["healthRecord"], "recB");
    assert_eq!(json["alert"], "al-1");
    assert_eq!(json["usefulness"], "useful");
    assert!(json["createdAt"].is_string());
}

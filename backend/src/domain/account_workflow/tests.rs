//! Unit tests for the account creation orchestrator.

use std::sync::{Arc, Mutex};

use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::ports::{
    AccountsApiError, ImageUrlSource, MockAccountsApi, MockImageUploader, UploadError,
};
use crate::domain::{AccountProfile, PROFILE_IMAGE_FIELD, PROFILE_PIC_FIELD};
use crate::test_support::sample_image;

const EMAIL: &str = "ada@example.com";

fn record(value: serde_json::Value) -> RemoteAccount {
    RemoteAccount::from_response(value)
}

#[fixture]
fn draft() -> AccountDraft {
    let profile = AccountProfile {
        first_name: Some("Ada".to_owned()),
        last_name: Some(String::new()),
        city: Some("string".to_owned()),
        ..AccountProfile::default()
    };
    AccountDraft::new(EMAIL, "External User", profile).expect("valid draft")
}

fn uploaded(url: &str, source: ImageUrlSource) -> UploadResult {
    UploadResult {
        image_url: url.to_owned(),
        source,
    }
}

fn workflow(accounts: MockAccountsApi, uploader: MockImageUploader) -> AccountCreationWorkflow {
    AccountCreationWorkflow::new(Arc::new(accounts), Arc::new(uploader))
}

#[rstest]
#[tokio::test]
async fn create_body_omits_blank_fields(draft: AccountDraft) {
    let mut accounts = MockAccountsApi::new();
    accounts
        .expect_create_account()
        .withf(|body| {
            body.get_str("firstName") == Some("Ada")
                && !body.contains_key("lastName")
                && !body.contains_key("city")
                && !body.contains_key(PROFILE_IMAGE_FIELD)
        })
        .times(1)
        .return_once(|_| Ok(record(json!({ "id": "7" }))));

    let outcome = workflow(accounts, MockImageUploader::new())
        .submit(draft)
        .await;

    assert!(matches!(outcome, WorkflowOutcome::Created { image: None, .. }));
}

#[rstest]
#[tokio::test]
async fn draft_without_image_skips_upload_and_patch(draft: AccountDraft) {
    let mut accounts = MockAccountsApi::new();
    accounts
        .expect_create_account()
        .times(1)
        .return_once(|_| Ok(record(json!({ "id": 7 }))));
    accounts.expect_list_accounts().never();
    accounts.expect_update_account().never();
    let mut uploader = MockImageUploader::new();
    uploader.expect_upload_profile_image().never();
    let (progress, receiver) = WorkflowProgress::channel();

    let outcome = workflow(accounts, uploader)
        .submit_observed(draft, &progress)
        .await;

    assert_eq!(
        outcome,
        WorkflowOutcome::Created {
            id: AccountId::new("7").expect("id"),
            image: None,
        }
    );
    assert_eq!(*receiver.borrow(), WorkflowState::Done);
}

#[rstest]
#[tokio::test]
async fn uploaded_url_is_patched_into_both_image_fields(draft: AccountDraft) {
    let patched = Arc::new(Mutex::new(None::<RemoteAccount>));
    let captured = Arc::clone(&patched);

    let mut accounts = MockAccountsApi::new();
    accounts
        .expect_create_account()
        .times(1)
        .return_once(|_| Ok(record(json!({ "id": "42", "email": EMAIL, "county": "string" }))));
    accounts
        .expect_update_account()
        .withf(|id, _| id.as_str() == "42")
        .times(1)
        .returning(move |_, body| {
            *captured.lock().expect("capture lock") = Some(body.clone());
            Ok(())
        });
    let mut uploader = MockImageUploader::new();
    uploader
        .expect_upload_profile_image()
        .withf(|id, _, style| id.as_str() == "42" && *style == PlaceholderStyle::Timestamped)
        .times(1)
        .return_once(|_, _, _| {
            Ok(uploaded(
                "http://x/y.png",
                ImageUrlSource::StructuredField("url".to_owned()),
            ))
        });
    let (progress, receiver) = WorkflowProgress::channel();

    let outcome = workflow(accounts, uploader)
        .submit_observed(draft.with_staged_image(sample_image()), &progress)
        .await;

    assert!(matches!(outcome, WorkflowOutcome::Created { image: Some(_), .. }));
    assert_eq!(*receiver.borrow(), WorkflowState::Done);
    let body = patched
        .lock()
        .expect("capture lock")
        .clone()
        .expect("patch sent");
    assert_eq!(body.get_str(PROFILE_IMAGE_FIELD), Some("http://x/y.png"));
    assert_eq!(body.get_str(PROFILE_PIC_FIELD), Some("http://x/y.png"));
    assert_eq!(body.get_str("id"), Some("42"));
    assert_eq!(body.get_str("firstName"), Some("Ada"));
    assert_eq!(body.get_str("county"), Some(""));
}

#[rstest]
#[tokio::test]
async fn missing_id_is_resolved_by_exact_email(draft: AccountDraft) {
    let mut accounts = MockAccountsApi::new();
    accounts
        .expect_create_account()
        .times(1)
        .return_once(|_| Ok(RemoteAccount::default()));
    accounts.expect_list_accounts().times(1).return_once(|| {
        Ok(vec![
            record(json!({ "id": "1", "email": "ADA@example.com" })),
            record(json!({ "id": "2", "email": EMAIL })),
            record(json!({ "id": "3", "email": EMAIL })),
        ])
    });

    let outcome = workflow(accounts, MockImageUploader::new())
        .submit(draft)
        .await;

    assert_eq!(
        outcome.account_id().map(AccountId::as_str),
        Some("2"),
        "first exact, case-sensitive match wins"
    );
}

#[rstest]
#[case::no_match(Ok(vec![RemoteAccount::from_response(json!({ "id": "1", "email": "other@example.com" }))]))]
#[case::match_without_id(Ok(vec![RemoteAccount::from_response(json!({ "email": EMAIL }))]))]
#[case::list_failed(Err(AccountsApiError::rejected(500_u16, "boom")))]
#[tokio::test]
async fn unresolved_identifier_stops_before_upload(
    draft: AccountDraft,
    #[case] listed: Result<Vec<RemoteAccount>, AccountsApiError>,
) {
    let mut accounts = MockAccountsApi::new();
    accounts
        .expect_create_account()
        .times(1)
        .return_once(|_| Ok(record(json!({ "email": EMAIL }))));
    accounts
        .expect_list_accounts()
        .times(1)
        .return_once(move || listed);
    accounts.expect_update_account().never();
    let mut uploader = MockImageUploader::new();
    uploader.expect_upload_profile_image().never();
    let (progress, receiver) = WorkflowProgress::channel();

    let outcome = workflow(accounts, uploader)
        .submit_observed(draft.with_staged_image(sample_image()), &progress)
        .await;

    assert!(matches!(outcome, WorkflowOutcome::CreatedLookupFailed { .. }));
    assert!(outcome.is_created());
    assert_eq!(*receiver.borrow(), WorkflowState::PartialFailure);
}

#[rstest]
#[tokio::test]
async fn create_failure_is_fatal_and_surfaces_backend_message(draft: AccountDraft) {
    let mut accounts = MockAccountsApi::new();
    accounts
        .expect_create_account()
        .times(1)
        .return_once(|_| Err(AccountsApiError::rejected(409_u16, "Email already exists")));
    accounts.expect_list_accounts().never();
    let mut uploader = MockImageUploader::new();
    uploader.expect_upload_profile_image().never();
    let (progress, receiver) = WorkflowProgress::channel();

    let outcome = workflow(accounts, uploader)
        .submit_observed(draft.with_staged_image(sample_image()), &progress)
        .await;

    assert_eq!(
        outcome,
        WorkflowOutcome::Failed {
            message: "Email already exists".to_owned(),
        }
    );
    assert!(!outcome.is_created());
    assert_eq!(*receiver.borrow(), WorkflowState::Failed);
}

#[rstest]
#[tokio::test]
async fn upload_failure_reports_created_image_failed(draft: AccountDraft) {
    let mut accounts = MockAccountsApi::new();
    accounts
        .expect_create_account()
        .times(1)
        .return_once(|_| Ok(record(json!({ "id": "42" }))));
    accounts.expect_update_account().never();
    let mut uploader = MockImageUploader::new();
    uploader
        .expect_upload_profile_image()
        .times(1)
        .return_once(|_, _, _| Err(UploadError::rejected(502_u16, "bad gateway")));

    let outcome = workflow(accounts, uploader)
        .submit(draft.with_staged_image(sample_image()))
        .await;

    match outcome {
        WorkflowOutcome::CreatedImageFailed { id, stage, .. } => {
            assert_eq!(id.as_str(), "42");
            assert_eq!(stage, ImageStage::Upload);
        }
        other => panic!("expected CreatedImageFailed, got {other:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn patch_failure_never_becomes_failed(draft: AccountDraft) {
    let mut accounts = MockAccountsApi::new();
    accounts
        .expect_create_account()
        .times(1)
        .return_once(|_| Ok(record(json!({ "id": "42" }))));
    accounts
        .expect_update_account()
        .times(1)
        .return_once(|_, _| Err(AccountsApiError::timeout("deadline exceeded")));
    let mut uploader = MockImageUploader::new();
    uploader
        .expect_upload_profile_image()
        .times(1)
        .return_once(|_, _, _| Ok(uploaded("https://img/42.jpg", ImageUrlSource::TextScan)));

    let outcome = workflow(accounts, uploader)
        .submit(draft.with_staged_image(sample_image()))
        .await;

    assert!(matches!(
        outcome,
        WorkflowOutcome::CreatedImageFailed {
            stage: ImageStage::Patch,
            ..
        }
    ));
    assert_eq!(
        outcome.user_message(),
        "Account created, but failed to save profile image"
    );
}

#[rstest]
#[tokio::test]
async fn synthesized_url_still_reports_created(draft: AccountDraft) {
    let mut accounts = MockAccountsApi::new();
    accounts
        .expect_create_account()
        .times(1)
        .return_once(|_| Ok(record(json!({ "id": "42" }))));
    accounts
        .expect_update_account()
        .withf(|_, body| {
            body.get_str(PROFILE_IMAGE_FIELD)
                .is_some_and(|url| url.contains("temp-external-42-"))
        })
        .times(1)
        .return_once(|_, _| Ok(()));
    let mut uploader = MockImageUploader::new();
    uploader
        .expect_upload_profile_image()
        .times(1)
        .return_once(|_, _, _| {
            Ok(uploaded(
                "https://img/images/temp-external-42-1.jpg",
                ImageUrlSource::Synthesized,
            ))
        });

    let outcome = workflow(accounts, uploader)
        .submit(draft.with_staged_image(sample_image()))
        .await;

    match outcome {
        WorkflowOutcome::Created {
            image: Some(image), ..
        } => assert!(image.is_low_confidence()),
        other => panic!("expected Created with image, got {other:?}"),
    }
}

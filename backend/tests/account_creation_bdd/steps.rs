//! Step definitions for account creation behaviour tests.

use account_console::domain::ports::ImageUrlSource;
use account_console::domain::{
    AccountDraft, AccountProfile, ImageStage, PROFILE_IMAGE_FIELD, PROFILE_PIC_FIELD,
};
use rstest_bdd_macros::{given, then, when};

use super::*;

#[given("an account backend that returns the created account id")]
fn backend_returns_id(world: &AccountCreationWorld) {
    world
        .accounts
        .set(Arc::new(ScriptedAccounts::replying(Ok(created_record()), Vec::new())));
}

#[given("an account backend that omits the created account id")]
fn backend_omits_id(world: &AccountCreationWorld) {
    let listed = vec![
        RemoteAccount::from_response(json!({ "id": "7", "email": "ADA@example.com" })),
        created_record(),
    ];
    world.accounts.set(Arc::new(ScriptedAccounts::replying(
        Ok(RemoteAccount::default()),
        listed,
    )));
}

#[given("an account backend that rejects the create call")]
fn backend_rejects_create(world: &AccountCreationWorld) {
    world.accounts.set(Arc::new(ScriptedAccounts::replying(
        Err(AccountsApiError::rejected(409_u16, "Email already exists")),
        Vec::new(),
    )));
}

#[given("an image host that answers with an imageUrl field")]
fn host_answers_with_url(world: &AccountCreationWorld) {
    let body = json!({ "imageUrl": HOSTED_URL }).to_string();
    world.host.set(Arc::new(ScriptedHost::answering(200, body)));
}

#[given("an image host that answers with an empty body")]
fn host_answers_empty(world: &AccountCreationWorld) {
    world.host.set(Arc::new(ScriptedHost::answering(200, "")));
}

#[given("an image host that rejects the upload")]
fn host_rejects(world: &AccountCreationWorld) {
    world
        .host
        .set(Arc::new(ScriptedHost::answering(413, "Payload Too Large")));
}

#[when("an account is submitted with a profile image")]
fn submit_with_image(world: &AccountCreationWorld) {
    let image = StagedImage::new("avatar.png", Some("image/png".to_owned()), vec![1, 2, 3])
        .expect("staged image");
    let draft = AccountDraft::new(EMAIL, "External User", AccountProfile::default())
        .expect("draft")
        .with_staged_image(image);
    let workflow = world.workflow();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime");
    let outcome = runtime.block_on(workflow.submit(draft));
    world.outcome.set(outcome);
}

#[then("the account is created with its image attached")]
fn created_with_image(world: &AccountCreationWorld) {
    let outcome = world.outcome.get().expect("outcome");
    let WorkflowOutcome::Created { id, image } = outcome else {
        panic!("expected Created, got {outcome:?}");
    };
    assert_eq!(id.as_str(), ACCOUNT_ID);
    let image = image.expect("image attached");
    assert_eq!(image.image_url, HOSTED_URL);
    assert_eq!(
        image.source,
        ImageUrlSource::StructuredField("imageUrl".to_owned())
    );
}

#[then("the profile update carries the image URL in both fields")]
fn update_carries_both_fields(world: &AccountCreationWorld) {
    let accounts = world.accounts.get().expect("account backend");
    let updates = accounts.updates();
    assert_eq!(updates.len(), 1);
    let (id, body) = updates.first().expect("one update");
    assert_eq!(id.as_str(), ACCOUNT_ID);
    assert_eq!(body.get_str(PROFILE_IMAGE_FIELD), Some(HOSTED_URL));
    assert_eq!(body.get_str(PROFILE_PIC_FIELD), Some(HOSTED_URL));
    assert_eq!(body.get_str("email"), Some(EMAIL));
}

#[then("the attached image URL is a timestamped placeholder")]
fn timestamped_placeholder(world: &AccountCreationWorld) {
    let outcome = world.outcome.get().expect("outcome");
    let WorkflowOutcome::Created { image: Some(image), .. } = outcome else {
        panic!("expected Created with image, got {outcome:?}");
    };
    assert_eq!(
        image.image_url,
        format!("{PLACEHOLDER_BASE}images/temp-external-{ACCOUNT_ID}-{FIXED_MILLIS}.jpg")
    );
    assert!(image.is_low_confidence());
}

#[then("the account is created but the upload stage failed")]
fn upload_stage_failed(world: &AccountCreationWorld) {
    let outcome = world.outcome.get().expect("outcome");
    assert!(
        matches!(
            &outcome,
            WorkflowOutcome::CreatedImageFailed { id, stage: ImageStage::Upload, .. }
                if id.as_str() == ACCOUNT_ID
        ),
        "unexpected outcome {outcome:?}"
    );
    assert_eq!(
        outcome.user_message(),
        "Account created, but failed to save profile image"
    );
}

#[then("no profile update is sent")]
fn no_update(world: &AccountCreationWorld) {
    let accounts = world.accounts.get().expect("account backend");
    assert!(accounts.updates().is_empty());
}

#[then("the submission fails with the backend message")]
fn submission_fails(world: &AccountCreationWorld) {
    let outcome = world.outcome.get().expect("outcome");
    assert_eq!(
        outcome,
        WorkflowOutcome::Failed {
            message: "Email already exists".to_owned()
        }
    );
}

#[then("no image upload is attempted")]
fn no_upload(world: &AccountCreationWorld) {
    let host = world.host.get().expect("image host");
    assert_eq!(host.upload_count(), 0);
}

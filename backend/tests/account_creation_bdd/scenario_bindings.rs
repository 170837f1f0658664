//! Scenario bindings for account creation behaviour tests.

use rstest_bdd_macros::scenario;

use super::*;

#[scenario(
    path = "tests/features/account_creation.feature",
    name = "Image URL is read from the upload response"
)]
fn image_url_is_read_from_the_upload_response(world: AccountCreationWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/account_creation.feature",
    name = "Identifier is recovered by listing accounts"
)]
fn identifier_is_recovered_by_listing_accounts(world: AccountCreationWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/account_creation.feature",
    name = "Placeholder URL is synthesised for an empty upload response"
)]
fn placeholder_url_is_synthesised(world: AccountCreationWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/account_creation.feature",
    name = "Rejected upload leaves the account without an image"
)]
fn rejected_upload_leaves_account_without_image(world: AccountCreationWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/account_creation.feature",
    name = "Rejected create stops the workflow"
)]
fn rejected_create_stops_the_workflow(world: AccountCreationWorld) {
    drop(world);
}

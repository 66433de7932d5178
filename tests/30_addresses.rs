mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;
use contact_api::database::ContactStore;

#[tokio::test]
async fn create_and_list_addresses() -> Result<()> {
    let app = TestApp::new();
    let contact = app.create_contact(1, "John").await?;
    let base = format!("/contacts/{}/addresses", contact);

    let res = app
        .post(
            &base,
            1,
            json!({ "street": "Jl. Asia Afrika 8", "city": "Bandung", "country": "Indonesia", "postal_code": "40111" }),
        )
        .await?;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["data"]["contact_id"], contact);
    assert!(res.body["data"]["province"].is_null());

    let res = app.get(&base, 1).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"].as_array().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn create_requires_country() -> Result<()> {
    let app = TestApp::new();
    let contact = app.create_contact(1, "John").await?;

    let res = app
        .post(&format!("/contacts/{}/addresses", contact), 1, json!({ "city": "Bandung" }))
        .await?;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body["field_errors"]["country"].is_string());
    assert!(app.store.list_addresses(contact).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn addresses_of_other_users_contacts_are_forbidden() -> Result<()> {
    let app = TestApp::new();
    let contact = app.create_contact(1, "John").await?;
    let base = format!("/contacts/{}/addresses", contact);
    let created = app.post(&base, 1, json!({ "country": "Indonesia" })).await?;
    let address = created.body["data"]["id"].as_i64().unwrap();

    assert_eq!(app.get(&base, 2).await?.status, StatusCode::FORBIDDEN);
    assert_eq!(
        app.post(&base, 2, json!({ "country": "Malaysia" })).await?.status,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        app.delete(&format!("{}/{}", base, address), 2).await?.status,
        StatusCode::FORBIDDEN
    );
    assert_eq!(app.store.list_addresses(contact).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn address_must_belong_to_contact_in_path() -> Result<()> {
    let app = TestApp::new();
    let first = app.create_contact(1, "John").await?;
    let second = app.create_contact(1, "Jane").await?;
    let created = app
        .post(&format!("/contacts/{}/addresses", first), 1, json!({ "country": "Indonesia" }))
        .await?;
    let address = created.body["data"]["id"].as_i64().unwrap();

    let res = app
        .get(&format!("/contacts/{}/addresses/{}", second, address), 1)
        .await?;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn update_address_partially() -> Result<()> {
    let app = TestApp::new();
    let contact = app.create_contact(1, "John").await?;
    let created = app
        .post(
            &format!("/contacts/{}/addresses", contact),
            1,
            json!({ "street": "Jl. Braga 1", "city": "Bandung", "country": "Indonesia" }),
        )
        .await?;
    let uri = format!("/contacts/{}/addresses/{}", contact, created.body["data"]["id"]);

    let res = app.patch(&uri, 1, json!({ "city": "Jakarta", "street": null })).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["city"], "Jakarta");
    assert!(res.body["data"]["street"].is_null());
    assert_eq!(res.body["data"]["country"], "Indonesia");

    let res = app.patch(&uri, 1, json!({ "country": null })).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn delete_address_and_contact_cascade() -> Result<()> {
    let app = TestApp::new();
    let contact = app.create_contact(1, "John").await?;
    let base = format!("/contacts/{}/addresses", contact);
    let first = app.post(&base, 1, json!({ "country": "Indonesia" })).await?;
    app.post(&base, 1, json!({ "country": "Singapore" })).await?;

    let res = app
        .delete(&format!("{}/{}", base, first.body["data"]["id"]), 1)
        .await?;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    assert_eq!(app.store.list_addresses(contact).await?.len(), 1);

    app.delete(&format!("/contacts/{}", contact), 1).await?;
    assert!(app.store.list_addresses(contact).await?.is_empty());
    Ok(())
}

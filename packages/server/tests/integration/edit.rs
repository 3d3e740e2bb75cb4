use crate::common::{DASHBOARD_URL, TestApp};

#[tokio::test]
async fn edit_form_is_prefilled() {
    let app = TestApp::spawn().await;
    app.insert_property(1, "P1", "X1", "Aspen Lofts").await;

    let res = app.get("/edit/P1/X1").await;
    assert_eq!(res.status, 200);
    assert!(res.text.contains("name=\"property_name\" value=\"Aspen Lofts\""));
    assert!(res.text.contains("name=\"unit_count\" value=\"48\""));
    assert!(res.text.contains("action=\"/update/P1/X1\""));
    assert!(res.text.contains(DASHBOARD_URL));
    assert!(res.text.contains("Last updated never"));
}

#[tokio::test]
async fn missing_property_redirects_to_portfolio() {
    let app = TestApp::spawn().await;
    app.insert_property(1, "P1", "X1", "Aspen Lofts").await;

    let raw = app.get_raw("/edit/P1/ghost").await;
    assert_eq!(raw.status, 303);
    assert_eq!(raw.location.as_deref(), Some("/portfolio/P1"));

    let res = app.get("/edit/P1/ghost").await;
    assert_eq!(res.status, 200);
    assert!(res.text.contains("Property ghost not found"));
    assert!(res.text.contains("Aspen Lofts"));
}

#[tokio::test]
async fn other_company_cannot_open_the_form() {
    let app = TestApp::spawn().await;
    app.insert_property(1, "P1", "X1", "Aspen Lofts").await;

    let res = app.get_as_company("/edit/P1/X1", "2").await;
    assert!(res.text.contains("Property X1 not found"));
}

#[tokio::test]
async fn update_writes_submitted_fields_and_fires_hooks() {
    let app = TestApp::spawn().await;
    app.insert_property(1, "P1", "X1", "Aspen Lofts").await;

    let raw = app
        .post_form_raw("/update/P1/X1", &[("property_name", "Aspen Lofts II")])
        .await;
    assert_eq!(raw.status, 303);
    assert_eq!(raw.location.as_deref(), Some("/edit/P1/X1"));

    let res = app
        .post_form(
            "/update/P1/X1",
            &[
                ("property_name", "Aspen Lofts III"),
                ("city", ""),
                ("zip", "   "),
                ("unit_count", "52"),
                ("capex_per_unit", "1750.5"),
                ("company_id", "99"),
            ],
        )
        .await;
    assert_eq!(res.status, 200);
    assert!(res.text.contains("Property updated successfully!"));
    assert!(res.text.contains("value=\"Aspen Lofts III\""));

    let row = app.fetch_property(1, "P1", "X1").await;
    assert_eq!(row.property_name.as_deref(), Some("Aspen Lofts III"));
    assert_eq!(row.city.as_deref(), Some("Austin"));
    assert_eq!(row.zip.as_deref(), Some("78701"));
    assert_eq!(row.unit_count, Some(52.0));
    assert_eq!(row.capex_per_unit, Some(1750.5));
    assert!(row.staging_loaded_at.is_some());

    app.wait_for_hooks(2).await;
    let models = app.hooks.transform_calls.lock().unwrap().clone();
    assert!(models.iter().all(|m| m.as_deref() == Some("stg_property_inputs+")));
}

#[tokio::test]
async fn invalid_number_rejects_the_whole_submission() {
    let app = TestApp::spawn().await;
    app.insert_property(1, "P1", "X1", "Aspen Lofts").await;

    let res = app
        .post_form(
            "/update/P1/X1",
            &[("property_name", "Should Not Save"), ("capex_per_unit", "abc")],
        )
        .await;
    assert_eq!(res.status, 200);
    assert!(res.text.contains("flash-error"));
    assert!(res.text.contains("Invalid value for capex_per_unit"));

    let row = app.fetch_property(1, "P1", "X1").await;
    assert_eq!(row.property_name.as_deref(), Some("Aspen Lofts"));
    assert_eq!(row.capex_per_unit, Some(1500.0));
    assert!(row.staging_loaded_at.is_none());

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert_eq!(app.hooks.transform_count(), 0);
}

#[tokio::test]
async fn blank_submission_saves_nothing() {
    let app = TestApp::spawn().await;
    app.insert_property(1, "P1", "X1", "Aspen Lofts").await;

    let res = app
        .post_form("/update/P1/X1", &[("property_name", ""), ("unit_count", " ")])
        .await;
    assert!(res.text.contains("No changes to save"));
    assert!(app.fetch_property(1, "P1", "X1").await.staging_loaded_at.is_none());
    assert_eq!(app.hooks.transform_count(), 0);
}

#[tokio::test]
async fn updating_a_missing_property_reports_not_found() {
    let app = TestApp::spawn().await;

    let raw = app
        .post_form_raw("/update/P1/ghost", &[("city", "Waco")])
        .await;
    assert_eq!(raw.status, 303);
    assert_eq!(raw.location.as_deref(), Some("/edit/P1/ghost"));
    assert_eq!(app.hooks.transform_count(), 0);
}

#[tokio::test]
async fn concurrent_updates_to_different_columns_both_apply() {
    let app = TestApp::spawn().await;
    app.insert_property(1, "P1", "X1", "Aspen Lofts").await;

    let (a, b) = tokio::join!(
        app.post_form_raw("/update/P1/X1", &[("city", "Dallas")]),
        app.post_form_raw("/update/P1/X1", &[("zip", "75201")]),
    );
    assert_eq!(a.status, 303);
    assert_eq!(b.status, 303);

    let row = app.fetch_property(1, "P1", "X1").await;
    assert_eq!(row.city.as_deref(), Some("Dallas"));
    assert_eq!(row.zip.as_deref(), Some("75201"));
}

#[tokio::test]
async fn concurrent_updates_to_one_column_last_write_wins() {
    let app = TestApp::spawn().await;
    app.insert_property(1, "P1", "X1", "Aspen Lofts").await;

    let (a, b) = tokio::join!(
        app.post_form_raw("/update/P1/X1", &[("city", "Dallas")]),
        app.post_form_raw("/update/P1/X1", &[("city", "Houston")]),
    );
    assert_eq!(a.status, 303);
    assert_eq!(b.status, 303);

    let row = app.fetch_property(1, "P1", "X1").await;
    let city = row.city.as_deref().unwrap();
    assert!(city == "Dallas" || city == "Houston", "unexpected city {city}");
    assert_eq!(row.property_name.as_deref(), Some("Aspen Lofts"));
    assert_eq!(row.property_address.as_deref(), Some("100 Main St"));
    assert_eq!(row.zip.as_deref(), Some("78701"));
    assert_eq!(row.building_class.as_deref(), Some("B"));
    assert_eq!(row.unit_count, Some(48.0));
    assert_eq!(row.capex_per_unit, Some(1500.0));
    assert!(row.staging_loaded_at.is_some());
}

#[tokio::test]
async fn unreadable_form_body_flashes_and_redirects() {
    let app = TestApp::spawn().await;
    app.insert_property(1, "P1", "X1", "Aspen Lofts").await;

    let res = app
        .post_body("/update/P1/X1", "application/json", r#"{"city":"Waco"}"#)
        .await;
    assert_eq!(res.status, 200);
    assert!(res.text.contains("Invalid form submission"));
    assert!(res.text.contains("value=\"Aspen Lofts\""));

    let row = app.fetch_property(1, "P1", "X1").await;
    assert_eq!(row.city.as_deref(), Some("Austin"));
    assert!(row.staging_loaded_at.is_none());
}

#[tokio::test]
async fn repeated_form_key_uses_first_value() {
    let app = TestApp::spawn().await;
    app.insert_property(1, "P1", "X1", "Aspen Lofts").await;

    let res = app
        .post_body(
            "/update/P1/X1",
            "application/x-www-form-urlencoded",
            "city=Dallas&city=Houston",
        )
        .await;
    assert!(res.text.contains("Property updated successfully!"));
    assert_eq!(app.fetch_property(1, "P1", "X1").await.city.as_deref(), Some("Dallas"));
}

#[tokio::test]
async fn identifiers_with_reserved_characters_round_trip() {
    let app = TestApp::spawn().await;
    app.insert_property(1, "Fund A/B", "Unit #7", "Odd Ids").await;

    let res = app.get("/portfolio/Fund%20A%2FB").await;
    assert_eq!(res.status, 200);
    assert!(res.text.contains("/edit/Fund%20A%2FB/Unit%20%237"));

    let res = app
        .post_form("/update/Fund%20A%2FB/Unit%20%237", &[("city", "Houston")])
        .await;
    assert!(res.text.contains("Property updated successfully!"));
    assert_eq!(
        app.fetch_property(1, "Fund A/B", "Unit #7").await.city.as_deref(),
        Some("Houston")
    );
}

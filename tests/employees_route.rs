use chrono::NaiveDate;
use rocket::http::{ContentType, Status};
use rocket::{Route, routes};
use roster_api::models::{ApiResponse, CountResponse, Employee};
use roster_api::routes::employees;
use roster_api::test_support::{TestDatabase, TestDatabaseError, TestFixtures, TestRocketBuilder};

async fn provision_db() -> Option<TestDatabase> {
    match TestDatabase::new().await {
        Ok(db) => Some(db),
        Err(TestDatabaseError::Container(err)) => {
            eprintln!("skipping employee route test: container runtime unavailable: {err}");
            None
        }
        Err(err) => panic!("failed to provision test database: {err:?}"),
    }
}

fn employee_routes() -> Vec<Route> {
    routes![
        employees::list_employees,
        employees::count_employees,
        employees::get_employee,
        employees::create_employee,
        employees::update_employee,
        employees::delete_employee,
    ]
}

#[tokio::test]
async fn create_then_fetch_roundtrip() {
    let Some(db) = provision_db().await else { return };
    let pool = db.pool_clone();

    let client = TestRocketBuilder::new()
        .manage_pg_pool(pool.clone())
        .mount_api_routes(employee_routes())
        .async_client()
        .await;

    let response = client
        .post("/api/employees")
        .header(ContentType::JSON)
        .body(
            r#"{"name":"Grace Hopper","email":"grace@example.com","position":"Rear Admiral","dateOfBirth":"1906-12-09"}"#,
        )
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);

    let payload: ApiResponse<Employee> = response
        .into_json()
        .await
        .expect("payload should deserialize");
    assert_eq!(payload.response_code, 201);
    let created = payload.data.expect("created employee returned");
    assert_eq!(created.email, "grace@example.com");
    assert_eq!(created.date_of_birth, NaiveDate::from_ymd_opt(1906, 12, 9));

    let response = client
        .get(format!("/api/employees/{}", created.id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let payload: ApiResponse<Employee> = response
        .into_json()
        .await
        .expect("payload should deserialize");
    let fetched = payload.data.expect("employee returned");
    assert_eq!(fetched.name, "Grace Hopper");
    assert_eq!(fetched.position.as_deref(), Some("Rear Admiral"));

    drop(client);
    db.close().await.expect("failed to drop test database");
}

#[tokio::test]
async fn create_rejects_missing_and_duplicate_fields() {
    let Some(db) = provision_db().await else { return };
    let pool = db.pool_clone();
    let fixtures = TestFixtures::new(&pool);
    fixtures
        .insert_employee("Grace Hopper", "grace@example.com")
        .await
        .expect("failed to seed employee");

    let client = TestRocketBuilder::new()
        .manage_pg_pool(pool.clone())
        .mount_api_routes(employee_routes())
        .async_client()
        .await;

    // Missing email entirely.
    let response = client
        .post("/api/employees")
        .header(ContentType::JSON)
        .body(r#"{"name":"Nameless"}"#)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    let body = response.into_string().await.expect("body present");
    assert!(body.contains("Name and email are required"));

    // Invalid email shape.
    let response = client
        .post("/api/employees")
        .header(ContentType::JSON)
        .body(r#"{"name":"Broken","email":"not-an-email"}"#)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    drop(response);

    // Duplicate of the seeded record.
    let response = client
        .post("/api/employees")
        .header(ContentType::JSON)
        .body(r#"{"name":"Copy","email":"grace@example.com"}"#)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    let body = response.into_string().await.expect("body present");
    assert!(body.contains("Email already exists"));

    assert_eq!(fixtures.employee_count().await.unwrap(), 1);

    drop(client);
    db.close().await.expect("failed to drop test database");
}

#[tokio::test]
async fn name_filter_is_case_insensitive_substring() {
    let Some(db) = provision_db().await else { return };
    let pool = db.pool_clone();
    let fixtures = TestFixtures::new(&pool);
    for (name, email) in [
        ("Alice Johnson", "alice@example.com"),
        ("Malice Cooper", "malice@example.com"),
        ("Bob Stone", "bob@example.com"),
    ] {
        fixtures
            .insert_employee(name, email)
            .await
            .expect("failed to seed employee");
    }

    let client = TestRocketBuilder::new()
        .manage_pg_pool(pool.clone())
        .mount_api_routes(employee_routes())
        .async_client()
        .await;

    let response = client.get("/api/employees?name=LICE").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let payload: ApiResponse<Vec<Employee>> = response
        .into_json()
        .await
        .expect("payload should deserialize");
    let matched = payload.data.expect("list returned");
    assert_eq!(matched.len(), 2);
    assert_eq!(matched[0].name, "Alice Johnson");
    assert_eq!(matched[1].name, "Malice Cooper");

    // No filter returns everyone.
    let response = client.get("/api/employees").dispatch().await;
    let payload: ApiResponse<Vec<Employee>> = response
        .into_json()
        .await
        .expect("payload should deserialize");
    assert_eq!(payload.data.expect("list returned").len(), 3);

    drop(client);
    db.close().await.expect("failed to drop test database");
}

#[tokio::test]
async fn update_changes_only_supplied_fields() {
    let Some(db) = provision_db().await else { return };
    let pool = db.pool_clone();
    let fixtures = TestFixtures::new(&pool);
    let id = fixtures
        .insert_employee_full(
            "Grace Hopper",
            "grace@example.com",
            Some("555-0100"),
            None,
            NaiveDate::from_ymd_opt(1906, 12, 9),
            Some("Engineer"),
        )
        .await
        .expect("failed to seed employee");
    fixtures
        .insert_employee("Alan Turing", "alan@example.com")
        .await
        .expect("failed to seed employee");

    let client = TestRocketBuilder::new()
        .manage_pg_pool(pool.clone())
        .mount_api_routes(employee_routes())
        .async_client()
        .await;

    let response = client
        .put(format!("/api/employees/{id}"))
        .header(ContentType::JSON)
        .body(r#"{"address":"1 Navy Yard","position":"Rear Admiral"}"#)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let payload: ApiResponse<Employee> = response
        .into_json()
        .await
        .expect("payload should deserialize");
    let updated = payload.data.expect("employee returned");
    assert_eq!(updated.name, "Grace Hopper");
    assert_eq!(updated.phone_number.as_deref(), Some("555-0100"));
    assert_eq!(updated.address.as_deref(), Some("1 Navy Yard"));
    assert_eq!(updated.position.as_deref(), Some("Rear Admiral"));

    // Updating to another record's email is rejected.
    let response = client
        .put(format!("/api/employees/{id}"))
        .header(ContentType::JSON)
        .body(r#"{"email":"alan@example.com"}"#)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    drop(response);

    // Unknown id is a 404.
    let response = client
        .put("/api/employees/999999")
        .header(ContentType::JSON)
        .body(r#"{"name":"Ghost"}"#)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);
    drop(response);

    drop(client);
    db.close().await.expect("failed to drop test database");
}

#[tokio::test]
async fn delete_is_permanent_and_idempotent_in_effect() {
    let Some(db) = provision_db().await else { return };
    let pool = db.pool_clone();
    let fixtures = TestFixtures::new(&pool);
    let id = fixtures
        .insert_employee("Grace Hopper", "grace@example.com")
        .await
        .expect("failed to seed employee");

    let client = TestRocketBuilder::new()
        .manage_pg_pool(pool.clone())
        .mount_api_routes(employee_routes())
        .async_client()
        .await;

    let response = client.delete(format!("/api/employees/{id}")).dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    drop(response);

    // Second delete finds nothing and changes nothing.
    let response = client.delete(format!("/api/employees/{id}")).dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
    drop(response);

    let response = client.get(format!("/api/employees/{id}")).dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
    drop(response);

    assert_eq!(fixtures.employee_count().await.unwrap(), 0);

    drop(client);
    db.close().await.expect("failed to drop test database");
}

#[tokio::test]
async fn count_reports_total_records() {
    let Some(db) = provision_db().await else { return };
    let pool = db.pool_clone();
    let fixtures = TestFixtures::new(&pool);
    fixtures
        .insert_employee("Grace Hopper", "grace@example.com")
        .await
        .expect("failed to seed employee");
    fixtures
        .insert_employee("Alan Turing", "alan@example.com")
        .await
        .expect("failed to seed employee");

    let client = TestRocketBuilder::new()
        .manage_pg_pool(pool.clone())
        .mount_api_routes(employee_routes())
        .async_client()
        .await;

    let response = client.get("/api/employees/count").dispatch().await;
    assert_eq!(response.status(), Status::Ok);

    let payload: ApiResponse<CountResponse> = response
        .into_json()
        .await
        .expect("payload should deserialize");
    assert_eq!(payload.data.expect("count returned").total, 2);

    drop(client);
    db.close().await.expect("failed to drop test database");
}

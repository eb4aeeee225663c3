#[macro_use]
extern crate rocket;

pub mod db;
pub mod error;
pub mod export;
pub mod import;
pub mod jobs;
pub mod models;
pub mod notify;
pub mod request_logger;
pub mod routes;
pub mod store;

use crate::db::RosterDb;
use crate::jobs::ReminderScheduler;
use crate::notify::Notifier;
use crate::request_logger::RequestLogger;
use env_logger::Env;
use rocket::fairing::AdHoc;
use rocket::http::Method;
use rocket::{Build, Rocket};
use rocket_cors::{AllowedOrigins, CorsOptions};
use rocket_db_pools::Database;
use std::sync::Once;

static LOGGER: Once = Once::new();

fn init_logger() {
    LOGGER.call_once(|| {
        env_logger::Builder::from_env(
            Env::default().default_filter_or("info,rocket::server=warn,rocket::request=warn"),
        )
        .init();
    });
}

pub fn rocket() -> Rocket<Build> {
    init_logger();

    // Configure CORS
    let cors = CorsOptions::default()
        .allowed_origins(AllowedOrigins::all())
        .allowed_methods(
            vec![Method::Get, Method::Post, Method::Put, Method::Delete]
                .into_iter()
                .map(From::from)
                .collect(),
        )
        .allow_credentials(true)
        .to_cors()
        .expect("Error creating CORS");

    rocket::build()
        .attach(RequestLogger)
        .attach(RosterDb::init())
        .attach(cors)
        // Run database migrations on startup
        .attach(AdHoc::try_on_ignite("Run Migrations", |rocket| async move {
            match RosterDb::fetch(&rocket) {
                Some(db) => {
                    let pool = (**db).clone();
                    match store::run_migrations(&pool).await {
                        Ok(_) => {
                            log::info!("database migrations successful");
                            Ok(rocket)
                        }
                        Err(e) => {
                            log::error!("database migrations failed: {}", e);
                            Err(rocket)
                        }
                    }
                }
                None => {
                    log::error!("database pool not available for migrations");
                    Err(rocket)
                }
            }
        }))
        // Clone and manage the pool for handlers and background tasks
        .attach(AdHoc::try_on_ignite("Manage DB Pool", |rocket| async move {
            match RosterDb::fetch(&rocket) {
                Some(db) => {
                    let pool = (**db).clone();
                    Ok(rocket.manage(pool))
                }
                None => Err(rocket),
            }
        }))
        // Construct the mail sender; unconfigured means disabled, not fatal
        .attach(AdHoc::on_ignite("Mail Sender", |rocket| async move {
            let notifier = Notifier::from_env().await;
            rocket.manage(notifier)
        }))
        // Spawn the reminder scheduler in the background
        .attach(AdHoc::on_liftoff("Spawn Reminder Scheduler", |rocket| {
            Box::pin(async move {
                let pool = rocket.state::<rocket_db_pools::sqlx::PgPool>();
                let notifier = rocket.state::<Notifier>();
                match (pool, notifier) {
                    (Some(pool), Some(notifier)) => {
                        let scheduler = ReminderScheduler::new(pool.clone(), notifier.clone());
                        tokio::spawn(async move {
                            log::info!("starting reminder scheduler");
                            scheduler.run().await
                        });
                    }
                    _ => log::error!("failed to spawn reminder scheduler: missing managed state"),
                }
            })
        }))
        .mount(
            "/api",
            routes![
                // Health routes
                routes::health::health_check,
                // Employee CRUD routes
                routes::employees::list_employees,
                routes::employees::count_employees,
                routes::employees::get_employee,
                routes::employees::create_employee,
                routes::employees::update_employee,
                routes::employees::delete_employee,
                // Export routes
                routes::export::export_csv,
                routes::export::export_excel,
                // Import and template routes
                routes::import::import_csv,
                routes::import::import_excel,
                routes::import::template_csv,
                routes::import::template_excel,
            ],
        )
}

#[cfg_attr(not(test), allow(dead_code))]
pub mod test_support {
    use crate::notify::Notifier;
    use chrono::NaiveDate;
    use rocket::config::LogLevel;
    use rocket::figment::Figment;
    use rocket::local::asynchronous::Client as AsyncClient;
    use rocket::local::blocking::Client;
    use rocket::{Build, Rocket, Route};
    use rocket_db_pools::sqlx::{self, PgPool};

    pub use database::{TestDatabase, TestDatabaseError};

    /// Convenience helpers for seeding employee rows in tests.
    pub struct TestFixtures<'a> {
        pool: &'a PgPool,
    }

    impl<'a> TestFixtures<'a> {
        /// Create a fixture helper bound to the provided pool.
        pub fn new(pool: &'a PgPool) -> Self {
            Self { pool }
        }

        /// Insert a minimal employee row, returning the new id.
        pub async fn insert_employee(&self, name: &str, email: &str) -> Result<i32, sqlx::Error> {
            sqlx::query_scalar(
                "INSERT INTO employees (name, email) VALUES ($1, $2) RETURNING id",
            )
            .bind(name)
            .bind(email)
            .fetch_one(self.pool)
            .await
        }

        /// Insert an employee row with every optional column populated.
        pub async fn insert_employee_full(
            &self,
            name: &str,
            email: &str,
            phone_number: Option<&str>,
            address: Option<&str>,
            date_of_birth: Option<NaiveDate>,
            position: Option<&str>,
        ) -> Result<i32, sqlx::Error> {
            sqlx::query_scalar(
                r#"INSERT INTO employees (name, email, phone_number, address, date_of_birth, position)
                   VALUES ($1, $2, $3, $4, $5, $6)
                   RETURNING id"#,
            )
            .bind(name)
            .bind(email)
            .bind(phone_number)
            .bind(address)
            .bind(date_of_birth)
            .bind(position)
            .fetch_one(self.pool)
            .await
        }

        /// Current number of employee rows, for assertions.
        pub async fn employee_count(&self) -> Result<i64, sqlx::Error> {
            sqlx::query_scalar("SELECT COUNT(*) FROM employees")
                .fetch_one(self.pool)
                .await
        }
    }

    pub mod database {
        use rocket_db_pools::sqlx::postgres::PgPoolOptions;
        use rocket_db_pools::sqlx::{self, PgPool};
        use testcontainers::ContainerAsync;
        use testcontainers_modules::postgres::Postgres;
        use testcontainers_modules::testcontainers::core::error::TestcontainersError;
        use testcontainers_modules::testcontainers::runners::AsyncRunner;
        use thiserror::Error;

        static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

        #[derive(Debug, Error)]
        pub enum TestDatabaseError {
            #[error("database error: {0}")]
            Sqlx(#[from] sqlx::Error),
            #[error("migration error: {0}")]
            Migration(#[from] sqlx::migrate::MigrateError),
            #[error("container error: {0}")]
            Container(#[from] TestcontainersError),
        }

        /// Ephemeral database factory for integration tests.
        ///
        /// Launches a disposable Postgres container, connects, and applies
        /// the embedded migrations. Each test owns its container, so there
        /// is no cross-test state to scrub.
        pub struct TestDatabase {
            pool: Option<PgPool>,
            container: Option<ContainerAsync<Postgres>>,
        }

        impl TestDatabase {
            /// Provision a fresh, migrated database.
            pub async fn new() -> Result<Self, TestDatabaseError> {
                let container = Postgres::default().start().await?;

                let host = container.get_host().await?.to_string();
                let port = container.get_host_port_ipv4(5432).await?;
                let url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

                let pool = PgPoolOptions::new()
                    .max_connections(5)
                    .connect(&url)
                    .await?;

                MIGRATOR.run(&pool).await?;

                Ok(Self {
                    pool: Some(pool),
                    container: Some(container),
                })
            }

            /// Pooled connection handle for use in tests and Rocket state.
            pub fn pool(&self) -> &PgPool {
                self.pool.as_ref().expect("test database pool is available")
            }

            /// Convenience method returning a clone of the pooled handle.
            pub fn pool_clone(&self) -> PgPool {
                self.pool().clone()
            }

            /// Close pool connections and stop the container.
            pub async fn close(mut self) -> Result<(), TestDatabaseError> {
                if let Some(pool) = self.pool.take() {
                    pool.close().await;
                }

                if let Some(container) = self.container.take() {
                    container.stop().await?;
                }

                Ok(())
            }
        }
    }

    /// Builder for constructing Rocket instances tailored for integration
    /// tests.
    #[derive(Default)]
    pub struct TestRocketBuilder {
        figment: Figment,
        mounts: Vec<(String, Vec<Route>)>,
        pg_pool: Option<PgPool>,
    }

    impl TestRocketBuilder {
        /// Start a builder with sensible defaults: random port, logging off.
        pub fn new() -> Self {
            let figment = rocket::Config::figment()
                .merge(("port", 0))
                .merge(("log_level", LogLevel::Off))
                .merge(("cli_colors", false));

            Self {
                figment,
                mounts: Vec::new(),
                pg_pool: None,
            }
        }

        /// Mount routes under `/api`.
        pub fn mount_api_routes(mut self, routes: Vec<Route>) -> Self {
            self.mounts.push(("/api".to_string(), routes));
            self
        }

        /// Manage a `PgPool` for tests that exercise database-backed routes.
        pub fn manage_pg_pool(mut self, pool: PgPool) -> Self {
            self.pg_pool = Some(pool);
            self
        }

        /// Finish building the Rocket instance. A disabled notifier is
        /// always managed so notification-dispatching routes resolve.
        pub fn build(self) -> Rocket<Build> {
            let mut rocket = rocket::custom(self.figment).manage(Notifier::disabled());

            for (base, routes) in self.mounts {
                rocket = rocket.mount(base, routes);
            }

            if let Some(pool) = self.pg_pool {
                rocket = rocket.manage(pool);
            }

            rocket
        }

        /// Convenience helper to produce a blocking local client.
        pub fn blocking_client(self) -> Client {
            Client::tracked(self.build()).expect("valid Rocket instance")
        }

        /// Convenience helper to produce an asynchronous local client.
        pub async fn async_client(self) -> AsyncClient {
            AsyncClient::tracked(self.build())
                .await
                .expect("valid Rocket instance")
        }
    }
}

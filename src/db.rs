use rocket_db_pools::{Database, sqlx};

#[derive(Database)]
#[database("roster_db")]
pub struct RosterDb(sqlx::PgPool);

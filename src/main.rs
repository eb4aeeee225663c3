#[macro_use]
extern crate rocket;

/// Binary entry point. The Rocket instance is assembled in the library so
/// integration tests can exercise the same wiring.
#[launch]
fn rocket() -> _ {
    let rocket = roster_api::rocket();
    log::info!("Starting Roster API Server");
    rocket
}

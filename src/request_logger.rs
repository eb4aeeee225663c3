use rocket::fairing::{Fairing, Info, Kind};
use rocket::{Data, Request, Response};
use std::time::Instant;

/// Start-of-request timestamp stashed in Rocket's request-local cache.
#[derive(Debug, Clone, Copy)]
struct RequestTimer(Instant);

impl RequestTimer {
    fn now() -> Self {
        RequestTimer(Instant::now())
    }

    fn elapsed_ms(self) -> f64 {
        self.0.elapsed().as_secs_f64() * 1000.0
    }
}

/// Fairing emitting one log line per handled request with method, URI,
/// status, and wall-clock duration.
pub struct RequestLogger;

#[rocket::async_trait]
impl Fairing for RequestLogger {
    fn info(&self) -> Info {
        Info {
            name: "Request Logger",
            kind: Kind::Request | Kind::Response,
        }
    }

    async fn on_request(&self, request: &mut Request<'_>, _: &mut Data<'_>) {
        request.local_cache(RequestTimer::now);
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        // A request that never hit on_request (e.g. an error catcher path)
        // still gets a timer here; it then reports ~0ms.
        let timer = *request.local_cache(RequestTimer::now);

        log::info!(
            "{} {} -> {} ({:.2}ms)",
            request.method(),
            request.uri(),
            response.status().code,
            timer.elapsed_ms()
        );
    }
}

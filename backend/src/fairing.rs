use rocket::fairing::{Fairing, Info, Kind};
use rocket::{Request, Response};

/// Logs one line per handled request.
pub struct RequestLogger;

#[rocket::async_trait]
impl Fairing for RequestLogger {
    fn info(&self) -> Info {
        Info {
            name: "Log requests with their response status",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        let status = response.status();
        let method = request.method();
        let uri = request.uri();

        if status.class().is_server_error() {
            tracing::error!(%method, %uri, status = status.code, "request failed");
        } else {
            tracing::info!(%method, %uri, status = status.code, "request handled");
        }
    }
}

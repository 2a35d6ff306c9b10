use crate::util::body::{json, Reply};
use engine::error::Error;
use hyper::{Response, StatusCode};
use serde::Serialize;

#[derive(Serialize)]
struct Rejection {
    error: String,
}

fn status_of(err: &Error) -> StatusCode {
    match err {
        Error::EmptyName | Error::UnknownSport | Error::UnknownDifficulty | Error::UnknownMode => {
            StatusCode::BAD_REQUEST
        }
        Error::UnknownSession => StatusCode::NOT_FOUND,
    }
}

/// Turns an engine rejection into a JSON response carrying its message, so
/// the player can be prompted to correct their input.
pub fn reject(err: Error) -> Result<Response<Reply>, StatusCode> {
    json(status_of(&err), &Rejection { error: err.to_string() })
}

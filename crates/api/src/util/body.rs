use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::{
    body::{Body, Bytes},
    header::{HeaderValue, CONTENT_TYPE},
    Response, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};

pub const APPLICATION_JSON: &str = "application/json";

/// Largest request payload we are willing to parse.
const MAX_PAYLOAD: usize = 1024;

pub type Reply = Full<Bytes>;

/// Collects and parses a JSON request body. An empty body parses as `T::default()`.
pub async fn read_json<B, T>(body: B) -> Result<T, StatusCode>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    T: DeserializeOwned + Default,
{
    let bytes = match Limited::new(body, MAX_PAYLOAD).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => return Err(StatusCode::PAYLOAD_TOO_LARGE),
        Err(_) => return Err(StatusCode::BAD_REQUEST),
    };
    if bytes.is_empty() {
        return Ok(T::default());
    }
    serde_json::from_slice(&bytes).map_err(|_| StatusCode::BAD_REQUEST)
}

pub fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Result<Response<Reply>, StatusCode> {
    let bytes = serde_json::to_vec(value).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let mut res = Response::new(Full::new(Bytes::from(bytes)));
    *res.status_mut() = status;
    res.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
    Ok(res)
}

pub fn empty(status: StatusCode) -> Response<Reply> {
    let mut res = Response::new(Full::new(Bytes::new()));
    *res.status_mut() = status;
    res
}

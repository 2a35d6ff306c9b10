mod error;
mod leaderboard;
mod session;
mod setup;
mod util;

pub use util::body::Reply;

use engine::Lobby;
use hyper::{body::Body, Method, Request, Response, StatusCode};
use util::body::empty;

/// Routes a request to its handler. Failures without a body of their own
/// surface as a bare status code.
pub async fn try_respond<B>(req: Request<B>, lobby: &Lobby) -> Result<Response<Reply>, StatusCode>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (parts, body) = req.into_parts();
    let path = parts.uri.path().trim_end_matches('/');
    let mut segments = path.split('/').skip(1);
    let route = (segments.next(), segments.next(), segments.next(), segments.next());
    log::info!("{} {}", parts.method, path);

    match (&parts.method, route) {
        (&Method::GET, (Some("sports"), None, _, _)) => leaderboard::try_sports(),
        (&Method::GET, (Some("leaderboard"), None, _, _)) => leaderboard::try_list(lobby).await,
        (&Method::GET, (Some("setup"), None, _, _)) => setup::try_load(lobby),
        (&Method::POST, (Some("setup"), None, _, _)) => setup::try_save(body, lobby).await,
        (&Method::POST, (Some("sessions"), None, _, _)) => session::try_start(body, lobby).await,
        (&Method::GET, (Some("sessions"), Some(id), None, _)) => session::try_snapshot(id, lobby).await,
        (&Method::DELETE, (Some("sessions"), Some(id), None, _)) => session::try_abandon(id, lobby),
        (&Method::POST, (Some("sessions"), Some(id), Some("difficulty"), None)) => {
            session::try_choose(id, body, lobby).await
        }
        (&Method::POST, (Some("sessions"), Some(id), Some("answer"), None)) => {
            session::try_answer(id, body, lobby).await
        }
        (&Method::POST, (Some("sessions"), Some(id), Some("end"), None)) => session::try_end(id, lobby).await,
        (_, (Some("sports" | "leaderboard" | "setup" | "sessions"), ..)) => Err(StatusCode::METHOD_NOT_ALLOWED),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

pub async fn respond<B>(req: Request<B>, lobby: &Lobby) -> Response<Reply>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    try_respond(req, lobby).await.unwrap_or_else(|code| {
        log::warn!("request failed with {code}");
        empty(code)
    })
}

#[cfg(test)]
mod tests {
    use super::{respond, Reply};
    use engine::{
        memory::{MemoryCache, MemoryQuestions, MemoryScores},
        Config, Lobby,
    };
    use http_body_util::{BodyExt, Full};
    use hyper::{body::Bytes, Method, Request, Response, StatusCode};
    use model::Question;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn question(id: &str, category: &str, difficulty: u16) -> Question {
        Question {
            id: id.into(),
            category: category.into(),
            question: format!("Question {id}?"),
            options: vec!["right".into(), "wrong".into(), "also wrong".into()],
            correct_answer: "right".into(),
            difficulty,
            explanation: Some("Because.".into()),
            created_at: 0,
            last_used: None,
            usage_count: 0,
        }
    }

    fn lobby() -> Lobby {
        let questions = MemoryQuestions::new(vec![question("b1", "basketball", 2), question("b2", "basketball", 2)]);
        Lobby::new(
            Arc::new(questions),
            Arc::new(MemoryScores::default()),
            Arc::new(MemoryCache::default()),
            Config::classic(),
        )
    }

    fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Full<Bytes>> {
        let bytes = body.map(|value| Bytes::from(value.to_string())).unwrap_or_default();
        let mut req = Request::new(Full::new(bytes));
        *req.method_mut() = method;
        *req.uri_mut() = uri.parse().unwrap();
        req
    }

    async fn read(res: Response<Reply>) -> Value {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn full_round_trip_over_http() {
        let lobby = lobby();

        let form = json!({ "name": " Ada ", "sport": "basketball" });
        let res = respond(request(Method::POST, "/setup", Some(form)), &lobby).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let res = respond(request(Method::GET, "/setup", None), &lobby).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(read(res).await, json!({ "name": "Ada", "sport": "basketball" }));

        // An empty body falls back to the saved setup.
        let res = respond(request(Method::POST, "/sessions", None), &lobby).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let started = read(res).await;
        let id = started["id"].as_str().unwrap().to_owned();
        assert_eq!(started["session"]["player"], "Ada");
        assert_eq!(started["session"]["phase"]["state"], "awaitingAnswer");
        assert!(started["session"]["phase"].get("correctAnswer").is_none());

        let uri = format!("/sessions/{id}/answer");
        let res = respond(request(Method::POST, &uri, Some(json!({ "option": "right" }))), &lobby).await;
        assert_eq!(res.status(), StatusCode::OK);
        let answered = read(res).await;
        assert_eq!(answered["verdict"]["correct"], true);
        assert_eq!(answered["session"]["score"], 1);

        // A second answer during feedback is ignored.
        let res = respond(request(Method::POST, &uri, Some(json!({ "option": "wrong" }))), &lobby).await;
        assert_eq!(read(res).await["verdict"], Value::Null);

        let res = respond(request(Method::POST, &format!("/sessions/{id}/end"), None), &lobby).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(read(res).await["phase"]["state"], "ended");

        let res = respond(request(Method::DELETE, &format!("/sessions/{id}"), None), &lobby).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let res = respond(request(Method::GET, &format!("/sessions/{id}"), None), &lobby).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn rejects_bad_input() {
        let lobby = lobby();

        let form = json!({ "name": "  ", "sport": "basketball" });
        let res = respond(request(Method::POST, "/setup", Some(form)), &lobby).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(read(res).await["error"].is_string());

        let form = json!({ "name": "Ada", "sport": "curling" });
        let res = respond(request(Method::POST, "/sessions", Some(form)), &lobby).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = respond(request(Method::GET, "/setup", None), &lobby).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = respond(request(Method::GET, "/sessions/not-hex", None), &lobby).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = respond(request(Method::GET, "/sessions/00000000000000ff", None), &lobby).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = respond(request(Method::PUT, "/leaderboard", None), &lobby).await;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

        let res = respond(request(Method::GET, "/nowhere", None), &lobby).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = respond(request(Method::POST, "/setup", Some(Value::String("x".repeat(2048)))), &lobby).await;
        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn lists_sports_and_seeded_leaderboard() {
        let lobby = lobby();

        let sports = read(respond(request(Method::GET, "/sports", None), &lobby).await).await;
        let ids: Vec<_> = sports.as_array().unwrap().iter().map(|sport| sport["id"].as_str().unwrap()).collect();
        assert_eq!(ids, ["basketball", "football", "soccer", "baseball"]);

        let board = read(respond(request(Method::GET, "/leaderboard", None), &lobby).await).await;
        let board = board.as_array().unwrap();
        assert_eq!(board.len(), 10);
        assert_eq!(board[0]["name"], "SpaceJam23");
        assert_eq!(board[0]["score"], 87);
    }
}

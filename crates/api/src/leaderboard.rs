use crate::util::body::{json, Reply};
use engine::Lobby;
use hyper::{Response, StatusCode};

pub async fn try_list(lobby: &Lobby) -> Result<Response<Reply>, StatusCode> {
    let board = lobby.leaderboard().list().await;
    json(StatusCode::OK, &board)
}

pub fn try_sports() -> Result<Response<Reply>, StatusCode> {
    json(StatusCode::OK, &model::sport::SPORTS)
}

use std::sync::Arc;

use serde::Serialize;
use warp::Filter;
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};

use crate::session_manager::SessionManager;
use hangman_core::{HangmanError, normalize_player_name};
use hangman_persistence::repositories::PlayerRepository;
use hangman_types::{ApiError, GuessRequest, PlayerQuery, PlayerRequest, UpdatePlayerRequest};

pub mod config;
pub mod session_manager;
pub mod stats_port;

type HandlerResult = Result<WithStatus<Json>, warp::Rejection>;

pub fn create_routes(
    player_repository: Arc<PlayerRepository>,
    session_manager: Arc<SessionManager>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let player_repository_filter = warp::any().map({
        let player_repository = player_repository.clone();
        move || player_repository.clone()
    });

    let session_manager_filter = warp::any().map({
        let session_manager = session_manager.clone();
        move || session_manager.clone()
    });

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    // Player stats endpoints
    let get_player = warp::path!("api" / "player")
        .and(warp::get())
        .and(warp::query::<PlayerQuery>())
        .and(player_repository_filter.clone())
        .and_then(handle_get_player);

    let create_player = warp::path!("api" / "players")
        .and(warp::post())
        .and(warp::body::json::<PlayerRequest>())
        .and(player_repository_filter.clone())
        .and_then(handle_create_player);

    let update_player = warp::path!("api" / "player")
        .and(warp::put())
        .and(warp::body::json::<UpdatePlayerRequest>())
        .and(player_repository_filter.clone())
        .and_then(handle_update_player);

    // Game session endpoints
    let start_game = warp::path!("api" / "game" / "start")
        .and(warp::post())
        .and(warp::body::json::<PlayerRequest>())
        .and(session_manager_filter.clone())
        .and_then(handle_start_game);

    let game_view = warp::path!("api" / "game")
        .and(warp::get())
        .and(warp::query::<PlayerQuery>())
        .and(session_manager_filter.clone())
        .and_then(handle_game_view);

    let end_game = warp::path!("api" / "game")
        .and(warp::delete())
        .and(warp::query::<PlayerQuery>())
        .and(session_manager_filter.clone())
        .and_then(handle_end_game);

    let guess = warp::path!("api" / "game" / "guess")
        .and(warp::post())
        .and(warp::body::json::<GuessRequest>())
        .and(session_manager_filter.clone())
        .and_then(handle_guess);

    let new_round = warp::path!("api" / "game" / "new")
        .and(warp::post())
        .and(warp::body::json::<PlayerRequest>())
        .and(session_manager_filter.clone())
        .and_then(handle_new_round);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE"]);

    health
        .or(get_player)
        .or(create_player)
        .or(update_player)
        .or(start_game)
        .or(game_view)
        .or(end_game)
        .or(guess)
        .or(new_round)
        .with(cors)
        .with(warp::log("hangman"))
}

fn json_reply<T: Serialize>(body: &T, status: StatusCode) -> WithStatus<Json> {
    warp::reply::with_status(warp::reply::json(body), status)
}

fn error_reply(message: &str, status: StatusCode) -> WithStatus<Json> {
    json_reply(&ApiError::new(message), status)
}

fn missing_name() -> HandlerResult {
    Ok(error_reply("playerName is required", StatusCode::BAD_REQUEST))
}

/// Lowercased name, or None when it is absent or blank
fn required_name(player_name: Option<String>) -> Option<String> {
    player_name.and_then(|name| normalize_player_name(&name).ok())
}

async fn handle_get_player(
    query: PlayerQuery,
    player_repository: Arc<PlayerRepository>,
) -> HandlerResult {
    let Some(player_name) = required_name(query.player_name) else {
        return missing_name();
    };

    match player_repository.find_by_name(&player_name).await {
        Ok(Some(stats)) => Ok(json_reply(&stats, StatusCode::OK)),
        Ok(None) => Ok(error_reply("Player not found", StatusCode::NOT_FOUND)),
        Err(err) => {
            tracing::error!("Failed to fetch player {}: {}", player_name, err);
            Ok(error_reply("Server error", StatusCode::INTERNAL_SERVER_ERROR))
        }
    }
}

async fn handle_create_player(
    request: PlayerRequest,
    player_repository: Arc<PlayerRepository>,
) -> HandlerResult {
    let Some(player_name) = required_name(request.player_name) else {
        return missing_name();
    };

    match player_repository.create_player(&player_name).await {
        Ok(Some(stats)) => Ok(json_reply(&stats, StatusCode::CREATED)),
        Ok(None) => Ok(error_reply("Player already exists", StatusCode::CONFLICT)),
        Err(err) => {
            tracing::error!("Failed to create player {}: {}", player_name, err);
            Ok(error_reply("Server error", StatusCode::INTERNAL_SERVER_ERROR))
        }
    }
}

async fn handle_update_player(
    request: UpdatePlayerRequest,
    player_repository: Arc<PlayerRepository>,
) -> HandlerResult {
    let Some(player_name) = required_name(request.player_name) else {
        return missing_name();
    };

    match player_repository
        .update_player(&player_name, request.wins, request.losses)
        .await
    {
        Ok(stats) => Ok(json_reply(&stats, StatusCode::OK)),
        Err(err) => {
            tracing::error!("Failed to update player {}: {}", player_name, err);
            Ok(error_reply("Server error", StatusCode::INTERNAL_SERVER_ERROR))
        }
    }
}

async fn handle_start_game(
    request: PlayerRequest,
    session_manager: Arc<SessionManager>,
) -> HandlerResult {
    let Some(player_name) = required_name(request.player_name) else {
        return missing_name();
    };

    match session_manager.start_session(&player_name).await {
        Ok(view) => Ok(json_reply(&view, StatusCode::OK)),
        Err(HangmanError::InvalidPlayerName(_)) => missing_name(),
        Err(err) => {
            tracing::error!("Failed to start game for {}: {}", player_name, err);
            Ok(error_reply("Server error", StatusCode::INTERNAL_SERVER_ERROR))
        }
    }
}

async fn handle_game_view(
    query: PlayerQuery,
    session_manager: Arc<SessionManager>,
) -> HandlerResult {
    let Some(player_name) = required_name(query.player_name) else {
        return missing_name();
    };

    match session_manager.view(&player_name).await {
        Some(view) => Ok(json_reply(&view, StatusCode::OK)),
        None => Ok(no_active_game()),
    }
}

async fn handle_end_game(
    query: PlayerQuery,
    session_manager: Arc<SessionManager>,
) -> HandlerResult {
    let Some(player_name) = required_name(query.player_name) else {
        return missing_name();
    };

    if session_manager.end_session(&player_name).await {
        Ok(json_reply(
            &serde_json::json!({ "playerName": player_name, "loggedOut": true }),
            StatusCode::OK,
        ))
    } else {
        Ok(no_active_game())
    }
}

async fn handle_guess(
    request: GuessRequest,
    session_manager: Arc<SessionManager>,
) -> HandlerResult {
    let Some(player_name) = required_name(request.player_name) else {
        return missing_name();
    };

    match session_manager.submit_guess(&player_name, &request.guess).await {
        Some(response) => Ok(json_reply(&response, StatusCode::OK)),
        None => Ok(no_active_game()),
    }
}

async fn handle_new_round(
    request: PlayerRequest,
    session_manager: Arc<SessionManager>,
) -> HandlerResult {
    let Some(player_name) = required_name(request.player_name) else {
        return missing_name();
    };

    match session_manager.new_round(&player_name).await {
        Some(view) => Ok(json_reply(&view, StatusCode::OK)),
        None => Ok(no_active_game()),
    }
}

fn no_active_game() -> WithStatus<Json> {
    error_reply("No active game for player", StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::stats_port::RepositoryStatsPort;
    use hangman_core::GameConfig;
    use hangman_types::{
        GuessOutcome, GuessResponse, PlayerStats, RoundOutcome, TerminalOutcome, ViewModel,
    };
    use migration::{Migrator, MigratorTrait};
    use serde::de::DeserializeOwned;
    use std::time::Duration;
    use warp::test::RequestBuilder;

    async fn create_test_app()
    -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        let db = hangman_persistence::connection::connect_to_memory_database()
            .await
            .unwrap();
        Migrator::up(&db, None).await.unwrap();
        let player_repository = Arc::new(PlayerRepository::new(db));

        let stats_port = Arc::new(RepositoryStatsPort::new(player_repository.clone()));
        let session_manager = Arc::new(SessionManager::new(GameConfig::default(), stats_port));

        create_routes(player_repository, session_manager)
    }

    fn parse<T: DeserializeOwned>(body: &[u8]) -> T {
        serde_json::from_slice(body).unwrap()
    }

    fn get_player(player_name: &str) -> RequestBuilder {
        warp::test::request()
            .method("GET")
            .path(&format!("/api/player?playerName={}", player_name))
    }

    fn start_game(player_name: &str) -> RequestBuilder {
        warp::test::request()
            .method("POST")
            .path("/api/game/start")
            .json(&serde_json::json!({ "playerName": player_name }))
    }

    fn guess(player_name: &str, letter: &str) -> RequestBuilder {
        warp::test::request()
            .method("POST")
            .path("/api/game/guess")
            .json(&serde_json::json!({ "playerName": player_name, "guess": letter }))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app().await;

        let response = warp::test::request()
            .method("GET")
            .path("/health")
            .reply(&app)
            .await;

        assert_eq!(response.status(), 200);
        assert_eq!(response.body(), "OK");
    }

    #[tokio::test]
    async fn test_get_player_requires_name() {
        let app = create_test_app().await;

        let response = warp::test::request()
            .method("GET")
            .path("/api/player")
            .reply(&app)
            .await;
        assert_eq!(response.status(), 400);

        let response = get_player("%20%20").reply(&app).await;
        assert_eq!(response.status(), 400);
        let body: serde_json::Value = parse(response.body());
        assert_eq!(body["error"], "playerName is required");
    }

    #[tokio::test]
    async fn test_get_unknown_player() {
        let app = create_test_app().await;

        let response = get_player("nobody").reply(&app).await;
        assert_eq!(response.status(), 404);
        let body: serde_json::Value = parse(response.body());
        assert_eq!(body["error"], "Player not found");
    }

    #[tokio::test]
    async fn test_create_player_and_conflict() {
        let app = create_test_app().await;

        let response = warp::test::request()
            .method("POST")
            .path("/api/players")
            .json(&serde_json::json!({ "playerName": "Aydan" }))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 201);
        let created: PlayerStats = parse(response.body());
        assert_eq!(created, PlayerStats::new("aydan"));

        // Names are case-insensitive
        let response = warp::test::request()
            .method("POST")
            .path("/api/players")
            .json(&serde_json::json!({ "playerName": "aydan" }))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 409);

        let response = get_player("AYDAN").reply(&app).await;
        assert_eq!(response.status(), 200);
        let body: serde_json::Value = parse(response.body());
        assert_eq!(body["playerName"], "aydan");
        assert_eq!(body["wins"], 0);
        assert_eq!(body["losses"], 0);
    }

    #[tokio::test]
    async fn test_create_player_requires_name() {
        let app = create_test_app().await;

        let response = warp::test::request()
            .method("POST")
            .path("/api/players")
            .json(&serde_json::json!({}))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn test_update_player_upserts() {
        let app = create_test_app().await;

        let response = warp::test::request()
            .method("PUT")
            .path("/api/player")
            .json(&serde_json::json!({ "playerName": "Kendall", "wins": 3, "losses": 2 }))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 200);

        let response = get_player("kendall").reply(&app).await;
        assert_eq!(response.status(), 200);
        let body: serde_json::Value = parse(response.body());
        assert_eq!(body["wins"], 3);
        assert_eq!(body["losses"], 2);

        let response = warp::test::request()
            .method("PUT")
            .path("/api/player")
            .json(&serde_json::json!({ "playerName": "kendall", "wins": 4, "losses": 2 }))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 200);
        let updated: PlayerStats = parse(response.body());
        assert_eq!(updated.wins, 4);
    }

    #[tokio::test]
    async fn test_start_game_creates_player() {
        let app = create_test_app().await;

        let response = start_game("Aydan").reply(&app).await;
        assert_eq!(response.status(), 200);
        let view: ViewModel = parse(response.body());
        assert_eq!(view.player_name, "aydan");
        assert_eq!(view.masked_word, "_________");
        assert_eq!(view.picture, "noose.png");
        assert_eq!(view.outcome, RoundOutcome::InProgress);
        assert_eq!(view.stats_display, "Wins: 0 | Losses: 0 | Win %: 0.0%");

        let response = get_player("aydan").reply(&app).await;
        assert_eq!(response.status(), 200);

        // Logging in again resumes the same round
        guess("aydan", "o").reply(&app).await;
        let resumed: ViewModel = parse(start_game("AYDAN").reply(&app).await.body());
        assert_eq!(resumed.masked_word, "_o___o___");
    }

    #[tokio::test]
    async fn test_guess_flow_and_stats_sync() {
        let app = create_test_app().await;
        start_game("aydan").reply(&app).await;

        let response: GuessResponse = parse(guess("aydan", "Z").reply(&app).await.body());
        assert_eq!(response.outcome, GuessOutcome::NewIncorrect);
        assert_eq!(response.view.missed_display, "z");
        assert_eq!(response.view.picture, "upperBody.png");

        let response: GuessResponse = parse(guess("aydan", "z").reply(&app).await.body());
        assert_eq!(response.outcome, GuessOutcome::DuplicateIgnored);

        let response: GuessResponse = parse(guess("aydan", "ab").reply(&app).await.body());
        assert_eq!(response.outcome, GuessOutcome::Invalid);
        assert!(response.terminal.is_none());

        let mut last = None;
        for letter in ["m", "o", "r", "e", "h", "u", "s"] {
            last = Some(parse::<GuessResponse>(guess("aydan", letter).reply(&app).await.body()));
        }
        let response = last.unwrap();
        assert_eq!(response.terminal, Some(TerminalOutcome::Won));
        assert_eq!(response.view.masked_word, "Morehouse");
        assert_eq!(response.view.wins, 1);

        let next_round = response.next_round.expect("next round should start");
        assert_eq!(next_round.masked_word, "_______");
        assert_eq!(next_round.outcome, RoundOutcome::InProgress);
        assert_eq!(next_round.wins, 1);

        // Stats are written in the background
        let mut stored_wins = 0;
        for _ in 0..50 {
            let body: serde_json::Value = parse(get_player("aydan").reply(&app).await.body());
            stored_wins = body["wins"].as_u64().unwrap_or_default();
            if stored_wins == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(stored_wins, 1);
    }

    #[tokio::test]
    async fn test_losing_round() {
        let app = create_test_app().await;
        start_game("kendall").reply(&app).await;

        let mut last = None;
        for letter in ["a", "b", "c", "d"] {
            last = Some(parse::<GuessResponse>(guess("kendall", letter).reply(&app).await.body()));
        }
        let response = last.unwrap();
        assert_eq!(response.terminal, Some(TerminalOutcome::Lost));
        assert_eq!(response.view.outcome, RoundOutcome::Lost);
        assert_eq!(response.view.picture, "botharms.png");
        assert_eq!(response.view.losses, 1);
        assert!(response.next_round.is_some());
    }

    #[tokio::test]
    async fn test_game_endpoints_without_session() {
        let app = create_test_app().await;

        let response = warp::test::request()
            .method("GET")
            .path("/api/game?playerName=ghost")
            .reply(&app)
            .await;
        assert_eq!(response.status(), 404);

        let response = warp::test::request()
            .method("POST")
            .path("/api/game/guess")
            .json(&serde_json::json!({ "playerName": "ghost", "guess": "a" }))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 404);

        let response = warp::test::request()
            .method("POST")
            .path("/api/game/new")
            .json(&serde_json::json!({ "playerName": "ghost" }))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 404);

        let response = warp::test::request()
            .method("POST")
            .path("/api/game/start")
            .json(&serde_json::json!({ "playerName": "   " }))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn test_new_round_and_logout() {
        let app = create_test_app().await;
        start_game("aydan").reply(&app).await;
        guess("aydan", "z").reply(&app).await;

        let response = warp::test::request()
            .method("POST")
            .path("/api/game/new")
            .json(&serde_json::json!({ "playerName": "aydan" }))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 200);
        let view: ViewModel = parse(response.body());
        assert_eq!(view.masked_word, "_______");
        assert!(view.missed_letters.is_empty());
        assert_eq!(view.losses, 0);

        let response = warp::test::request()
            .method("DELETE")
            .path("/api/game?playerName=Aydan")
            .reply(&app)
            .await;
        assert_eq!(response.status(), 200);

        let response = warp::test::request()
            .method("GET")
            .path("/api/game?playerName=aydan")
            .reply(&app)
            .await;
        assert_eq!(response.status(), 404);

        let response = warp::test::request()
            .method("DELETE")
            .path("/api/game?playerName=aydan")
            .reply(&app)
            .await;
        assert_eq!(response.status(), 404);
    }
}

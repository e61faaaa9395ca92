
use std::sync::Arc;

use hangman_core::{StatsPort, StatsPortError, StatsTracker};
use hangman_server::create_routes;
use hangman_server::session_manager::SessionManager;
use hangman_server::stats_port::{HttpStatsPort, RepositoryStatsPort};
use hangman_types::{PlayerStats, TerminalOutcome};
use test_helpers::*;

/// Serve the player API on an ephemeral port and point an HTTP port at it
async fn spawn_stats_api() -> HttpStatsPort {
    let repository = create_test_repository().await;
    let stats_port = Arc::new(RepositoryStatsPort::new(repository.clone()));
    let session_manager = Arc::new(SessionManager::new(create_test_config(), stats_port));
    let routes = create_routes(repository, session_manager);

    let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);

    HttpStatsPort::new(format!("http://{}/", addr))
}

#[tokio::test]
async fn test_http_port_round_trip() {
    let port = spawn_stats_api().await;

    let missing = port.fetch_player("aydan").await;
    assert!(matches!(missing, Err(StatsPortError::NotFound(_))));

    let created = port.create_player("aydan").await.unwrap();
    assert_eq!(created, PlayerStats::new("aydan"));

    let duplicate = port.create_player("aydan").await;
    assert!(matches!(duplicate, Err(StatsPortError::AlreadyExists(_))));

    let updated = port.update_player("aydan", 2, 1).await.unwrap();
    assert_eq!(updated.wins, 2);
    assert_eq!(updated.losses, 1);

    let fetched = port.fetch_player("aydan").await.unwrap();
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn test_tracker_over_http() {
    let port: Arc<dyn StatsPort> = Arc::new(spawn_stats_api().await);

    let mut tracker = StatsTracker::login("Kendall", port.clone()).await.unwrap();
    assert_eq!(tracker.stats(), &PlayerStats::new("kendall"));

    tracker.record_outcome(TerminalOutcome::Won);
    tracker.publish_and_wait().await;

    let stored = port.fetch_player("kendall").await.unwrap();
    assert_eq!(stored.wins, 1);
    assert_eq!(stored.losses, 0);
}

#[tokio::test]
async fn test_unreachable_api_is_a_persistence_error() {
    let port = HttpStatsPort::new("http://127.0.0.1:1");

    let result = port.fetch_player("aydan").await;
    assert!(matches!(result, Err(StatsPortError::Persistence(_))));
}

//! Kept to a single test: it sets process-wide environment variables.

use std::env;

use mockito::Matcher;
use recipe_finder::config::load_config;
use recipe_finder::OverlapPolicy;

#[tokio::test]
async fn test_env_overrides_reach_convenience_functions() {
    let mut server = mockito::Server::new_async().await;
    let search = server
        .mock("GET", "/search.php")
        .match_query(Matcher::UrlEncoded("f".to_string(), "c".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"meals":[{"idMeal":"9","strMeal":"Chicken Curry"}]}"#)
        .expect(1)
        .create_async()
        .await;
    let random = server
        .mock("GET", "/random.php")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"meals":[{"idMeal":"3","strMeal":"Shakshuka"}]}"#)
        .expect(1)
        .create_async()
        .await;

    env::set_var("RECIPE_FINDER__BASE_URL", server.url());
    env::set_var("RECIPE_FINDER__OVERLAP", "last_write_wins");
    env::set_var("RECIPE_FINDER__TIMEOUT", "5");
    env::set_var("RECIPE_FINDER__LIVE_FILTER", "true");

    let config = load_config().unwrap();
    assert_eq!(config.base_url, server.url());
    assert_eq!(config.overlap, OverlapPolicy::LastWriteWins);
    assert_eq!(config.timeout, 5);
    assert!(config.live_filter);

    let found = recipe_finder::search_recipe("curry night").await.unwrap();
    assert_eq!(found.name, "Chicken Curry");
    let picked = recipe_finder::random_recipe().await.unwrap();
    assert_eq!(picked.name, "Shakshuka");

    for key in [
        "RECIPE_FINDER__BASE_URL",
        "RECIPE_FINDER__OVERLAP",
        "RECIPE_FINDER__TIMEOUT",
        "RECIPE_FINDER__LIVE_FILTER",
    ] {
        env::remove_var(key);
    }

    search.assert_async().await;
    random.assert_async().await;
}

use std::collections::HashSet;

use mockito::Matcher;
use recipe_finder::{FailureKind, MealDbClient};

fn letter_query(letter: &str) -> Matcher {
    Matcher::UrlEncoded("f".to_string(), letter.to_string())
}

#[tokio::test]
async fn test_search_by_letter_example() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/search.php")
        .match_query(letter_query("a"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"meals":[{"idMeal":"1","strMeal":"Apple Pie","strInstructions":"Bake."}]}"#)
        .create_async()
        .await;

    let client = MealDbClient::new(server.url()).unwrap();
    let recipe = client.search_by_letter("a").await.unwrap();

    assert_eq!(recipe.id, "1");
    assert_eq!(recipe.name, "Apple Pie");
    assert_eq!(recipe.instructions, "Bake.");
}

#[tokio::test]
async fn test_fetch_random_single_meal() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/random.php")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"meals":[{
                "idMeal":"52959",
                "strMeal":"Baked salmon with fennel & tomatoes",
                "strInstructions":"Heat oven to 180C.",
                "strMealThumb":"https://www.themealdb.com/images/media/meals/1548772327.jpg",
                "strYoutube":"https://www.youtube.com/watch?v=xvPR2Tfw5k0",
                "strIngredient1":"Fennel","strMeasure1":"2 medium",
                "strIngredient2":"Parsley","strMeasure2":"2 tbs chopped",
                "strIngredient3":"","strMeasure3":" ",
                "strSource":"https://www.bbcgoodfood.com/recipes/7745/baked-salmon-with-fennel-and-tomatoes"
            }]}"#,
        )
        .create_async()
        .await;

    let client = MealDbClient::new(format!("{}/", server.url())).unwrap();
    let recipe = client.fetch_random().await.unwrap();

    mock.assert_async().await;
    assert_eq!(recipe.name, "Baked salmon with fennel & tomatoes");
    assert_eq!(recipe.ingredients.len(), 2);
    assert_eq!(recipe.ingredients[1].name, "Parsley");
    assert!(recipe.source_url.is_some());
}

#[tokio::test]
async fn test_fetch_random_takes_first_meal() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/random.php")
        .with_status(200)
        .with_body(r#"{"meals":[{"strMeal":"First"},{"strMeal":"Second"}]}"#)
        .create_async()
        .await;

    let client = MealDbClient::new(server.url()).unwrap();
    for _ in 0..5 {
        assert_eq!(client.fetch_random().await.unwrap().name, "First");
    }
}

#[tokio::test]
async fn test_search_with_no_matches() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/search.php")
        .match_query(letter_query("q"))
        .with_status(200)
        .with_body(r#"{"meals":null}"#)
        .create_async()
        .await;

    let client = MealDbClient::new(server.url()).unwrap();
    assert!(client.search_by_letter("q").await.is_none());

    let err = client.try_search_by_letter("q").await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::NoResults);
}

#[tokio::test]
async fn test_search_empty_letter_makes_no_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/search.php")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = MealDbClient::new(server.url()).unwrap();
    assert!(client.search_by_letter("").await.is_none());

    mock.assert_async().await;
}

#[tokio::test]
async fn test_search_picks_across_all_matches() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/search.php")
        .match_query(letter_query("b"))
        .with_status(200)
        .with_body(
            r#"{"meals":[
                {"idMeal":"1","strMeal":"Beef Stew"},
                {"idMeal":"2","strMeal":"Banana Bread"},
                {"idMeal":"3","strMeal":"Borscht"}
            ]}"#,
        )
        .expect_at_least(1)
        .create_async()
        .await;

    let client = MealDbClient::new(server.url()).unwrap();
    let mut seen = HashSet::new();
    for _ in 0..60 {
        let recipe = client.search_by_letter("b").await.unwrap();
        seen.insert(recipe.name);
    }

    // (1/3)^59 chance of seeing only one name
    assert!(seen.len() > 1, "selection always returned {:?}", seen);
    assert!(seen.is_subset(&HashSet::from([
        "Beef Stew".to_string(),
        "Banana Bread".to_string(),
        "Borscht".to_string(),
    ])));
}

#[tokio::test]
async fn test_malformed_sibling_only_fails_when_picked() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/search.php")
        .match_query(letter_query("g"))
        .with_status(200)
        .with_body(r#"{"meals":[{"strMeal":"Good"},{"idMeal":"2"}]}"#)
        .expect_at_least(1)
        .create_async()
        .await;

    let client = MealDbClient::new(server.url()).unwrap();
    let mut found_good = false;
    let mut found_decode = false;
    for _ in 0..60 {
        match client.try_search_by_letter("g").await {
            Ok(recipe) => {
                assert_eq!(recipe.name, "Good");
                found_good = true;
            }
            Err(e) => {
                assert_eq!(e.kind(), FailureKind::Decode);
                found_decode = true;
            }
        }
    }

    assert!(found_good, "the well-formed meal was never picked");
    assert!(found_decode, "the nameless meal was never picked");
}

#[tokio::test]
async fn test_letter_is_url_encoded() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/search.php")
        .match_query(letter_query("&"))
        .with_status(200)
        .with_body(r#"{"meals":null}"#)
        .create_async()
        .await;

    let client = MealDbClient::new(server.url()).unwrap();
    assert!(client.search_by_letter("&").await.is_none());

    mock.assert_async().await;
}

#[tokio::test]
async fn test_http_error_is_status_failure() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/random.php")
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;

    let client = MealDbClient::new(server.url()).unwrap();
    assert!(client.fetch_random().await.is_none());

    let err = client.try_fetch_random().await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Status);
}

#[tokio::test]
async fn test_malformed_body_is_decode_failure() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/random.php")
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let client = MealDbClient::new(server.url()).unwrap();
    let err = client.try_fetch_random().await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Decode);
    assert!(client.fetch_random().await.is_none());
}

#[tokio::test]
async fn test_meal_without_name_is_no_recipe() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/random.php")
        .with_status(200)
        .with_body(r#"{"meals":[{"idMeal":"7","strInstructions":"Stir."}]}"#)
        .create_async()
        .await;

    let client = MealDbClient::new(server.url()).unwrap();
    assert!(client.fetch_random().await.is_none());
    assert_eq!(
        client.try_fetch_random().await.unwrap_err().kind(),
        FailureKind::Decode
    );
}

#[tokio::test]
async fn test_empty_meals_array_is_no_results() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/random.php")
        .with_status(200)
        .with_body(r#"{"meals":[]}"#)
        .create_async()
        .await;

    let client = MealDbClient::new(server.url()).unwrap();
    assert_eq!(
        client.try_fetch_random().await.unwrap_err().kind(),
        FailureKind::NoResults
    );
}

#[tokio::test]
async fn test_unreachable_server_is_transport_failure() {
    let client = MealDbClient::new("http://127.0.0.1:1").unwrap();
    let err = client.try_fetch_random().await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Transport);
    assert!(client.fetch_random().await.is_none());
}

/// This test is ignored by default since it requires network access
#[tokio::test]
#[ignore]
async fn test_live_random_recipe() {
    let recipe = recipe_finder::random_recipe().await;
    assert!(recipe.is_some());
    assert!(!recipe.unwrap().name.is_empty());
}

/// This test is ignored by default since it requires network access
#[tokio::test]
#[ignore]
async fn test_live_search_recipe() {
    let recipe = recipe_finder::search_recipe("chicken").await.unwrap();
    assert!(recipe.name.to_lowercase().starts_with('c'));
}

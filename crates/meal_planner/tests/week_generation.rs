use rand::SeedableRng;
use rand::rngs::StdRng;
use secrecy::SecretString;
use spoonacular_client::RecipeError;
use spoonacular_client::http_client::ReqwestRecipeClient;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use meal_planner::PlannerError;
use meal_planner::domains::{generate_week, never_cancelled};
use meal_planner::types::{PlanRequest, Weekday};

fn client_for(server: &MockServer) -> ReqwestRecipeClient {
    ReqwestRecipeClient::new(&server.uri(), Some(SecretString::new("tok".into())))
}

fn results(ids: &[u64]) -> serde_json::Value {
    let results: Vec<_> = ids
        .iter()
        .map(|id| serde_json::json!({"id": id, "title": format!("recipe {id}"), "readyInMinutes": 25}))
        .collect();
    serde_json::json!({ "results": results, "totalResults": ids.len() })
}

#[tokio::test]
async fn week_searches_each_rule_with_slot_ceilings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/recipes/complexSearch"))
        .and(query_param("includeIngredients", "oatmeal,fruits"))
        .and(query_param("maxCalories", "450"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(&[1, 2])))
        .expect(7)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/recipes/complexSearch"))
        .and(query_param("includeIngredients", "pizza"))
        .and(query_param("maxCalories", "630"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(&[30])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/recipes/complexSearch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(&[10, 11, 12])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut rng = StdRng::seed_from_u64(2024);
    let plan = generate_week(&client, &PlanRequest::new(1800), &mut rng, &never_cancelled())
        .await
        .expect("week");

    assert_eq!(plan.days.len(), 7);
    assert_eq!(plan.meal_count(), 18);
    let friday = plan.day(Weekday::Friday).expect("friday");
    assert_eq!(friday.meals[2].id, 30);
    assert_eq!(friday.nutrients.calories, 1800.0);
    assert!(plan.day(Weekday::Sunday).expect("sunday").meals.len() == 1);

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 18);
}

#[tokio::test]
async fn empty_search_leaves_slot_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/recipes/complexSearch"))
        .and(query_param("includeIngredients", "salmon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(&[])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/recipes/complexSearch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(&[5])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut rng = StdRng::seed_from_u64(1);
    let plan = generate_week(&client, &PlanRequest::new(2000), &mut rng, &never_cancelled())
        .await
        .expect("week");
    let tuesday = plan.day(Weekday::Tuesday).expect("tuesday");
    assert_eq!(tuesday.meals.len(), 2);
    assert_eq!(tuesday.nutrients.calories, 1200.0);
}

#[tokio::test]
async fn points_limit_aborts_week_and_stops_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/recipes/complexSearch"))
        .and(query_param("includeIngredients", "salmon"))
        .respond_with(ResponseTemplate::new(402).set_body_json(serde_json::json!({
            "status": "failure",
            "code": 402,
            "message": "Your daily points limit of 150 has been reached."
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/recipes/complexSearch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(&[1])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut rng = StdRng::seed_from_u64(1);
    let err = generate_week(&client, &PlanRequest::new(2000), &mut rng, &never_cancelled())
        .await
        .expect_err("rate limited");
    match &err {
        PlannerError::Recipe(RecipeError::RateLimitExceeded(msg)) => {
            assert_eq!(msg, "Your daily points limit of 150 has been reached.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.user_message().contains("tomorrow"));

    // Monday x3, Tuesday breakfast, Tuesday lunch
    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 5);
}

#[tokio::test]
async fn unconfigured_client_makes_no_requests() {
    let server = MockServer::start().await;
    let client = ReqwestRecipeClient::new(&server.uri(), None);
    let mut rng = StdRng::seed_from_u64(1);
    let err = generate_week(&client, &PlanRequest::new(2000), &mut rng, &never_cancelled())
        .await
        .expect_err("not configured");
    assert!(matches!(
        err,
        PlannerError::Recipe(RecipeError::NotConfigured(_))
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}

use spoonacular_client::{RecipeClient, config::Config, http_client::ReqwestRecipeClient};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example: expects SPOONACULAR_API_KEY in env
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("config error: {}", e);
            return Ok(());
        }
    };
    let client = ReqwestRecipeClient::from_config(&cfg);
    if !client.is_configured() {
        eprintln!("set SPOONACULAR_API_KEY to run this example");
        return Ok(());
    }
    let categories = std::env::args().nth(1).unwrap_or_else(|| "oatmeal, fruits".into());
    let candidates = client
        .find_candidates(&categories, None, None, Some(500))
        .await?;
    for c in candidates {
        println!("{:>8}  {}", c.id, c.title);
    }
    Ok(())
}

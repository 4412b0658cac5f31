mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine, variables may come from the shell
    let _ = dotenvy::dotenv();
    env_logger::init();

    cli::run().await?;
    Ok(())
}

use taskboard_api::config::Config;
use tracing::Level;

#[actix_web::main]
async fn main() -> taskboard_api::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    let c = Config::load::<&str>(None)?;

    taskboard_api::app::start_server(c).await
}

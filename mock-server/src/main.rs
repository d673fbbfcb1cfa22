use log::info;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    pretty_env_logger::init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let api_key = std::env::var("HOODPAY_API_KEY").unwrap_or_else(|_| "test-key".to_string());
    let business_id = std::env::var("HOODPAY_BUSINESS_ID")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(1);

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!("mock HoodPay API for business {business_id} listening on http://{addr}/v1");
    mock_server::run(listener, mock_server::new_db(&api_key, business_id)).await
}

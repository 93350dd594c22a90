#[tokio::main]
async fn main() {
    if let Err(e) = wasender_gateway_lib::run().await {
        eprintln!("wasender-gateway: {}", e);
        std::process::exit(1);
    }
}

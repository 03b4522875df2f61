//! Morsel kiosk entry point.

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    morsel_kiosk::run().await
}

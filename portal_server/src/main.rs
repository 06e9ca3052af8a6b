#[tokio::main]
async fn main() {
    // Delegate to the server framework entry point.
    portal_server::run().await;
}

#[tokio::main]
async fn main() {
    distributor::start(std::env::args()).await;
}

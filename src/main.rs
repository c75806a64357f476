#[tokio::main]
async fn main() {
    let code = sendsim::app::startup::startup().await;
    std::process::exit(code);
}

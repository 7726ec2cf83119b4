#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mentor_proxy::run().await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    chat_push_dispatcher::run().await
}

//! Smart Tasks - Entry Point

#[tokio::main]
async fn main() -> eyre::Result<()> {
    smart_tasks::run().await
}

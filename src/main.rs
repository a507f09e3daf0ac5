/*
 * Responsibility
 * - tokio runtime
 * - delegate to app::run() (no logic here)
 */
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    todo_auth::app::run().await
}

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    aeroproj_cli::run().await
}

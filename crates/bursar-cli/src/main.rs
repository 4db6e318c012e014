use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = bursar_cli::cli::Cli::parse();

    if let Err(e) = bursar_cli::tracing::init(&args) {
        eprintln!("Failed to start tracing: {e}");
    }

    let output = bursar_cli::commands::run(args).await?;
    println!("{output}");
    Ok(())
}

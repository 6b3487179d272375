#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = mentorlink::run().await {
        eprintln!("mentorlink fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

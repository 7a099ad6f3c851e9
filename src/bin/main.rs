use financial_query_router::{config::RouterConfig, pipeline::QueryPipeline, session::Session};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const HELP: &str = "Commands: /history  /clear  /quit";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Logs go to stderr so replies stay readable on stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = RouterConfig::from_env()?;
    if config.groq.api_key.is_none() {
        warn!("GROQ_API_KEY not set; every query will receive the fallback reply");
    }

    let pipeline = QueryPipeline::from_config(&config)?;
    let mut session = Session::new();
    info!(session_id = %session.id, "Session started");

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(format!("Financial and Web Search AI Bot\n{}\n", HELP).as_bytes())
        .await?;

    loop {
        stdout.write_all(b"\n> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "/quit" | "/exit" => break,
            "/clear" => {
                session.history.clear();
                stdout.write_all(b"History cleared.\n").await?;
            }
            "/history" => {
                stdout.write_all(session.history.transcript().as_bytes()).await?;
            }
            "/help" => {
                stdout.write_all(format!("{}\n", HELP).as_bytes()).await?;
            }
            _ => {
                let exchange = pipeline.process(&mut session, &line).await;
                stdout
                    .write_all(format!("[{} · {}]\n{}\n", exchange.category, exchange.agent, exchange.reply).as_bytes())
                    .await?;
            }
        }
    }

    info!(
        session_id = %session.id,
        messages = session.history.len(),
        "Session ended"
    );

    Ok(())
}

//! Standalone feed debug tool.
//! Run with: LOGSTREAM_URL=wss://... cargo run -p logstream --bin logstream-debug -- -n 20
//!
//! Prints every transaction signature with its instruction lines, plus a
//! running count. Useful for checking which log markers a node actually emits.

use clap::Parser;
use logstream::connection::redact;
use logstream::LogStream;

#[derive(Parser)]
#[command(name = "logstream-debug", about = "Print raw transactions from a logsSubscribe feed")]
struct Cli {
    /// Websocket endpoint, api key included
    #[arg(long, env = "LOGSTREAM_URL", hide_env_values = true)]
    url: String,

    /// Stop after this many transactions
    #[arg(short = 'n', long, default_value_t = 50)]
    max: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Cli { url, max } = Cli::parse();

    eprintln!("[logstream-debug] connecting to {}", redact(&url));
    let mut stream = LogStream::connect(&url).await?;
    stream.subscribe().await?;
    eprintln!("[logstream-debug] subscribed, waiting for transactions");

    let mut seen = 0usize;
    while seen < max {
        let Some(raw) = stream.next_logs().await? else {
            eprintln!("[logstream-debug] connection closed by server");
            break;
        };
        seen += 1;
        if seen == 1 {
            if let Some(id) = stream.subscription() {
                eprintln!("[logstream-debug] subscription id {id}");
            }
        }
        println!(
            "#{seen} {} ({} lines{})",
            raw.signature,
            raw.logs.len(),
            if raw.failed { ", failed" } else { "" }
        );
        for line in raw.logs.iter().filter(|l| l.contains("Instruction:")) {
            println!("    {line}");
        }
    }

    stream.close().await;
    eprintln!("[logstream-debug] done after {seen} transactions");
    Ok(())
}

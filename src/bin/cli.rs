use std::io::Write;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use rudis::{Client, Command, Error, ReplyKind};

const PORT: u16 = 6379;

#[derive(Parser, Debug)]
struct Args {
    /// The host to connect to
    #[arg(long, default_value = "127.0.0.1", env = "RUDIS_HOST")]
    host: String,
    /// The port to connect to
    #[arg(short, long, default_value_t = PORT, env = "RUDIS_PORT")]
    port: u16,
    /// Decode every reply as this kind instead of auto-detecting
    #[arg(long, default_value_t = ReplyKind::Anything)]
    reply_kind: ReplyKind,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let _ = tracing_subscriber::fmt()
        .try_init()
        .map_err(|e| debug!("Failed to initialize global tracing: {}", e));

    let args = Args::parse();
    let mut client = Client::connect((args.host.as_str(), args.port)).await?;

    println!("connected to {}:{}", args.host, args.port);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;

    while let Some(line) = lines.next_line().await? {
        let mut parts = line.split_whitespace();

        let Some(name) = parts.next() else {
            prompt()?;
            continue;
        };

        if name.eq_ignore_ascii_case("quit") {
            client.quit().await?;
            break;
        }

        let command = Command::new(&name.to_uppercase()).args(parts);

        match client.execute(command, args.reply_kind).await {
            Ok(reply) => println!("{}", reply),
            Err(Error::Reply(message)) => println!("(error) {}", message),
            Err(err) => return Err(err),
        }

        prompt()?;
    }

    Ok(())
}

fn prompt() -> Result<(), Error> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}

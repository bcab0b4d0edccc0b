use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use rouilleshd::constants::DEFAULT_LISTEN_ADDRESS;
use rouilleshd::core_client::{ClientError, ShellClient};
use rouilleshd::core_shellcommand::shellcommand::ShellCommand;
use rouilleshd::helpers::init_logger;
use std::path::Path;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "rouillesh", about = "Interactive client for rouilleshd.")]
struct Cli {
    /// Server address
    #[arg(short, long, env = "ROUILLESH_SERVER", default_value = DEFAULT_LISTEN_ADDRESS)]
    server: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_logger("warn");

    let socket = TcpStream::connect(&args.server)
        .await
        .with_context(|| format!("Failed to connect to {}", args.server))?;
    let mut client = ShellClient::new(socket);
    let mut stdout = io::stdout();

    let mut output = client.read_until_prompt().await?;
    stdout.write_all(&output).await?;
    stdout.flush().await?;

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let words: Vec<&str> = line.split_whitespace().collect();
        let outcome = match words.as_slice() {
            [] => Err(ClientError::Usage("cd | ls | cp | ul | dl")),
            ["ul", dest_dir, local] => client
                .upload(dest_dir, Path::new(local))
                .await
                .map(|n| Some(format!("uploaded {} bytes", n))),
            ["ul", ..] => Err(ClientError::Usage(ShellCommand::UL.usage())),
            ["dl", local_dir, remote] => client
                .download(Path::new(local_dir), remote)
                .await
                .map(|n| Some(format!("downloaded {} bytes", n))),
            ["dl", ..] => Err(ClientError::Usage(ShellCommand::DL.usage())),
            _ => client.send_line(&line).await.map(|_| None),
        };

        match outcome {
            Ok(Some(message)) => eprintln!("{}", message.green()),
            Ok(None) => {}
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) if e.before_send() => {
                eprintln!("{}", e.to_string().red());
                // Nothing was sent; show the last prompt again.
                let prompt_start = output.iter().rposition(|&b| b == b'\n').map_or(0, |i| i + 1);
                stdout.write_all(&output[prompt_start..]).await?;
                stdout.flush().await?;
                continue;
            }
            Err(e) => eprintln!("{}", e.to_string().red()),
        }

        output = client.read_until_prompt().await?;
        stdout.write_all(&output).await?;
        stdout.flush().await?;
    }

    Ok(())
}

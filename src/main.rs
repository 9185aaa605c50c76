use clap::Parser;
use courier::{network, Args, ClientConfig, Command, CourierError, DhcpClient};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), CourierError> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mac = network::interface_hardware_address(&args.interface).await?;
    tracing::info!("Found MAC address {} on '{}'", mac, args.interface);

    let config = ClientConfig::new(args.interface.clone(), mac)
        .with_reply_timeout(Duration::from_secs(args.timeout));
    let mut client = DhcpClient::new(config).await?;

    match args.command.unwrap_or(Command::Obtain) {
        Command::Obtain => {
            let lease = client.obtain().await?;
            println!("Obtained lease: {lease:?}");
        }
        Command::Release { client: address, server } => {
            client.release(address, server).await?;
            println!("Released {address} to {server}");
        }
    }
    Ok(())
}

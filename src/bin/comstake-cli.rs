use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "comstake-cli")]
#[command(about = "Command-line client for the comstake dashboard API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version, chain connection and selected account
    Status,
    /// Show aggregate chain statistics
    Stats,
    /// List validators
    Validators,
    /// Show the featured validator card
    Featured,
    /// Look up the balance of a wallet
    Balance { wallet: String },
    /// Enable the wallet extension and list its accounts
    Connect,
    /// Select an account for signing
    Select { address: String },
    /// Forget the selected account
    Disconnect,
    /// Stake tokens with a validator
    Stake { validator: String, amount: String },
    /// Unstake tokens from a validator
    Unstake { validator: String, amount: String },
    /// Move stake from one validator to another
    Restake {
        from: String,
        to: String,
        amount: String,
    },
    /// Transfer tokens to another address
    Transfer { to: String, amount: String },
    /// Show recent notifications
    Notifications,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match cli.command {
        Commands::Status => client.get(format!("{base}/api/status")),
        Commands::Stats => client.get(format!("{base}/api/stats")),
        Commands::Validators => client.get(format!("{base}/api/validators")),
        Commands::Featured => client.get(format!("{base}/api/featured")),
        Commands::Balance { wallet } => client.get(format!("{base}/api/balance/{wallet}")),
        Commands::Notifications => client.get(format!("{base}/api/notifications")),
        Commands::Connect => client.post(format!("{base}/api/wallet/connect")),
        Commands::Select { address } => client
            .post(format!("{base}/api/wallet/select"))
            .json(&json!({ "address": address })),
        Commands::Disconnect => client.post(format!("{base}/api/wallet/disconnect")),
        Commands::Stake { validator, amount } => client
            .post(format!("{base}/api/tx/stake"))
            .json(&json!({ "validator": validator, "amount": amount })),
        Commands::Unstake { validator, amount } => client
            .post(format!("{base}/api/tx/unstake"))
            .json(&json!({ "validator": validator, "amount": amount })),
        Commands::Restake { from, to, amount } => client
            .post(format!("{base}/api/tx/restake"))
            .json(&json!({ "validator_from": from, "validator_to": to, "amount": amount })),
        Commands::Transfer { to, amount } => client
            .post(format!("{base}/api/tx/transfer"))
            .json(&json!({ "to": to, "amount": amount })),
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: dashboard API returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    if text.is_empty() {
        println!("{}", status);
        return Ok(());
    }

    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

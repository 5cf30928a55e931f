use clap::{Args, Parser, Subcommand};
use reqwest::{Method, StatusCode};
use serde_json::{json, Map, Value};

#[derive(Parser)]
#[command(name = "inventory-cli")]
#[command(about = "Command-line client for the inventory API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000", env = "INVENTORY_URL")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every item, newest first
    List,
    /// Show one item
    Get { id: String },
    /// Create an item
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        quantity: i64,
        #[command(flatten)]
        fields: OptionalFields,
    },
    /// Change the given fields of an item
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        quantity: Option<i64>,
        #[command(flatten)]
        fields: OptionalFields,
    },
    /// Delete an item
    Delete { id: String },
    /// Check API health
    Health,
}

#[derive(Args)]
struct OptionalFields {
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    price: Option<f64>,
    #[arg(long)]
    location: Option<String>,
}

impl OptionalFields {
    fn write_into(self, body: &mut Map<String, Value>) {
        if let Some(description) = self.description {
            body.insert("description".into(), json!(description));
        }
        if let Some(price) = self.price {
            body.insert("price".into(), json!(price));
        }
        if let Some(location) = self.location {
            body.insert("location".into(), json!(location));
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let (method, path, body) = match cli.command {
        Commands::List => (Method::GET, "/items".to_string(), None),
        Commands::Get { id } => (Method::GET, format!("/items/{}", id), None),
        Commands::Create {
            name,
            quantity,
            fields,
        } => {
            let mut body = Map::new();
            body.insert("name".into(), json!(name));
            body.insert("quantity".into(), json!(quantity));
            fields.write_into(&mut body);
            (Method::POST, "/items".to_string(), Some(Value::Object(body)))
        }
        Commands::Update {
            id,
            name,
            quantity,
            fields,
        } => {
            let mut body = Map::new();
            if let Some(name) = name {
                body.insert("name".into(), json!(name));
            }
            if let Some(quantity) = quantity {
                body.insert("quantity".into(), json!(quantity));
            }
            fields.write_into(&mut body);
            (Method::PATCH, format!("/items/{}", id), Some(Value::Object(body)))
        }
        Commands::Delete { id } => (Method::DELETE, format!("/items/{}", id), None),
        Commands::Health => (Method::GET, "/health".to_string(), None),
    };

    let mut request = client.request(method, format!("{}{}", base, path));
    if let Some(body) = body {
        request = request.json(&body);
    }

    let res = request.send().await?;
    let status = res.status();
    if !print_response(res).await? {
        std::process::exit(exit_code(status));
    }

    Ok(())
}

/// Print the body; returns false for non-success statuses.
async fn print_response(res: reqwest::Response) -> Result<bool, Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: inventory API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(false);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(true)
}

fn exit_code(status: StatusCode) -> i32 {
    if status.is_client_error() {
        2
    } else {
        1
    }
}

use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "site-cli")]
#[command(about = "Inspect the content API of a running site-content service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service status and active CMS backend
    Health,
    /// List services, or show one by slug
    Services { slug: Option<String> },
    /// List industries, or show one by slug
    Industries { slug: Option<String> },
    /// List resources, narrow to a category, or show one
    Resources {
        category: Option<String>,
        slug: Option<String>,
    },
    /// Show featured resources
    Featured {
        #[arg(short, long, default_value_t = 3)]
        limit: usize,
    },
    /// List static paths: services, industries or resources
    Paths { kind: String },
    /// Show a singleton page (homepage, navigation, footer, about, ...)
    Page { name: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let path = match cli.command {
        Commands::Health => "/health".to_string(),
        Commands::Services { slug: None } => "/api/services".to_string(),
        Commands::Services { slug: Some(slug) } => format!("/api/services/{slug}"),
        Commands::Industries { slug: None } => "/api/industries".to_string(),
        Commands::Industries { slug: Some(slug) } => format!("/api/industries/{slug}"),
        Commands::Resources { category: None, .. } => "/api/resources".to_string(),
        Commands::Resources {
            category: Some(category),
            slug: None,
        } => format!("/api/resources/{category}"),
        Commands::Resources {
            category: Some(category),
            slug: Some(slug),
        } => format!("/api/resources/{category}/{slug}"),
        Commands::Featured { limit } => format!("/api/resources/featured?limit={limit}"),
        Commands::Paths { kind } => format!("/api/paths/{kind}"),
        Commands::Page { name } => format!("/api/pages/{name}"),
    };

    let res = client
        .get(format!("{}{}", cli.url.trim_end_matches('/'), path))
        .send()
        .await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: content API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

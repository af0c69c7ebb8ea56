use clap::{Parser, Subcommand};
use serde_json::json;

use webharness::driver_manager::GLOBAL_DRIVER_MANAGER;
use webharness::{
    ActionWrapper, ApiClient, HarnessConfig, HarnessError, SearchPage, Session, search_locators,
};

#[derive(Parser)]
#[command(name = "webharness")]
#[command(about = "Browser UI smoke-test harness", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Browser to drive (chrome, firefox)
    #[arg(short, long, global = true)]
    browser: Option<String>,

    /// Environment to point at (qa, stage, dev)
    #[arg(short, long, global = true)]
    environment: Option<String>,

    /// Run the browser with a visible window (disables headless)
    #[arg(long = "no-headless", global = true)]
    no_headless: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search and print the complementary result title
    Search {
        /// Text to search for
        query: String,
    },

    /// Verify the results contain a link with the given text
    VerifyLink {
        /// Exact link text to look for
        text: String,

        /// Search query to run first
        #[arg(short, long, default_value = "ducks")]
        query: String,
    },

    /// Count Wikipedia links in the results
    CountWikiLinks {
        /// Search query to run first
        #[arg(default_value = "ducks")]
        query: String,
    },

    /// Run the JSON API smoke test
    ApiCheck {
        /// Override the configured API URI
        #[arg(long)]
        uri: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let result = run().await;

    // Always reap WebDriver processes before exiting
    GLOBAL_DRIVER_MANAGER.stop_all();

    match result {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            let error_json = json!({
                "error": true,
                "message": err.to_string(),
                "exit_code": err.exit_code()
            });
            println!(
                "{}",
                serde_json::to_string(&error_json).unwrap_or_else(|_| "{}".to_string())
            );

            // Also log to stderr for human reading
            eprintln!("Error: {}", err);
            std::process::exit(err.exit_code());
        }
    }
}

async fn run() -> Result<(), HarnessError> {
    webharness::logging::init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    match cli.command {
        Commands::Search { query } => {
            let page = open_search_page(config).await?;
            let title = page.search_for(&query).await;
            println!("{}", json!({ "query": query, "result_title": title }));
            page.close().await?;
        }

        Commands::VerifyLink { text, query } => {
            let page = open_search_page(config).await?;
            let _ = page.search_for(&query).await;
            let present = page.verify_result_link_with_text(&text).await;
            println!("{}", json!({ "link_text": text, "present": present }));
            page.close().await?;
        }

        Commands::CountWikiLinks { query } => {
            let page = open_search_page(config).await?;
            let _ = page.search_for(&query).await;
            let count = page.count_wiki_links().await;
            println!("{}", json!({ "query": query, "wiki_links": count }));
            page.close().await?;
        }

        Commands::ApiCheck { uri } => {
            let uri = uri.unwrap_or_else(|| config.api_uri.clone());
            let body = ApiClient::new().get_json(&uri).await?;
            println!("{}", json!({ "uri": uri, "body": body }));
        }
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<HarnessConfig, HarnessError> {
    let mut config = HarnessConfig::from_env()?;

    if let Some(browser) = &cli.browser {
        config.browser = browser.parse()?;
    }
    if let Some(environment) = &cli.environment {
        config.environment = environment.parse()?;
    }
    if cli.no_headless {
        config.headless = false;
    }

    Ok(config)
}

async fn open_search_page(config: HarnessConfig) -> Result<SearchPage, HarnessError> {
    let session = Session::open(config).await?;
    let endpoint = session.config().endpoint().to_string();
    session.navigate(&endpoint).await?;
    Ok(SearchPage::new(ActionWrapper::new(session), search_locators()))
}

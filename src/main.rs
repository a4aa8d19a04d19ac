//! VibeMart CLI
//!
//! Drives the storefront page handlers against a running shop backend:
//! - Add products to the cart
//! - Edit cart line quantities
//! - Live search through the debouncer
//! - Top up the wallet
//! - Preview an image upload

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

use vibemart::config::{generate_default_config, Config};
use vibemart::controller::query_len;
use vibemart::page::search::product_url;
use vibemart::page::{FixedAmount, TerminalPrompt};
use vibemart::{
    HttpBackend, NotificationKind, PageController, PageMsg, PageState, PageStore, TopUpOutcome,
};

/// How long `search` waits for the reply after the debounce fires
const SEARCH_REPLY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser)]
#[command(name = "vibemart")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "VibeMart storefront client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Shop base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Config file (default: standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Initial cookie string, e.g. "csrftoken=abc; sessionid=xyz"
    #[arg(long, global = true)]
    pub cookie: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a product to the cart
    AddToCart {
        /// Product id
        product: String,
        /// Quantity (default: 1)
        #[arg(short, long)]
        quantity: Option<u32>,
    },

    /// Type a new quantity into a cart line
    UpdateItem {
        /// Cart item id
        item: String,
        /// Quantity as typed; clamped to 1..=max-stock
        quantity: String,
        /// Stock limit of the line, as carried by the page
        #[arg(long)]
        max_stock: Option<String>,
    },

    /// Live search; each argument is one burst of typing
    Search {
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Add money to the wallet
    TopUp {
        /// Amount (prompts when omitted)
        #[arg(short, long)]
        amount: Option<String>,
    },

    /// Preview an image as an upload control would
    Preview { file: PathBuf },

    /// Print or write the default configuration
    Config {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        return write_default_config(output.as_deref());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = cli.base_url {
        config.backend.base_url = url;
    }
    if let Some(cookie) = cli.cookie {
        config.backend.cookie = Some(cookie);
    }
    config.logging.init();

    let backend = HttpBackend::new(config.backend.clone())?;
    if let Err(e) = backend.load_page().await {
        tracing::warn!(error = %e, "Could not load storefront page; continuing with configured cookies");
    }

    let state = match &cli.command {
        Commands::UpdateItem {
            item, max_stock, ..
        } => PageState::default().with_cart_line(
            item,
            "1",
            max_stock.as_deref(),
            config.ui.default_max_stock,
        ),
        _ => PageState::default(),
    };
    let store = PageStore::new(state);
    let mut events = store.subscribe();
    let page = PageController::new(Arc::new(backend), store, config.ui.clone());
    let placeholder = config.ui.placeholder_image.clone();

    let mut failed = false;
    match cli.command {
        Commands::AddToCart { product, quantity } => {
            page.add_to_cart(&product, quantity).await;
        }
        Commands::UpdateItem { item, quantity, .. } => {
            page.edit_quantity(&item, &quantity).await;
        }
        Commands::Search { text } => {
            let search = page.search_box();
            for burst in &text {
                search.on_input(burst).await;
            }
            search.settle().await;

            let last = text.last().map(|t| t.trim()).unwrap_or_default();
            if query_len(last) >= config.ui.search_min_chars {
                let waited = tokio::time::timeout(
                    SEARCH_REPLY_TIMEOUT,
                    wait_for_results(&mut events, &placeholder, &mut failed),
                )
                .await;
                if waited.is_err() {
                    println!("No search reply (see log)");
                    failed = true;
                }
            }
        }
        Commands::TopUp { amount } => {
            let outcome = match amount {
                Some(amount) => page.top_up_wallet(&FixedAmount(Some(amount))).await,
                None => page.top_up_wallet(&TerminalPrompt).await,
            };
            match outcome {
                TopUpOutcome::Invalid => println!("Nothing sent: amount must be a positive number"),
                TopUpOutcome::Credited => println!("Wallet credited"),
                TopUpOutcome::Failed => failed = true,
            }
        }
        Commands::Preview { file } => {
            page.preview_image(&file)
                .await
                .with_context(|| format!("previewing {}", file.display()))?;
            if let Some(preview) = page.store().snapshot().await.preview {
                println!("{}", preview.render_html());
            }
        }
        Commands::Config { .. } => {}
    }

    while let Ok(msg) = events.try_recv() {
        print_event(&msg, &placeholder, &mut failed);
    }

    if failed {
        anyhow::bail!("action failed");
    }
    Ok(())
}

/// Print page events until the search panel is filled
async fn wait_for_results(
    events: &mut broadcast::Receiver<PageMsg>,
    placeholder: &str,
    failed: &mut bool,
) {
    loop {
        match events.recv().await {
            Ok(msg) => {
                let done = matches!(msg, PageMsg::SearchResults(_));
                print_event(&msg, placeholder, failed);
                if done {
                    return;
                }
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!("Skipped {} page events", n);
            }
            Err(broadcast::error::RecvError::Closed) => return,
        }
    }
}

fn print_event(msg: &PageMsg, placeholder: &str, failed: &mut bool) {
    match msg {
        PageMsg::CartCountChanged(count) => println!("Cart items: {}", count),
        PageMsg::CartTotalsChanged {
            cart_total,
            item_total,
        } => {
            if let Some(item) = item_total {
                println!("Item {} total: ${}", item.item_id, item.total);
            }
            if let Some(total) = cart_total {
                println!("Cart total: ${}", total);
            }
        }
        PageMsg::QuantitySet {
            cart_item_id,
            value,
        } => println!("Item {} quantity: {}", cart_item_id, value),
        PageMsg::Notify(notification) => {
            if notification.kind == NotificationKind::Error {
                *failed = true;
            }
            println!("[{}] {}", notification.kind, notification.message);
        }
        PageMsg::Dismiss(_) => {}
        PageMsg::SearchHidden => println!("Search results hidden"),
        PageMsg::SearchResults(hits) if hits.is_empty() => println!("No products found"),
        PageMsg::SearchResults(hits) => {
            for hit in hits {
                println!(
                    "{:<32} ${:<10} {}  [{}]",
                    hit.name,
                    hit.price,
                    product_url(&hit.id),
                    hit.image.as_deref().unwrap_or(placeholder)
                );
            }
        }
        PageMsg::PreviewLoaded(url) => println!("Preview ready ({} bytes)", url.len()),
        PageMsg::ReloadRequested => println!("Page reload requested"),
    }
}

fn write_default_config(output: Option<&std::path::Path>) -> anyhow::Result<()> {
    let content = generate_default_config();
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote default config to {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

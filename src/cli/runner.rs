//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::endpoint::{load_endpoint, EndpointConfig, HttpPageSource};
use crate::error::{Error, Result};
use crate::fetcher::{CancelFlag, FetchOptions, PagedFetcher};
use crate::state::TokenStore;
use futures::StreamExt;
use serde_json::json;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Fetch {
                max_items,
                page_size,
                resume,
                token,
            } => {
                self.fetch(*max_items, *page_size, *resume, token.as_deref())
                    .await
            }
            Commands::Page { token, page_size } => {
                self.page(token.as_deref(), *page_size).await
            }
            Commands::Validate => self.validate(),
            Commands::State => self.state().await,
        }
    }

    /// Load the endpoint definition
    fn load_endpoint(&self) -> Result<EndpointConfig> {
        let path = self
            .cli
            .endpoint
            .as_ref()
            .ok_or_else(|| Error::config("Endpoint file not specified (use -e flag)"))?;
        load_endpoint(path)
    }

    /// Open the token store, in-memory when no state file is given
    fn token_store(&self) -> Result<TokenStore> {
        match &self.cli.state {
            Some(path) => TokenStore::from_file(path),
            None => Ok(TokenStore::in_memory()),
        }
    }

    /// Drain the endpoint to NDJSON on stdout
    async fn fetch(
        &self,
        max_items: Option<u64>,
        page_size: Option<u32>,
        resume: bool,
        token: Option<&str>,
    ) -> Result<()> {
        let config = self.load_endpoint()?;
        let name = config.name.clone();
        let store = self.token_store()?;

        let initial_token = match token {
            Some(t) => Some(t.to_string()),
            None if resume => store.get_token(&name).await,
            None => None,
        };

        let cancel = CancelFlag::new();
        install_ctrlc_handler(&cancel)?;

        let mut options = FetchOptions::new()
            .with_max_page_size(config.page.max_size)
            .with_cancel_flag(cancel);
        if let Some(budget) = max_items {
            options = options.with_item_budget(budget);
        }
        if let Some(hint) = page_size {
            options = options.with_page_size_hint(hint);
        }
        if let Some(t) = initial_token {
            info!(endpoint = %name, "resuming from saved token");
            options = options.resume_from(t);
        }

        let fetcher = PagedFetcher::new(HttpPageSource::new(config));

        let mut emitted: u64 = 0;
        let mut pages: u64 = 0;
        let mut last_token: Option<String> = None;

        let mut stream = Box::pin(fetcher.pages(options));
        while let Some(page) = stream.next().await {
            let page = page?;
            for item in &page.items {
                println!("{item}");
            }
            emitted += page.len() as u64;
            pages += 1;
            last_token = page.next_token.clone();
        }

        store.set_token(&name, last_token.clone()).await?;
        store.add_emitted(&name, emitted).await?;

        info!(
            endpoint = %name,
            items = emitted,
            pages,
            resumable = last_token.is_some(),
            "fetch finished"
        );
        Ok(())
    }

    /// Fetch one page and print it with its continuation token
    async fn page(&self, token: Option<&str>, page_size: Option<u32>) -> Result<()> {
        let config = self.load_endpoint()?;
        let name = config.name.clone();
        let store = self.token_store()?;

        let mut options = FetchOptions::new().with_max_page_size(config.page.max_size);
        if let Some(hint) = page_size {
            options = options.with_page_size_hint(hint);
        }
        if let Some(t) = token {
            options = options.resume_from(t);
        }

        let fetcher = PagedFetcher::new(HttpPageSource::new(config));
        let page = fetcher.single_page(&options).await?;

        let emitted = page.len() as u64;
        let next_token = page.next_token.clone();
        if next_token.is_none() {
            warn!(endpoint = %name, "no continuation token, listing is done");
        }

        println!(
            "{}",
            json!({
                "items": page.items,
                "next_token": page.next_token,
            })
        );

        store.set_token(&name, next_token).await?;
        store.add_emitted(&name, emitted).await?;
        Ok(())
    }

    /// Validate the endpoint definition
    fn validate(&self) -> Result<()> {
        let config = self.load_endpoint()?;
        println!(
            "Endpoint '{}' is valid: {} {}",
            config.name,
            match config.method {
                crate::types::Method::GET => "GET",
                crate::types::Method::POST => "POST",
            },
            config.url
        );
        Ok(())
    }

    /// Print the saved state
    async fn state(&self) -> Result<()> {
        let store = self.token_store()?;
        println!("{}", store.to_json_pretty().await?);
        Ok(())
    }
}

/// Wire Ctrl-C into the cancellation flag so a drain stops between pages
fn install_ctrlc_handler(cancel: &CancelFlag) -> Result<()> {
    let flag = cancel.clone();
    ctrlc::set_handler(move || {
        warn!("interrupt received, stopping after the current page");
        flag.cancel();
    })
    .map_err(|e| Error::Other(format!("Failed to install Ctrl-C handler: {e}")))
}

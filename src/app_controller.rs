use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};

use crate::app_config::Config;
use crate::digest::Digest;
use crate::enrichment::{EnrichmentClient, LlmEnricher, NoEnrichment, TextGenerator, WordEnricher};
use crate::errors::ParseError;
use crate::file_utils::FileManager;
use crate::ledger::{JsonLedger, RootLedger};
use crate::line_source::{LineSource, PdfLineSource};
use crate::notifier::{Notifier, TelegramNotifier};
use crate::page::{PageResult, PageSegmenter};

// @module: Application controller for the daily root cycle

/// Options for a single run
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    // @field: Send the message without recording the root
    pub preview: bool,
    // @field: First page to scan instead of the ledger's next page
    pub start_page: Option<usize>,
}

/// What a run ended with
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Message sent and root recorded
    Published(Digest),
    /// Message sent, ledger untouched
    Previewed(Digest),
    /// No unused root inside the search window
    NothingNew,
}

/// Page found by the search
#[derive(Debug, Clone, PartialEq)]
pub struct FoundPage {
    pub page: usize,
    pub result: PageResult,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Page engine built from the parsing section
    segmenter: PageSegmenter,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        let segmenter = PageSegmenter::new(config.segmenter_options());
        Ok(Self { config, segmenter })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn segmenter(&self) -> &PageSegmenter {
        &self.segmenter
    }

    /// Run one cycle against the configured PDF, ledger, enrichment provider and chat
    pub async fn run(&self, options: RunOptions) -> Result<RunOutcome> {
        let source = PdfLineSource::open(&self.config.pdf_path)
            .with_context(|| format!("Failed to open dictionary {}", self.config.pdf_path))?;
        let mut ledger = JsonLedger::load(&self.config.state_path);
        let enricher = self.build_enricher();
        let notifier = TelegramNotifier::new(self.config.telegram.clone());

        self.run_cycle(&source, &mut ledger, enricher.as_ref(), &notifier, options).await
    }

    /// Segment one page of the configured PDF
    pub fn inspect(&self, page: usize) -> Result<Option<Result<PageResult, ParseError>>> {
        let source = PdfLineSource::open(&self.config.pdf_path)
            .with_context(|| format!("Failed to open dictionary {}", self.config.pdf_path))?;
        self.inspect_page(&source, page)
    }

    /// Segment one page; `None` when the page has no text
    pub fn inspect_page(
        &self,
        source: &dyn LineSource,
        page: usize,
    ) -> Result<Option<Result<PageResult, ParseError>>> {
        let lines = source.get_lines(page)?;
        Ok(lines.map(|lines| self.segmenter.segment(&lines)))
    }

    /// Enricher for the configured provider, or a no-op when it cannot be used
    pub fn build_enricher(&self) -> Box<dyn WordEnricher> {
        let enrichment = &self.config.enrichment;
        if !enrichment.enabled {
            debug!("Enrichment disabled");
            return Box::new(NoEnrichment);
        }
        if !enrichment.is_usable() {
            warn!(
                "{} API key not set. Enrichment will be skipped.",
                enrichment.provider.display_name()
            );
            return Box::new(NoEnrichment);
        }

        let client = EnrichmentClient::from_config(enrichment);
        info!("Using {} for enrichment ({})", client.provider_name(), enrichment.get_model());
        Box::new(LlmEnricher::new(client, enrichment.word_count))
    }

    /// Make one cheap request to the configured enrichment provider
    pub async fn check_enrichment(&self) -> Result<()> {
        let enrichment = &self.config.enrichment;
        if !enrichment.enabled {
            info!("Enrichment disabled, nothing to check");
            return Ok(());
        }
        if !enrichment.is_usable() {
            return Err(anyhow!("{} API key not set", enrichment.provider.display_name()));
        }

        let client = EnrichmentClient::from_config(enrichment);
        Self::check_generator(client.provider_name(), &client).await
    }

    pub async fn check_generator(name: &str, generator: &dyn TextGenerator) -> Result<()> {
        generator
            .check_connection()
            .await
            .with_context(|| format!("{} connection test failed", name))?;
        info!("{} connection OK", name);
        Ok(())
    }

    /// Scan from `start` for the first page whose root has not been published
    pub fn find_next_page(
        &self,
        source: &dyn LineSource,
        ledger: &dyn RootLedger,
        start: usize,
    ) -> Result<Option<FoundPage>> {
        let search = &self.config.search;
        let end = start
            .saturating_add(search.search_window)
            .min(search.max_pages)
            .min(source.page_count());

        if start >= end {
            info!("No pages left to scan from page {}", start);
            return Ok(None);
        }

        info!("Scanning pages {} to {}...", start, end - 1);
        let progress_bar = ProgressBar::new((end - start) as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pages {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style);

        let mut found = None;
        for page in start..end {
            progress_bar.set_message(format!("page {}", page));

            let lines = source
                .get_lines(page)
                .with_context(|| format!("Failed to read page {}", page))?;

            match lines.map(|lines| self.segmenter.segment(&lines)) {
                None => debug!("Page {} has no text", page),
                Some(Err(e)) => debug!("Page {}: {}", page, e),
                Some(Ok(result)) if ledger.contains(&result.root) => {
                    info!("Root {} already used. Skipping.", result.root);
                }
                Some(Ok(result)) => {
                    found = Some(FoundPage { page, result });
                    break;
                }
            }

            progress_bar.inc(1);
        }

        progress_bar.finish_and_clear();
        Ok(found)
    }

    /// Search, enrich, format and deliver one root
    pub async fn run_cycle(
        &self,
        source: &dyn LineSource,
        ledger: &mut dyn RootLedger,
        enricher: &dyn WordEnricher,
        notifier: &dyn Notifier,
        options: RunOptions,
    ) -> Result<RunOutcome> {
        let start = options.start_page.unwrap_or_else(|| ledger.next_page());

        let Some(FoundPage { page, result }) = self.find_next_page(source, &*ledger, start)? else {
            info!("No new roots found.");
            return Ok(RunOutcome::NothingNew);
        };

        info!("Found root {} on page {} ({} entries)", result.root, page, result.entries.len());
        let mut digest = Digest::from_page(page, result);

        let min_entries = self.config.search.min_entries;
        if digest.dictionary_count() < min_entries {
            info!("Fewer than {} entries. Enriching...", min_entries);
            let words = enricher.words_for_root(&digest.root).await;
            digest.add_enriched(words);
        }

        let message = digest.format_message(self.config.search.max_message_words);
        FileManager::write_to_file(&self.config.preview_path, &message)?;
        debug!("Preview written to {}", self.config.preview_path);

        notifier
            .send(&message)
            .await
            .with_context(|| format!("Failed to deliver root {}", digest.root))?;

        if options.preview {
            info!("Preview mode: history not updated.");
            return Ok(RunOutcome::Previewed(digest));
        }

        ledger
            .record(&digest.root, page)
            .with_context(|| format!("Failed to record root {}", digest.root))?;
        info!("Recorded root {} (page {})", digest.root, page);

        Ok(RunOutcome::Published(digest))
    }
}

/*!
 * # Shoresh - Daily Hebrew roots from a dictionary PDF
 *
 * A Rust library that rebuilds dictionary pages from visually ordered PDF
 * text and publishes one unseen root a day.
 *
 * ## Features
 *
 * - Reassemble right-to-left Hebrew text without detaching vowel points
 * - Segment a page into its root and entries using script composition only
 * - Skip roots that were already published
 * - Enrich sparse pages with LLM-generated words:
 *   - Gemini API
 *   - Ollama (local LLM)
 *   - Anthropic API
 * - Deliver the digest to a Telegram chat
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `page`: The page reconstruction engine:
 *   - `page::graphemes`: Grapheme reassembly
 *   - `page::segmenter`: Entry segmentation
 * - `line_source`: Raw line extraction from PDF pages
 * - `ledger`: History of published roots
 * - `enrichment`: Extra words for sparse pages
 * - `providers`: Client implementations for LLM providers
 * - `digest`: Message formatting
 * - `notifier`: Telegram delivery
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod digest;
pub mod enrichment;
pub mod errors;
pub mod file_utils;
pub mod ledger;
pub mod line_source;
pub mod notifier;
pub mod page;
pub mod providers;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunOptions, RunOutcome};
pub use digest::Digest;
pub use errors::{AppError, LedgerError, ParseError, ProviderError, SourceError};
pub use page::{reassemble, EntryRecord, PageResult, PageSegmenter};

//! # bizfinder
//!
//! Finds local businesses that have no website, by asking Gemini to search
//! Google Maps data around the user's location.
//!
//! The crate is split the same way the interactive client is:
//!
//! - [`location`]: where the user is (fixed coordinates or IP lookup)
//! - [`providers::gemini`]: the AI query service
//! - [`reply`]: cleaning, parsing and filtering the model's JSON reply
//! - [`session`]: the search session state machine
//! - [`render`]: terminal rendering of the session
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bizfinder::{providers::GeminiService, types::{BusinessFinder, Coordinates}};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gemini = GeminiService::new("YOUR_API_KEY")?;
//!     let here = Coordinates::new(37.77, -122.41)?;
//!
//!     let businesses = gemini.find_businesses_without_website("coffee shops", here).await?;
//!     for business in businesses {
//!         println!("{}: {}", business.name, business.address);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod location;
pub mod prompt;
pub mod providers;
pub mod render;
pub mod reply;
pub mod session;
pub mod types;
pub mod utils;

// Re-export common types
pub use config::Config;
pub use error::{FinderError, FinderResult as Result};
pub use session::{SearchSession, SessionPhase};
pub use types::{Business, BusinessFinder, Coordinates, DebugOptions, LocationProvider};

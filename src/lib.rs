// DCA Compare - Core Library
// Exposes all modules for use in the CLI, the API server, and tests

pub mod error;
pub mod series;
pub mod plan;
pub mod simulator;
pub mod validation;
pub mod providers;
pub mod config;
pub mod telemetry;
#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use error::{ProviderError, RequestError, SimulationError};
pub use series::{normalize, PriceBar, PriceSeries};
pub use plan::{ContributionPlan, Frequency, TRADING_DAYS_PER_MONTH};
pub use simulator::{simulate, simulate_cadence, SimulationReport, SimulationResult};
pub use validation::{validate, SubmitRequest, ValidatedRequest};
pub use providers::{read_price_csv, CsvProvider, PriceProvider, StaticProvider};
#[cfg(feature = "server")]
pub use providers::{YahooConfig, YahooProvider};
pub use config::{AppConfig, ProviderKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

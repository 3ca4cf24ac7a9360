//! gini_rs
//!
//! A small Rust library for retrieving the World Bank GINI index (`SI.POV.GINI`) of a
//! country and picking its most recent valid observation. Pairs with the `gini` CLI.
//!
//! ### Features
//! - One blocking request per lookup, with every outcome classified as data
//!   ([`FetchOutcome`]) instead of an error
//! - Tolerant interpretation of the API's loosely typed `[meta, data]` responses
//! - Latest-value selection and a printable history
//! - Optional forwarding of the latest value to a numeric transform
//! - Summary statistics and CSV/JSON export of the history
//!
//! ### Example
//! ```no_run
//! use gini_rs::{Client, FetchOutcome, interpret};
//!
//! let client = Client::default();
//! match client.lookup("ARG") {
//!     FetchOutcome::Success(records) => {
//!         if let Some(latest) = interpret::select_latest(&records) {
//!             println!("{:?} {:?}", latest.period, latest.numeric_value());
//!         }
//!         for line in interpret::format_history(&records) {
//!             println!("{}", line);
//!         }
//!     }
//!     FetchOutcome::Empty => println!("no data"),
//!     FetchOutcome::Failure(e) => eprintln!("{}", e),
//! }
//! ```

pub mod api;
pub mod error;
pub mod interpret;
pub mod models;
pub mod stats;
pub mod storage;
pub mod transform;

pub use api::{Client, ClientConfig, Fetch};
pub use error::{ErrorKind, FetchError, TransportError};
pub use models::{DateSpec, FetchOutcome, IndicatorRecord, ObservedValue, RawResponse};

//! tpmstore - look up, create and update TeamPasswordManager entries.
//!
//! tpmstore turns a flat list of lookup terms, as an automation tool passes
//! them, into one call against a TeamPasswordManager installation and hands
//! back a single value.
//!
//! # Lookup terms
//!
//! ```text
//! <url> <user> <password> name=<exact name> | search=<query>
//!     [return_value=<field>] [create=True|False] [reason=<unlock reason>]
//!     [project_id=<id>] [password=<value>|random] [username=<value>]
//!     [access_info=<value>] [tags=<csv>] [email=<value>]
//!     [expiry_date=<date>] [notes=<value>]
//! ```
//!
//! - Plain lookup (`create=False`, the default) returns the `return_value`
//!   field (default `password`) of the single matching entry.
//! - `create=True` updates the single matching entry, or creates one in
//!   `project_id` when nothing matches, and returns the password that was
//!   stored. `password=random` asks the service to generate it.
//!
//! # Quick Start
//!
//! ```no_run
//! use tpmstore::backends::tpm::TpmFactory;
//! use tpmstore::notify::TracingNotifier;
//!
//! #[tokio::main]
//! async fn main() -> tpmstore::Result<()> {
//!     let terms: Vec<String> = std::env::args().skip(1).collect();
//!
//!     let values = tpmstore::lookup::run(&terms, &TpmFactory::default(), &TracingNotifier).await?;
//!     println!("{}", values[0]);
//!     Ok(())
//! }
//! ```
//!
//! # Feature Flags
//!
//! | Feature | Default | Provides |
//! |---------|---------|----------|
//! | `http` | yes | [`backends::tpm`], the v4 API client, and the `tpmstore` binary |
//! | `mock` | yes | [`backends::mock`], an in-memory client for tests |

pub mod client;
pub mod config;
pub mod entry;
pub mod error;
pub mod factory;
pub mod lookup;
pub mod notify;
pub mod request;
pub mod validation;
pub mod backends;

pub use client::TpmClient;
pub use config::{ClientOptions, ConnectionParams};
pub use entry::{CreatedEntry, Entry, EntryField, EntryFields, EntryId, EntryRef, GeneratedPassword};
pub use error::{ClientError, ErrorKind, Result, TpmStoreError};
pub use factory::ClientFactory;
pub use notify::Notifier;
pub use request::LookupRequest;

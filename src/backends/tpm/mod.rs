//! TeamPasswordManager API v4 client.
//!
//! Talks to a TeamPasswordManager installation over HTTP(S) with basic
//! authentication.
//!
//! # Requirements
//!
//! - TeamPasswordManager with the API enabled
//! - An API user allowed to read (and, for create/update, edit) the entries
//!
//! # Example
//!
//! ```no_run
//! use tpmstore::backends::tpm::TpmFactory;
//! use tpmstore::notify::TracingNotifier;
//! use tpmstore::{lookup, ConnectionParams, LookupRequest};
//!
//! #[tokio::main]
//! async fn main() -> tpmstore::Result<()> {
//!     let conn = ConnectionParams::new("https://tpm.example.com", "ansible", "s3cret")
//!         .with_unlock_reason("Deploy by automation");
//!     let req = LookupRequest::for_name("db-root");
//!
//!     let password = lookup::execute(&conn, &req, &TpmFactory::default(), &TracingNotifier).await?;
//!     println!("{}", password[0]);
//!     Ok(())
//! }
//! ```

mod client;
mod wire;

pub use client::{api_root, TpmApiV4, TpmFactory, PAGE_SIZE};

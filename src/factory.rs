//! Client factories.
//!
//! A lookup builds a fresh client per invocation through a
//! [`ClientFactory`]. The factory is injected so tests can hand out a mock
//! and the binary can hand out the HTTP client.

use crate::client::{ClientResult, TpmClient};
use crate::config::ConnectionParams;

/// Builds a client session from connection parameters.
///
/// Implementations return [`ClientError::Config`](crate::ClientError::Config)
/// when the URL is unusable and any other
/// [`ClientError`](crate::ClientError) for the rest.
///
/// Plain closures implement this trait:
///
/// ```
/// use tpmstore::backends::mock::MockClient;
/// use tpmstore::{ClientError, ClientFactory, ConnectionParams, TpmClient};
///
/// let mock = MockClient::new();
/// let factory = move |_conn: &ConnectionParams| -> Result<Box<dyn TpmClient>, ClientError> {
///     Ok(Box::new(mock.clone()))
/// };
///
/// let conn = ConnectionParams::new("https://tpm.example.com", "user", "pass");
/// assert!(factory.connect(&conn).is_ok());
/// ```
pub trait ClientFactory: Send + Sync {
    /// Creates a client for one lookup.
    fn connect(&self, conn: &ConnectionParams) -> ClientResult<Box<dyn TpmClient>>;
}

impl<F> ClientFactory for F
where
    F: Fn(&ConnectionParams) -> ClientResult<Box<dyn TpmClient>> + Send + Sync,
{
    fn connect(&self, conn: &ConnectionParams) -> ClientResult<Box<dyn TpmClient>> {
        self(conn)
    }
}

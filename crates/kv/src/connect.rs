//! Opening connections for a [`PairStore`](crate::PairStore).

use crate::Connection;

/// Produces a [`Connection`] that a `PairStore` can run against.
///
/// Implementors hold whatever is needed to reach the backing table, such as
/// a database URL, an existing pool, or settings read from the environment.
pub trait Connect {
    /// Connection opened by this connector.
    type Conn: Connection;

    /// Error returned when the connection cannot be opened.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Open the connection.
    fn connect(&self) -> impl std::future::Future<Output = Result<Self::Conn, Self::Error>> + Send;
}

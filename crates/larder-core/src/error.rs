//! Error types for `larder-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A quantity string did not match the accepted grammar
  /// (`INT | INT "/" INT | INT WS INT "/" INT`).
  #[error("unparseable quantity: {0:?}")]
  QuantityFormat(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

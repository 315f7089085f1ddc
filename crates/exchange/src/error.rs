use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Symbol '{0}' is not listed on the exchange")]
    UnknownSymbol(String),
}

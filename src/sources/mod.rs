use crate::error::Result;
use crate::model::ResultEntry;

/// Produces the rows shown for a query.
pub trait Source {
    fn fetch(&self, query: &str) -> Result<Vec<ResultEntry>>;
}

pub mod installed;
pub mod search;

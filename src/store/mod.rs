mod categories;
mod transactions;

pub use categories::{CategoryChange, CategorySet};
pub use transactions::TransactionStore;

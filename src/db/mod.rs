pub mod accounts;
pub mod ledger;
pub mod pool;

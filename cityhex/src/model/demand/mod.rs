mod apportionment;

pub use apportionment::{apportion, Apportionment};

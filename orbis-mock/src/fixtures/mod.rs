pub mod countries;
pub mod rates;

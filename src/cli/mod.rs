pub mod compare;
pub mod rates;
pub mod setup;
pub mod simulate;
pub mod ui;

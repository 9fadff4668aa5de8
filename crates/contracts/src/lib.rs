pub mod calc;
pub mod domain;
pub mod export;

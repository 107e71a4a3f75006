pub mod calories;
pub mod validation;

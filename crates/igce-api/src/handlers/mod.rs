pub mod form_view;
pub mod health;
pub mod igce;
pub mod pricing_history;

//! Reusable rendering helpers shared by screens.

pub mod sub_tabs;
pub mod voucher_card;

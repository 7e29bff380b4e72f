//! Request middleware applied ahead of routing.

pub mod page_normalization;

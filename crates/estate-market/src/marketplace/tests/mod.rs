pub(crate) mod common;

mod search;

pub(crate) mod common;
mod dispatch;

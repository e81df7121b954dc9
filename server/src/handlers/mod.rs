pub(crate) mod auth;
pub(crate) mod catalog;
pub(crate) mod changes;
pub(crate) mod employees;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct Ack<T: Serialize> {
    success: bool,
    message: &'static str,
    #[serde(flatten)]
    extra: T,
}

impl<T: Serialize> Ack<T> {
    pub(crate) fn new(message: &'static str, extra: T) -> Self {
        Self {
            success: true,
            message,
            extra,
        }
    }
}

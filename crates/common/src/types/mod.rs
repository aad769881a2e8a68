use serde::{Deserialize, Serialize};

/// `{ "data": ... }` wrapper used by the list, get and delete routes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DataEnvelope<T> {
    pub data: T,
}

impl<T> DataEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

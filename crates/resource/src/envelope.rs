use serde::{Deserialize, Serialize};

/// Collection response wrapper: `{ "value": [...], "count": N }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    #[serde(default, alias = "@odata.count")]
    pub count: u64,
}

impl<T> Envelope<T> {
    pub fn new(value: Vec<T>) -> Self {
        let count = value.len() as u64;
        Self { value, count }
    }

    pub fn empty() -> Self {
        Self {
            value: Vec::new(),
            count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn into_items(self) -> Vec<T> {
        self.value
    }
}

impl<T> Default for Envelope<T> {
    fn default() -> Self {
        Self::empty()
    }
}

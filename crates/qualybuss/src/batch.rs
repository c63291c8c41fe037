use serde::Serialize;

/// One item of a sequential bulk operation that did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    pub item: String,
    pub error: String,
}

/// Outcome of a bulk operation. Successes are kept even when other items fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport<T> {
    pub succeeded: Vec<T>,
    pub failures: Vec<BatchFailure>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> BatchReport<T> {
    pub fn record<E: std::fmt::Display>(&mut self, item: impl Into<String>, result: Result<T, E>) {
        match result {
            Ok(value) => self.succeeded.push(value),
            Err(err) => {
                let item = item.into();
                tracing::warn!(%item, error = %err, "batch item failed");
                self.failures.push(BatchFailure {
                    item,
                    error: err.to_string(),
                });
            }
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failures.len()
    }
}

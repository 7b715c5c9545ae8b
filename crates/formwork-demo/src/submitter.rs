use std::time::Duration;

use formwork_core::controller::Submitter;
use formwork_core::error::SubmitError;
use formwork_core::value::FormValues;

/// Stand-in submission backend: waits a fixed delay, then accepts (or, when
/// configured to fail, rejects) the values.
#[derive(Debug, Clone)]
pub struct DelayedSubmitter {
    delay: Duration,
    fail: bool,
    accepted: Vec<String>,
}

impl DelayedSubmitter {
    pub fn new(delay: Duration, fail: bool) -> Self {
        Self {
            delay,
            fail,
            accepted: Vec::new(),
        }
    }

    /// Names of the forms accepted so far, in order.
    pub fn accepted(&self) -> &[String] {
        &self.accepted
    }
}

impl Submitter for DelayedSubmitter {
    fn submit(&mut self, form: &str, values: &FormValues) -> Result<(), SubmitError> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        if self.fail {
            return Err(SubmitError::new("backend rejected the submission"));
        }
        tracing::debug!(form, fields = values.len(), "backend accepted values");
        self.accepted.push(form.to_string());
        Ok(())
    }
}

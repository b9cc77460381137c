//! Submission gating for [`FormState`].

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use super::{FormState, FormValues};
use crate::domain::Error;
use crate::domain::validation::FieldViolations;

/// Receiver of a valid form's values, typically a facade call.
#[async_trait]
pub trait SubmitHandler: Send + Sync {
    /// Value produced by a successful submission.
    type Output: Send;

    /// Perform the submission.
    async fn submit(&self, values: FormValues) -> Result<Self::Output, Error>;
}

/// Reasons a submission never reached the handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    /// At least one field is invalid; every field is now touched.
    #[error("form is invalid")]
    Invalid {
        /// Violations at the time of the attempt.
        fields: FieldViolations,
    },
    /// A previous submission has not resolved yet.
    #[error("a submission is already in flight")]
    InFlight,
}

/// Outcome of a failed [`FormState::submit`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    /// The handler was not invoked.
    #[error(transparent)]
    Rejected(#[from] SubmitRejected),
    /// The handler ran and failed.
    #[error(transparent)]
    Failed(#[from] Error),
}

/// Clears the submitting flag when the submission resolves or is dropped.
struct InFlight<'a>(&'a mut bool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

impl FormState {
    /// Start a submission and return the value snapshot for the handler.
    ///
    /// An invalid form marks every field touched. Call
    /// [`FormState::finish_submit`] once the handler resolves.
    ///
    /// # Errors
    /// Returns [`SubmitRejected`] when the form is invalid or a submission is
    /// in flight.
    pub fn begin_submit(&mut self) -> Result<FormValues, SubmitRejected> {
        if self.submitting {
            return Err(SubmitRejected::InFlight);
        }
        if !self.is_valid() {
            self.mark_all_touched();
            let fields = self.violations();
            debug!(fields = ?fields.fields().collect::<Vec<_>>(), "form submission rejected");
            return Err(SubmitRejected::Invalid { fields });
        }
        self.submitting = true;
        Ok(self.values())
    }

    /// Clear the submitting flag after the handler resolved.
    pub fn finish_submit(&mut self) {
        self.submitting = false;
    }

    /// Validate, then hand the values to `handler`.
    ///
    /// The submitting flag is true while the handler runs and is cleared
    /// when it resolves or when this future is dropped.
    ///
    /// # Errors
    /// Returns [`SubmitError::Rejected`] without calling the handler, or
    /// [`SubmitError::Failed`] with the handler's error.
    pub async fn submit<H>(&mut self, handler: &H) -> Result<H::Output, SubmitError>
    where
        H: SubmitHandler + ?Sized,
    {
        let values = self.begin_submit()?;
        let _in_flight = InFlight(&mut self.submitting);
        Ok(handler.submit(values).await?)
    }
}

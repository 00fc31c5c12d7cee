pub mod classify;
pub mod error;
pub mod form;
pub mod record;

pub use classify::{classify, classify_answer, Classification, Tally};
pub use error::{Error, Result};
pub use form::{Answer, FormAction, FormStep};
pub use record::{generate_key, NewRsvp, RsvpRecord, RsvpSubmission, KEY_PREFIX};

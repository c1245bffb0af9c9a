//! Rule-definition validation.
//!
//! Pure checks over a [`RuleDraft`](crate::rule::RuleDraft) that produce a
//! map of field-level problems, plus the merge of field errors reported back
//! by the rules API. No I/O happens here.

pub mod evaluator;
pub mod fields;
pub mod server_errors;
pub mod version;

pub use evaluator::{
    validate, validate_with, UntouchedTargetPolicy, ValidatorConfig, BOTH_TARGETS_MESSAGE,
    NO_TARGET_MESSAGE,
};
pub use fields::{Field, FieldErrors};
pub use server_errors::{merge_server_details, parse_server_error, ServerError};
pub use version::is_valid_version;

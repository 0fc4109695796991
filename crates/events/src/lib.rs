//! Change notifications, mail relay and error alerting.
//!
//! - [`EventBus`]: in-process publish/subscribe hub for [`TableChange`]s,
//!   backed by `tokio::sync::broadcast`.
//! - [`Mailer`]: SMTP relay for [`MailPayload`]s (inquiry notices and
//!   error alerts).
//! - [`ErrorReporter`]: logs operational errors by severity and mails an
//!   alert for the serious ones.

pub mod bus;
pub mod mail;
pub mod reporter;
pub mod templates;

pub use bus::{ChangeKind, EventBus, RefreshAction, TableChange};
pub use mail::{ErrorMail, InquiryMail, MailConfig, MailError, MailPayload, Mailer};
pub use reporter::ErrorReporter;

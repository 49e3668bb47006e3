//! Channel dispatch: rendering and sending one message through one
//! provider, recording the outcome.

mod dispatcher;
pub mod templates;
pub mod traits;

pub use dispatcher::{ChannelDispatcher, DispatchOutcome, DEFAULT_DISPATCH_TIMEOUT_SECS};
pub use templates::{MessageTemplate, TemplateCatalog, TemplateVars};
pub use traits::{EmailProviderTrait, SmsProviderTrait};

#[cfg(test)]
mod tests;

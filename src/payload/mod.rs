//! Payload constructs
//!
//! Pure builders that turn one domain action into the exact body shape the
//! remote API expects.

pub mod body;
pub mod interaction;
pub mod mentions;
pub mod message;
pub mod status;

pub use body::{ActionBody, FormPart, MultipartForm};
pub use interaction::{
    ApplicationCommand, CommandOption, InteractionPayload, SendInteractionOptions,
};
pub use mentions::{MentionCategory, MentionOptions, MentionPolicy};
pub use message::{AttachmentDescriptor, AttachmentSource, MessagePayload, SendMessageOptions};
pub use status::{StatusOptions, StatusPayload};

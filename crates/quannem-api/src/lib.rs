// quannem-api: HTTP transport for the Quán Nem data layer (baseline + webhook)

pub mod baseline;
pub mod error;
pub mod transport;
pub mod webhook;

pub use baseline::BaselineClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
pub use webhook::{Embed, EmbedField, EmbedFooter, WebhookClient, WebhookPayload};

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod operations;
pub mod record;
pub mod secure_hash;
pub mod transport;

pub use client::{JazzCashClient, PreparedRequest};
pub use common_crypto::SecretKey;
pub use config::{Environment, GatewayConfig};
pub use endpoint::EndpointBuilder;
pub use error::{GatewayError, GatewayResult};
pub use operations::{OperationKind, OperationSpec};
pub use record::TransactionRecord;
pub use secure_hash::generate_secure_hash;
pub use transport::{HttpTransport, Transport};

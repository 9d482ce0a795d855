// RSA Session Library
// Textbook RSA key transport plus AES-256-GCM message sessions

pub mod codec;
pub mod config;
pub mod error;
pub mod identity;
pub mod rsa;
pub mod session;
pub mod symmetric;

pub use config::KeyGenConfig;
pub use error::{CryptoError, Result};
pub use identity::{IdentityRecord, PublicIdentity};
pub use rsa::{RsaKeyPair, RsaPrivateKey, RsaPublicKey};
pub use session::{
    establish_as_receiver, establish_as_sender, initialize_session_as_receiver,
    initialize_session_as_sender, receive_message, send_message, Channel, EncryptedEnvelope,
    MemoryChannel, ProtocolMessage, Session, WrappedKey,
};
pub use symmetric::SessionKey;

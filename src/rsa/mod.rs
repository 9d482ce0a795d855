// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod bigint;
pub mod decrypt;
pub mod encrypt;
pub mod keygen;
pub mod padding;
pub mod primality;

pub use bigint::RsaBigInt;
pub use decrypt::{decrypt_bytes, decrypt_framed, decrypt_integer, decrypt_to_string};
pub use encrypt::{encrypt_bytes, encrypt_framed, encrypt_integer, encrypt_string};
pub use keygen::{
    generate_keypair, generate_keypair_async, spawn_keypair_generation, KeyGenHandle, RsaKeyPair,
    RsaPrivateKey, RsaPublicKey,
};
pub use padding::{frame_payload, max_framed_payload, strip_leading_control_byte, unframe_payload};
pub use primality::is_probable_prime;

// Two-party demo: enroll two identities, establish a session, exchange a message

use std::thread;

use anyhow::{Context, Result};
use tracing::info;

use rsa_session::rsa::generate_keypair_async;
use rsa_session::{
    establish_as_receiver, establish_as_sender, receive_message, send_message, KeyGenConfig,
    MemoryChannel,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = KeyGenConfig::default();
    let (sender, receiver) = tokio::try_join!(
        generate_keypair_async(config.clone()),
        generate_keypair_async(config),
    )
    .context("key generation failed")?;

    // Round-trip through the persisted forms, as a real deployment would
    let receiver_record = receiver
        .to_identity_record()
        .context("receiver identity record")?;
    let receiver_public = receiver
        .to_public_identity()
        .and_then(|identity| identity.public_key())
        .context("receiver public identity")?;
    info!(
        sender = %sender.public_key.fingerprint(),
        receiver = %receiver.public_key.fingerprint(),
        "identities enrolled"
    );

    let (mut sender_end, mut receiver_end) = MemoryChannel::pair();

    let receiver_task = thread::spawn(move || -> rsa_session::Result<String> {
        let private_key = receiver_record.private_key()?;
        let session = establish_as_receiver(&mut receiver_end, &private_key)?;
        receive_message(&mut receiver_end, &session)
    });

    let session = establish_as_sender(&mut sender_end, &receiver_public)?;
    send_message(&mut sender_end, &session, "My name is Allison Burgers.")?;

    let received = receiver_task
        .join()
        .map_err(|_| anyhow::anyhow!("receiver thread panicked"))??;
    info!(message = %received, "receiver decrypted message");

    Ok(())
}

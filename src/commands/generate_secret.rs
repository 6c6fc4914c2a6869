use base64::{engine::general_purpose, Engine as _};
use rand::RngCore;

const SECRET_BYTES: usize = 64;

/// 64 random bytes from the OS-seeded thread RNG, base64 encoded.
#[must_use]
pub fn generate_secret() -> String {
    let mut secret = [0u8; SECRET_BYTES];
    rand::thread_rng().fill_bytes(&mut secret);

    general_purpose::STANDARD.encode(secret)
}

/// Print a fresh signing secret as a ready-to-paste `jwt` config section.
pub fn handle_generate_secret_command() {
    println!("🔐 Generated JWT secret:");
    println!();
    println!("jwt:");
    println!("  secret: \"{}\"", generate_secret());
    println!("  expiration_days: 7");
    println!();
    println!("Add this to config/<environment>.yaml or export APP_JWT__SECRET.");
}

/*!
Memory handling for sensitive data.

Every secret the session layer holds (KEM and signing secret keys,
shared secrets, session keys, chain keys) lives in a [`SecretBytes`]
buffer that is overwritten when it is dropped or replaced.
*/

pub mod secret;

pub use secret::SecretBytes;
pub use zeroize::Zeroize;

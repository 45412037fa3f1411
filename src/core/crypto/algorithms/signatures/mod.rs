/*!
Signature algorithm implementations.
*/

mod dilithium;

use crate::core::crypto::config::SignatureAlgorithm;
use crate::core::crypto::traits::signature::Signature;

pub use dilithium::DilithiumAuthenticator;

/// Create an authenticator for the specified algorithm
pub fn create_authenticator(algorithm: SignatureAlgorithm) -> Box<dyn Signature> {
    Box::new(DilithiumAuthenticator::new(algorithm))
}

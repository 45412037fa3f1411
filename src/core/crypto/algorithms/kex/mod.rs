/*!
Key exchange algorithm implementations.
*/

mod kyber;

use crate::core::crypto::config::KeyExchangeAlgorithm;
use crate::core::crypto::traits::kex::KeyExchange;

pub use kyber::KyberKeyExchange;

/// Create a key exchange implementation for the specified algorithm
pub fn create_key_exchange(algorithm: KeyExchangeAlgorithm) -> Box<dyn KeyExchange> {
    Box::new(KyberKeyExchange::new(algorithm))
}

//! Random filler text.

use rand::distr::Alphanumeric;
use rand::Rng;

/// Generate `len` random ASCII letters and digits.
///
/// The output never needs escaping in JSON or XML, so its byte length is
/// exactly `len` in either encoding.
pub fn random_filler<R: Rng>(rng: &mut R, len: usize) -> String {
    (0..len).map(|_| char::from(rng.sample(Alphanumeric))).collect()
}

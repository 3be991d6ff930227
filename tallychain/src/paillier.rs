use crate::*;
use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_prime::RandPrime;
use num_traits::One;

/// The public half of the election keypair.
///
/// `n` is the modulus (a product of two primes) and `g` the generator,
/// conventionally `n + 1`. This is everything a ballot client needs:
/// encryption and the ciphertext algebra are defined over `n` and `g`
/// alone.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    #[serde(rename = "N", with = "crate::serde_decimal")]
    pub n: BigUint,
    #[serde(rename = "G", with = "crate::serde_decimal")]
    pub g: BigUint,
}

impl PublicKey {
    /// The ciphertext-space modulus n².
    pub fn n_squared(&self) -> BigUint {
        &self.n * &self.n
    }

    /// Encrypt a plaintext in `[0, n)`.
    ///
    /// The tally side never calls this: ballots arrive already
    /// encrypted. It exists for clients and for round-trip tests. Fresh
    /// randomness is drawn per call, so two encryptions of the same
    /// plaintext yield different ciphertexts.
    pub fn encrypt(&self, m: &BigUint) -> BigUint {
        let nn = self.n_squared();
        let r = self.sample_unit();
        (self.g.modpow(m, &nn) * r.modpow(&self.n, &nn)) % nn
    }

    /// Combine two ciphertexts into the ciphertext of the plaintext sum.
    ///
    /// Multiplication mod n² is the group operation of the ciphertext
    /// space. Reducing on every combination keeps the accumulator
    /// bounded no matter how many ballots are folded into it.
    pub fn add_ciphertexts(&self, c1: &BigUint, c2: &BigUint) -> BigUint {
        (c1 * c2) % self.n_squared()
    }

    /// Sample an invertible element of Z/n for encryption randomness.
    fn sample_unit(&self) -> BigUint {
        let mut rng = rand::thread_rng();
        loop {
            let r = rng.gen_biguint_below(&self.n);
            if r.gcd(&self.n).is_one() {
                return r;
            }
        }
    }
}

/// The private half of the election keypair.
///
/// Losing `lambda` and `mu` makes every ciphertext stored under the
/// matching public key permanently undecryptable, so the pair must be
/// kept for as long as the ledger is.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PrivateKey {
    pub public_key: PublicKey,

    /// λ = lcm(p - 1, q - 1)
    #[serde(with = "crate::serde_decimal")]
    lambda: BigUint,

    /// μ = L(g^λ mod n²)⁻¹ mod n
    #[serde(with = "crate::serde_decimal")]
    mu: BigUint,
}

impl PrivateKey {
    /// Decrypt a ciphertext produced under the matching public key.
    ///
    /// No well-formedness check is performed: a value encrypted under a
    /// different key, or not a ciphertext at all, decrypts to a
    /// meaningless plaintext rather than an error.
    pub fn decrypt(&self, c: &BigUint) -> BigUint {
        let n = &self.public_key.n;
        let nn = self.public_key.n_squared();
        let c_lambda = c.modpow(&self.lambda, &nn);
        let l = (c_lambda - 1u32) / n;
        (l * &self.mu) % n
    }
}

/// Generate a fresh keypair with a modulus of `bit_size` bits.
///
/// Two independent primes of `bit_size / 2` bits each are sampled, and
/// `g` is fixed to `n + 1`. The modular inverse μ always exists for a
/// valid prime pair, but that is checked rather than assumed.
pub fn generate_keypair(bit_size: usize) -> Result<(PublicKey, PrivateKey), Error> {
    if bit_size < 16 {
        return Err(Error::KeyGeneration("modulus size too small"));
    }
    let mut rng = rand::thread_rng();

    let p: BigUint = rng.gen_prime_exact(bit_size / 2, None);
    let mut q: BigUint = rng.gen_prime_exact(bit_size / 2, None);
    while q == p {
        q = rng.gen_prime_exact(bit_size / 2, None);
    }

    let n = &p * &q;
    let g = &n + 1u32;

    let p1 = &p - 1u32;
    let q1 = &q - 1u32;
    let lambda = (&p1 * &q1) / p1.gcd(&q1);

    let nn = &n * &n;
    let l = (g.modpow(&lambda, &nn) - 1u32) / &n;
    let mu = l
        .modinv(&n)
        .ok_or(Error::KeyGeneration("L(g^λ) is not invertible mod n"))?;

    let public_key = PublicKey { n, g };
    let private_key = PrivateKey {
        public_key: public_key.clone(),
        lambda,
        mu,
    };

    Ok((public_key, private_key))
}

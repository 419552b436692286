/*
 * Responsibility
 * - Bearer トークン (HS256 JWT) の署名検証と claims の decode
 * - 必須 claim は課さない。exp / nbf はあれば検証する
 */
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};

/// HS256 bearer-token verifier built once at startup from the shared secret.
///
/// Cheap to clone and safe to use from concurrent requests; nothing in here
/// mutates after construction.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        // Tokens are self-contained claims bundles: a valid signature is the
        // only requirement. exp/nbf still apply when the token carries them;
        // aud/iss are not this layer's concern.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims::<&str>(&[]);
        validation.validate_aud = false;
        validation.validate_nbf = true;

        Self {
            decoding_key,
            validation,
        }
    }

    /// Verify the signature and decode the payload into the raw claims map.
    pub fn verify(&self, token: &str) -> Result<Map<String, Value>, jsonwebtoken::errors::Error> {
        let data =
            jsonwebtoken::decode::<Map<String, Value>>(token, &self.decoding_key, &self.validation)?;

        Ok(data.claims)
    }
}

//! Signature profiles and the composers that implement them.
use super::SignerError;
use super::composers::{
    KeyInfoComposer, ObjectComposer, QualifyingPropertiesComposer, SignatureComposer,
    SignatureValueComposer, SignedInfoComposer, SignedPropertiesComposer,
    XadesQualifyingPropertiesComposer, XadesSignedPropertiesComposer, XmlDsigSignatureComposer,
    XmlDsigSignedInfoComposer,
};
use std::collections::BTreeMap;
use std::fmt;

pub const XADES_BES: &str = "xades-bes";

/// Composers used by one signing profile.
pub struct ComposerSet {
    pub signature: Box<dyn SignatureComposer>,
    pub signed_info: Box<dyn SignedInfoComposer>,
    pub signed_properties: Box<dyn SignedPropertiesComposer>,
    pub qualifying_properties: Box<dyn QualifyingPropertiesComposer>,
    pub key_info: KeyInfoComposer,
    pub object: ObjectComposer,
    pub signature_value: SignatureValueComposer,
}

impl ComposerSet {
    pub fn xades_bes() -> Self {
        Self {
            signature: Box::new(XmlDsigSignatureComposer),
            signed_info: Box::new(XmlDsigSignedInfoComposer),
            signed_properties: Box::new(XadesSignedPropertiesComposer),
            qualifying_properties: Box::new(XadesQualifyingPropertiesComposer),
            key_info: KeyInfoComposer,
            object: ObjectComposer,
            signature_value: SignatureValueComposer,
        }
    }
}

impl fmt::Debug for ComposerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposerSet").finish_non_exhaustive()
    }
}

type Factory = Box<dyn Fn() -> ComposerSet + Send + Sync>;

/// Registry of signature profiles by name.
///
/// The default registry knows `xades-bes`; further profiles can be added with
/// [`register`](Self::register) and selected through `SignerConfig::profile`.
///
/// # Examples
/// ```rust
/// use facturark_core::signer::resolver::{ComposerResolver, ComposerSet};
///
/// let mut resolver = ComposerResolver::default();
/// resolver.register("dian-2019", ComposerSet::xades_bes);
/// assert!(resolver.resolve("dian-2019").is_ok());
/// assert!(resolver.resolve("xades-t").is_err());
/// ```
pub struct ComposerResolver {
    profiles: BTreeMap<String, Factory>,
}

impl ComposerResolver {
    /// A registry with no profiles at all.
    pub fn empty() -> Self {
        Self {
            profiles: BTreeMap::new(),
        }
    }

    /// Adds or replaces the profile `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> ComposerSet + Send + Sync + 'static,
    {
        self.profiles.insert(name.into(), Box::new(factory));
    }

    pub fn resolve(&self, name: &str) -> Result<ComposerSet, SignerError> {
        let factory = self
            .profiles
            .get(name)
            .ok_or_else(|| SignerError::UnknownProfile {
                name: name.to_string(),
            })?;
        Ok(factory())
    }

    pub fn profiles(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }
}

impl Default for ComposerResolver {
    fn default() -> Self {
        let mut resolver = Self::empty();
        resolver.register(XADES_BES, ComposerSet::xades_bes);
        resolver
    }
}

impl fmt::Debug for ComposerResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposerResolver")
            .field("profiles", &self.profiles.keys().collect::<Vec<_>>())
            .finish()
    }
}

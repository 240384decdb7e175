//! Element identifiers for one signing operation.
use std::collections::HashMap;
use uuid::Uuid;

/// Issues `xmldsig-<uuid>-<role>` identifiers that share one uuid.
///
/// # Examples
/// ```rust
/// use facturark_core::signer::identifier::Identifier;
///
/// let mut ids = Identifier::new();
/// let key_info = ids.generate("keyinfo");
/// assert!(key_info.starts_with(ids.base()));
/// assert!(key_info.ends_with("-keyinfo"));
/// assert_ne!(ids.generate("ref"), ids.generate("ref"));
/// ```
#[derive(Debug, Clone)]
pub struct Identifier {
    base: String,
    issued: HashMap<String, usize>,
}

impl Identifier {
    pub fn new() -> Self {
        Self::with_uuid(Uuid::new_v4())
    }

    pub fn with_uuid(uuid: Uuid) -> Self {
        Self {
            base: format!("xmldsig-{uuid}"),
            issued: HashMap::new(),
        }
    }

    /// `xmldsig-<uuid>`, the id of the `Signature` element.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Id for `role`; asking for the same role again appends `-2`, `-3`, ...
    pub fn generate(&mut self, role: &str) -> String {
        let count = self.issued.entry(role.to_string()).or_insert(0);
        *count += 1;
        match *count {
            1 => format!("{}-{role}", self.base),
            n => format!("{}-{role}-{n}", self.base),
        }
    }
}

impl Default for Identifier {
    fn default() -> Self {
        Self::new()
    }
}

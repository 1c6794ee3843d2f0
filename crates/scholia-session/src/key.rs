use sha2::{Digest, Sha256};
use std::fmt;

/// Identifies one logical conversation with the model
///
/// Keys are pure values: deriving a key twice from the same inputs yields the
/// same key, and fingerprints ignore the order metadata was supplied in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConversationKey {
    /// Caller-supplied identifier
    Explicit(String),

    /// Hex SHA-256 of the system instruction and sorted metadata pairs
    Fingerprint(String),

    /// Compound key, e.g. (political_philosophy, Rousseau, The Social Contract)
    Subject {
        domain: String,
        subject: String,
        secondary: String,
    },
}

impl ConversationKey {
    pub fn explicit(id: impl AsRef<str>) -> Self {
        Self::Explicit(id.as_ref().trim().to_string())
    }

    /// Fingerprint of an instruction and its metadata
    pub fn fingerprint<I, K, V>(instruction: &str, metadata: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut pairs: Vec<(String, String)> = metadata
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
            .collect();
        pairs.sort();

        let mut hasher = Sha256::new();
        hasher.update(instruction.as_bytes());
        hasher.update([0x00]);
        for (key, value) in &pairs {
            hasher.update(key.as_bytes());
            hasher.update([0x1f]);
            hasher.update(value.as_bytes());
            hasher.update([0x1e]);
        }

        Self::Fingerprint(hex::encode(hasher.finalize()))
    }

    pub fn subject(
        domain: impl AsRef<str>,
        subject: impl AsRef<str>,
        secondary: impl AsRef<str>,
    ) -> Self {
        Self::Subject {
            domain: domain.as_ref().trim().to_string(),
            subject: subject.as_ref().trim().to_string(),
            secondary: secondary.as_ref().trim().to_string(),
        }
    }

    /// Same domain and subject, different secondary id
    ///
    /// Used to evict a thinker's conversation about one work when the caller
    /// moves on to another work.
    pub fn is_sibling_of(&self, other: &ConversationKey) -> bool {
        match (self, other) {
            (
                Self::Subject {
                    domain,
                    subject,
                    secondary,
                },
                Self::Subject {
                    domain: other_domain,
                    subject: other_subject,
                    secondary: other_secondary,
                },
            ) => domain == other_domain && subject == other_subject && secondary != other_secondary,
            _ => false,
        }
    }

    pub fn domain(&self) -> Option<&str> {
        match self {
            Self::Subject { domain, .. } => Some(domain),
            _ => None,
        }
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(id) => write!(f, "explicit:{}", id),
            Self::Fingerprint(digest) => write!(f, "fp:{}", digest),
            Self::Subject {
                domain,
                subject,
                secondary,
            } => write!(f, "{}:{}::{}", domain, subject, secondary),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_fingerprint_is_deterministic() {
        let a = ConversationKey::fingerprint("classify", [("lang", "en")]);
        let b = ConversationKey::fingerprint("classify", [("lang", "en")]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_ignores_metadata_order() {
        let mut first = HashMap::new();
        first.insert("user", "42");
        first.insert("lang", "en");
        first.insert("source", "web");

        let ordered = [("lang", "en"), ("source", "web"), ("user", "42")];
        let reversed = [("user", "42"), ("source", "web"), ("lang", "en")];

        let expected = ConversationKey::fingerprint("classify", ordered);
        assert_eq!(ConversationKey::fingerprint("classify", reversed), expected);
        assert_eq!(ConversationKey::fingerprint("classify", first), expected);
    }

    #[test]
    fn test_fingerprint_depends_on_inputs() {
        let base = ConversationKey::fingerprint("classify", [("lang", "en")]);
        assert_ne!(base, ConversationKey::fingerprint("summarize", [("lang", "en")]));
        assert_ne!(base, ConversationKey::fingerprint("classify", [("lang", "pt")]));
        assert_ne!(
            base,
            ConversationKey::fingerprint("classify", Vec::<(String, String)>::new())
        );
    }

    #[test]
    fn test_fingerprint_pair_boundaries() {
        let a = ConversationKey::fingerprint("x", [("ab", "c")]);
        let b = ConversationKey::fingerprint("x", [("a", "bc")]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_renders_hex() {
        let key = ConversationKey::fingerprint("classify", [("lang", "en")]);
        let rendered = key.to_string();
        assert!(rendered.starts_with("fp:"));
        assert_eq!(rendered.len(), 3 + 64);
    }

    #[test]
    fn test_subject_siblings() {
        let leviathan = ConversationKey::subject("political_philosophy", "Hobbes", "Leviathan");
        let de_cive = ConversationKey::subject("political_philosophy", "Hobbes", "De Cive");
        let locke = ConversationKey::subject("political_philosophy", "Locke", "Leviathan");
        let kant = ConversationKey::subject("kant", "Hobbes", "De Cive");

        assert!(de_cive.is_sibling_of(&leviathan));
        assert!(!leviathan.is_sibling_of(&leviathan));
        assert!(!locke.is_sibling_of(&leviathan));
        assert!(!kant.is_sibling_of(&de_cive));
        assert!(!ConversationKey::explicit("a").is_sibling_of(&leviathan));
    }

    #[test]
    fn test_subject_trims_and_renders() {
        let key = ConversationKey::subject("kant", " Kant ", "Critique of Pure Reason ");
        assert_eq!(key.to_string(), "kant:Kant::Critique of Pure Reason");
        assert_eq!(key.domain(), Some("kant"));
    }

    #[test]
    fn test_explicit_key() {
        let key = ConversationKey::explicit("  session-1 ");
        assert_eq!(key, ConversationKey::Explicit("session-1".to_string()));
        assert_eq!(key.to_string(), "explicit:session-1");
        assert_eq!(key.domain(), None);
    }
}

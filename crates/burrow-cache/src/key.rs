//! Cache key implementation.

use burrow_proto::{Name, Type};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Cache key: (lowercased name, record type). Class is always IN and is
/// not part of the key.
#[derive(Debug, Clone, Eq)]
pub struct CacheKey {
    name: Name,
    rtype: Type,
}

impl CacheKey {
    /// Creates a new cache key. The name is lowercased so lookups are
    /// case-insensitive regardless of the owner casing a response used.
    pub fn new(name: &Name, rtype: Type) -> Self {
        Self {
            name: name.lowercased(),
            rtype,
        }
    }

    /// Returns the (lowercased) domain name.
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Returns the record type.
    pub fn rtype(&self) -> Type {
        self.rtype
    }
}

impl PartialEq for CacheKey {
    fn eq(&self, other: &Self) -> bool {
        self.rtype == other.rtype && self.name == other.name
    }
}

impl Hash for CacheKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.rtype.to_u16().hash(state);
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.rtype)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_proto::RecordType;
    use std::str::FromStr;

    #[test]
    fn test_cache_key_case_insensitive() {
        let key1 = CacheKey::new(
            &Name::from_str("example.com.").unwrap(),
            Type::Known(RecordType::A),
        );
        let key2 = CacheKey::new(
            &Name::from_str("EXAMPLE.COM.").unwrap(),
            Type::Known(RecordType::A),
        );

        assert_eq!(key1, key2);

        use std::collections::hash_map::DefaultHasher;
        let mut h1 = DefaultHasher::new();
        let mut h2 = DefaultHasher::new();
        key1.hash(&mut h1);
        key2.hash(&mut h2);
        assert_eq!(h1.finish(), h2.finish());
    }

    #[test]
    fn test_cache_key_type_distinguishes() {
        let name = Name::from_str("example.com.").unwrap();
        let a = CacheKey::new(&name, Type::Known(RecordType::A));
        let ns = CacheKey::new(&name, Type::Known(RecordType::NS));

        assert_ne!(a, ns);
    }
}

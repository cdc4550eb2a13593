//! Namespaced store keys.

/// A type-safe store key: a fixed prefix plus a short per-value name.
///
/// Implement this on a key enum to group related persisted values under one
/// namespace without repeating string concatenation at every call site:
///
/// ```
/// use prefkit::PersistKey;
///
/// enum PrefKey {
///     Autoplay,
///     Username,
/// }
///
/// impl PersistKey for PrefKey {
///     fn prefix(&self) -> &str {
///         "user-preference."
///     }
///
///     fn short_key(&self) -> &str {
///         match self {
///             PrefKey::Autoplay => "autoplay",
///             PrefKey::Username => "username",
///         }
///     }
/// }
///
/// assert_eq!(PrefKey::Autoplay.prefixed_key(), "user-preference.autoplay");
/// ```
pub trait PersistKey {
    /// The namespace shared by all keys of this type.
    fn prefix(&self) -> &str;

    /// The per-value name without the prefix.
    fn short_key(&self) -> &str;

    /// The full store key: prefix followed by short key.
    fn prefixed_key(&self) -> String {
        format!("{}{}", self.prefix(), self.short_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    enum Keys {
        Username,
        ProfileImageUrl,
    }

    impl PersistKey for Keys {
        fn prefix(&self) -> &str {
            "account."
        }

        fn short_key(&self) -> &str {
            match self {
                Keys::Username => "username",
                Keys::ProfileImageUrl => "profile-image-url",
            }
        }
    }

    #[test]
    fn test_prefixed_key_concatenates_prefix_and_short_key() {
        assert_eq!(Keys::Username.prefixed_key(), "account.username");
        assert_eq!(
            Keys::ProfileImageUrl.prefixed_key(),
            "account.profile-image-url"
        );
    }
}

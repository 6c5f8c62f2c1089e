//! UUID-backed identifier newtypes.

/// Declares a `Copy` identifier wrapping a [`uuid::Uuid`].
///
/// The generated type serializes as the bare UUID string, displays as the
/// hyphenated UUID and parses from it.
macro_rules! uuid_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Wraps an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the wrapped UUID.
            #[must_use]
            pub const fn into_inner(self) -> uuid::Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl AsRef<uuid::Uuid> for $name {
            fn as_ref(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(value.trim()).map(Self)
            }
        }
    };
}

pub(crate) use uuid_newtype;

#[cfg(test)]
mod tests {
    use crate::{project::domain::ProjectId, task::domain::TaskId};
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    fn parses_its_own_display_form() -> eyre::Result<()> {
        let id = ProjectId::new();

        let parsed = ProjectId::from_str(&format!(" {id} "))?;

        eyre::ensure!(parsed == id);
        Ok(())
    }

    #[rstest]
    #[case("")]
    #[case("not-a-uuid")]
    fn rejects_malformed_values(#[case] raw: &str) {
        assert!(TaskId::from_str(raw).is_err());
    }

    #[rstest]
    fn serializes_as_bare_uuid() -> eyre::Result<()> {
        let id = TaskId::new();

        let json = serde_json::to_string(&id)?;

        eyre::ensure!(json == format!("\"{}\"", id.into_inner()));
        Ok(())
    }
}

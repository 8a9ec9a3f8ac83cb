use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::PipelineError;

/// Namespace assumed when an identifier is written without one.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// A namespaced registry identifier such as `minecraft:stone`.
///
/// Identifiers are serialized as a single `namespace:path` string.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId {
    namespace: String,
    path: String,
}

impl ResourceId {
    /// Creates an identifier from its parts, validating both.
    pub fn new(
        namespace: impl Into<String>,
        path: impl Into<String>,
    ) -> Result<Self, PipelineError> {
        let namespace = namespace.into();
        let path = path.into();
        if !valid_namespace(&namespace) || !valid_path(&path) {
            return Err(PipelineError::InvalidResourceId(format!("{namespace}:{path}")));
        }
        Ok(ResourceId { namespace, path })
    }

    /// Parses `namespace:path`, or a bare `path` in the default namespace.
    pub fn parse(s: &str) -> Result<Self, PipelineError> {
        match s.split_once(':') {
            Some((namespace, path)) => Self::new(namespace, path),
            None => Self::new(DEFAULT_NAMESPACE, s),
        }
    }

    /// Identifier in the default namespace. `path` must already be valid.
    pub(crate) fn vanilla(path: &str) -> Self {
        debug_assert!(valid_path(path));
        ResourceId {
            namespace: DEFAULT_NAMESPACE.to_string(),
            path: path.to_string(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

fn valid_namespace(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '.' | '-'))
}

fn valid_path(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '.' | '-' | '/'))
}

impl FromStr for ResourceId {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceId({})", self)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl Serialize for ResourceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ResourceIdVisitor;

        impl serde::de::Visitor<'_> for ResourceIdVisitor {
            type Value = ResourceId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a namespaced identifier")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                ResourceId::parse(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(ResourceIdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_namespace() {
        let id = ResourceId::parse("structurize:blocksubstitution").unwrap();
        assert_eq!(id.namespace(), "structurize");
        assert_eq!(id.path(), "blocksubstitution");
    }

    #[test]
    fn parse_defaults_namespace() {
        let id: ResourceId = "oak_planks".parse().unwrap();
        assert_eq!(id.namespace(), DEFAULT_NAMESPACE);
        assert_eq!(id.to_string(), "minecraft:oak_planks");
    }

    #[test]
    fn nested_paths_are_valid() {
        assert!(ResourceId::parse("mod:blocks/stairs").is_ok());
    }

    #[test]
    fn rejects_invalid_characters() {
        assert!(matches!(
            ResourceId::parse("Minecraft:Stone"),
            Err(PipelineError::InvalidResourceId(_))
        ));
        assert!(ResourceId::parse(":stone").is_err());
        assert!(ResourceId::parse("minecraft:").is_err());
        assert!(ResourceId::parse("ns/x:stone").is_err());
    }

    #[test]
    fn serializes_as_single_string() {
        let id = ResourceId::parse("minecraft:chest").unwrap();
        let mut bytes = Vec::new();
        ciborium::into_writer(&id, &mut bytes).unwrap();

        let text: String = ciborium::from_reader(bytes.as_slice()).unwrap();
        assert_eq!(text, "minecraft:chest");

        let recovered: ResourceId = ciborium::from_reader(bytes.as_slice()).unwrap();
        assert_eq!(recovered, id);
    }

    #[test]
    fn deserialize_rejects_invalid() {
        let mut bytes = Vec::new();
        ciborium::into_writer(&"Bad Id", &mut bytes).unwrap();
        let result: Result<ResourceId, _> = ciborium::from_reader(bytes.as_slice());
        assert!(result.is_err());
    }
}

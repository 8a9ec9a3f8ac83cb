use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::requirement::Requirement;
use crate::resource::{DEFAULT_NAMESPACE, ResourceId};

/// A block identifier with its ordered state properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockState {
    pub name: ResourceId,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, String>,
}

impl BlockState {
    pub fn new(name: ResourceId) -> Self {
        BlockState {
            name,
            properties: IndexMap::new(),
        }
    }

    /// Parses the block name; see [`ResourceId::parse`].
    pub fn parse(name: &str) -> Result<Self, PipelineError> {
        Ok(Self::new(ResourceId::parse(name)?))
    }

    pub fn air() -> Self {
        Self::new(ResourceId::vanilla("air"))
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// True for every vanilla air variant.
    pub fn is_air(&self) -> bool {
        self.name.namespace() == DEFAULT_NAMESPACE
            && matches!(self.name.path(), "air" | "cave_air" | "void_air")
    }
}

/// Data attached on top of a placed block, such as container contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub kind: ResourceId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contents: Vec<Requirement>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub data: IndexMap<String, String>,
}

impl Attachment {
    pub fn new(kind: ResourceId) -> Self {
        Attachment {
            kind,
            contents: Vec::new(),
            data: IndexMap::new(),
        }
    }

    pub fn with_item(mut self, resource: ResourceId, count: u32) -> Self {
        self.contents.push(Requirement::new(resource, count));
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

/// The composite payload for one position: a base state plus optional attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockStateWithAttachment {
    pub state: BlockState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
}

impl BlockStateWithAttachment {
    pub fn plain(state: BlockState) -> Self {
        BlockStateWithAttachment {
            state,
            attachment: None,
        }
    }

    pub fn with_attachment(state: BlockState, attachment: Attachment) -> Self {
        BlockStateWithAttachment {
            state,
            attachment: Some(attachment),
        }
    }

    pub fn has_attachment(&self) -> bool {
        self.attachment.is_some()
    }
}

impl From<BlockState> for BlockStateWithAttachment {
    fn from(state: BlockState) -> Self {
        Self::plain(state)
    }
}

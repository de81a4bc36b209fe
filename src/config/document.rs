use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::Context as _;
use tracing::{debug, warn};

use crate::assets::source::SourceProvider;
use crate::backend::ExecutionBackend;
use crate::foundation::error::{SeqError, SeqResult};
use crate::pipeline::node::ProcessingNode;
use crate::pipeline::pipeline::Pipeline;
use crate::transforms::registry::TransformRegistry;

/// Serialized form of one processing node.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProcessorConfig {
    /// Registry tag of the transform.
    pub kind: String,
    /// Whether the node is enabled. Defaults to `true`.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Transform parameters; missing fields take their defaults.
    #[serde(default)]
    pub params: serde_json::Value,
}

fn default_enabled() -> bool {
    true
}

impl ProcessorConfig {
    /// Config for a transform kind with default parameters.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            enabled: true,
            params: serde_json::Value::Null,
        }
    }

    /// Builder-style parameters.
    pub fn with_params(mut self, params: serde_json::Value) -> Self {
        self.params = params;
        self
    }

    /// Snapshot a live node.
    pub fn from_node(node: &ProcessingNode) -> SeqResult<Self> {
        Ok(Self {
            kind: node.transform().kind().to_string(),
            enabled: node.is_enabled(),
            params: node.transform().params()?,
        })
    }

    /// Construct the node this config describes.
    pub fn build(&self, registry: &TransformRegistry) -> SeqResult<ProcessingNode> {
        let transform = registry.create(&self.kind, self.params.clone())?;
        Ok(ProcessingNode::new(transform).with_enabled(self.enabled))
    }
}

/// A stored pipeline: input frame ids plus processors, optionally inherited from another document.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SequenceDocument {
    /// Document name, the key other documents inherit through.
    pub name: String,
    /// Source frame ids, in sequence order.
    #[serde(default)]
    pub input_frames: Vec<String>,
    /// Processors, upstream first.
    #[serde(default)]
    pub processors: Vec<ProcessorConfig>,
    /// Name of the document whose processors replace this one's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherit_from: Option<String>,
}

impl SequenceDocument {
    /// Parse a document from JSON.
    pub fn from_json_str(s: &str) -> SeqResult<Self> {
        let doc: Self = serde_json::from_str(s)?;
        if doc.name.is_empty() {
            return Err(SeqError::validation("document name must be non-empty"));
        }
        Ok(doc)
    }

    /// Read and parse a JSON document file.
    pub fn load(path: &Path) -> SeqResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read document '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Pretty-printed JSON.
    pub fn to_json_string(&self) -> SeqResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Snapshot the processors of a live pipeline.
    pub fn capture_processors(&mut self, pipeline: &Pipeline) -> SeqResult<()> {
        self.processors = pipeline.to_processor_configs()?;
        Ok(())
    }
}

/// Processors selected for a document after following inheritance.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedProcessors {
    /// The processors to build.
    pub processors: Vec<ProcessorConfig>,
    /// Document the processors were taken from.
    pub source_document: String,
    /// Set when a cycle or a missing parent made resolution fall back to the document's own list.
    pub inheritance_ignored: bool,
}

/// Named documents, resolved together so inheritance can cross files.
#[derive(Clone, Debug, Default)]
pub struct DocumentSet {
    docs: BTreeMap<String, SequenceDocument>,
}

impl DocumentSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document, replacing any with the same name.
    pub fn insert(&mut self, doc: SequenceDocument) {
        self.docs.insert(doc.name.clone(), doc);
    }

    /// Builder-style [`DocumentSet::insert`].
    pub fn with(mut self, doc: SequenceDocument) -> Self {
        self.insert(doc);
        self
    }

    /// Document named `name`.
    pub fn get(&self, name: &str) -> Option<&SequenceDocument> {
        self.docs.get(name)
    }

    /// Document names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.docs.keys().map(String::as_str)
    }

    /// Load every `*.json` document in `dir`. The first unreadable document fails the load.
    pub fn load_dir(dir: &Path) -> SeqResult<Self> {
        let mut set = Self::new();
        for path in json_paths(dir)? {
            set.insert(SequenceDocument::load(&path)?);
        }
        debug!(dir = %dir.display(), documents = set.docs.len(), "loaded documents");
        Ok(set)
    }

    /// Load every parseable `*.json` document in `dir`, skipping the others with a warning.
    pub fn scan_dir(dir: &Path) -> SeqResult<Self> {
        let mut set = Self::new();
        for path in json_paths(dir)? {
            match SequenceDocument::load(&path) {
                Ok(doc) => set.insert(doc),
                Err(e) => warn!(path = %path.display(), error = %e, "document skipped"),
            }
        }
        debug!(dir = %dir.display(), documents = set.docs.len(), "scanned documents");
        Ok(set)
    }

    /// Follow `inherit_from` links starting at `name`.
    ///
    /// A cycle or a missing parent logs a warning and falls back to the starting document's own
    /// processors.
    pub fn resolve(&self, name: &str) -> SeqResult<ResolvedProcessors> {
        let start = self
            .get(name)
            .ok_or_else(|| SeqError::validation(format!("unknown document '{name}'")))?;
        let fallback = || ResolvedProcessors {
            processors: start.processors.clone(),
            source_document: start.name.clone(),
            inheritance_ignored: true,
        };

        let mut visited = BTreeSet::new();
        let mut current = start;
        loop {
            if !visited.insert(current.name.as_str()) {
                warn!(document = name, at = %current.name, "cyclic inheritance ignored");
                return Ok(fallback());
            }
            let Some(parent) = current.inherit_from.as_deref() else {
                return Ok(ResolvedProcessors {
                    processors: current.processors.clone(),
                    source_document: current.name.clone(),
                    inheritance_ignored: false,
                });
            };
            match self.get(parent) {
                Some(doc) => current = doc,
                None => {
                    warn!(document = name, parent, "inherited document not found; ignored");
                    return Ok(fallback());
                }
            }
        }
    }
}

fn json_paths(dir: &Path) -> SeqResult<Vec<std::path::PathBuf>> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read dir '{}'", dir.display()))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("read dir '{}'", dir.display()))?
            .path();
        if path.extension().is_some_and(|e| e == "json") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

impl Pipeline {
    /// Build a pipeline for document `name` of `docs`.
    ///
    /// Input frames come from the named document, processors from its resolved inheritance.
    pub fn from_document(
        docs: &DocumentSet,
        name: &str,
        registry: &TransformRegistry,
        backend: Box<dyn ExecutionBackend>,
        sources: Box<dyn SourceProvider>,
    ) -> SeqResult<Self> {
        let doc = docs
            .get(name)
            .ok_or_else(|| SeqError::validation(format!("unknown document '{name}'")))?;
        let resolved = docs.resolve(name)?;

        let mut pipeline = Self::new(backend, sources);
        for config in &resolved.processors {
            pipeline.add_node(config.build(registry)?)?;
        }
        pipeline.set_input_frames(doc.input_frames.iter().cloned())?;
        Ok(pipeline)
    }

    /// Serialize the node list, upstream first.
    pub fn to_processor_configs(&self) -> SeqResult<Vec<ProcessorConfig>> {
        self.nodes().iter().map(ProcessorConfig::from_node).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/document.rs"]
mod tests;

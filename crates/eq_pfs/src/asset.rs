//! Capability contract for entry sub-formats.
//!
//! Entry payloads (`.mod`, `.wld`, `.zon`, textures, ...) are decoded by handlers supplied
//! from outside this crate. A handler is registered per file extension; decoded assets
//! expose an explicit [`Asset::describe`] tree instead of being walked through runtime
//! reflection. The registry dispatches by the entry name's extension and registers nothing
//! by default.

use indexmap::IndexMap;
use std::ffi::OsStr;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};

/// A labeled node in an asset's display tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNode {
    label: String,
    value: Option<String>,
    children: Vec<FieldNode>,
}

impl FieldNode {
    /// A leaf field with a rendered value.
    pub fn leaf(label: impl Into<String>, value: impl Into<String>) -> FieldNode {
        FieldNode {
            label: label.into(),
            value: Some(value.into()),
            children: Vec::new(),
        }
    }

    /// A grouping node holding nested fields.
    pub fn branch(label: impl Into<String>, children: Vec<FieldNode>) -> FieldNode {
        FieldNode {
            label: label.into(),
            value: None,
            children,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn children(&self) -> &[FieldNode] {
        &self.children
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match &self.value {
            Some(value) => writeln!(f, "{indent}{}: {value}", self.label)?,
            None => writeln!(f, "{indent}{}", self.label)?,
        }
        for child in &self.children {
            child.render(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for FieldNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 0)
    }
}

/// A decoded entry payload.
pub trait Asset {
    /// Short tag naming the sub-format, e.g. `"txt"` or `"mod"`.
    fn kind(&self) -> &str;

    /// Labeled field tree for on-screen display.
    fn describe(&self) -> FieldNode;
}

/// Decodes and encodes one sub-format.
pub trait AssetHandler {
    fn decode(&self, name: &str, data: &[u8]) -> Result<Box<dyn Asset>>;
    fn encode(&self, asset: &dyn Asset) -> Result<Vec<u8>>;
}

/// Maps file extensions to their sub-format handlers.
///
/// Extensions are matched case-insensitively and stored without a leading dot.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: IndexMap<Box<str>, Arc<dyn AssetHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> HandlerRegistry {
        HandlerRegistry::default()
    }

    /// Register a handler for an extension, replacing any previous registration.
    pub fn register(&mut self, extension: &str, handler: Arc<dyn AssetHandler>) {
        let key = extension.trim_start_matches('.').to_ascii_lowercase();
        self.handlers.insert(key.into(), handler);
    }

    /// Look up the handler for an extension, if one is registered.
    pub fn by_extension(&self, extension: &str) -> Option<&Arc<dyn AssetHandler>> {
        let key = extension.trim_start_matches('.').to_ascii_lowercase();
        self.handlers.get(key.as_str())
    }

    /// Extensions with a registered handler, in registration order.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(|k| k.as_ref())
    }

    /// Decode an entry's payload through the handler registered for its extension.
    pub fn decode_entry(&self, name: &str, data: &[u8]) -> Result<Box<dyn Asset>> {
        let extension = Path::new(name)
            .extension()
            .and_then(OsStr::to_str)
            .unwrap_or_default();

        let handler = self
            .by_extension(extension)
            .ok_or_else(|| Error::UnsupportedExtension(extension.to_owned()))?;

        handler.decode(name, data)
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("extensions", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    use super::{Asset, AssetHandler, FieldNode, HandlerRegistry};
    use crate::error::{Error, Result};

    struct TextAsset {
        name: String,
        text: String,
    }

    impl Asset for TextAsset {
        fn kind(&self) -> &str {
            "txt"
        }

        fn describe(&self) -> FieldNode {
            FieldNode::branch(
                self.name.clone(),
                vec![
                    FieldNode::leaf("length", self.text.len().to_string()),
                    FieldNode::leaf("text", self.text.clone()),
                ],
            )
        }
    }

    struct TextHandler;

    impl AssetHandler for TextHandler {
        fn decode(&self, name: &str, data: &[u8]) -> Result<Box<dyn Asset>> {
            let text = String::from_utf8(data.to_vec())
                .map_err(|e| Error::CustomError(e.to_string()))?;
            Ok(Box::new(TextAsset {
                name: name.to_owned(),
                text,
            }))
        }

        fn encode(&self, asset: &dyn Asset) -> Result<Vec<u8>> {
            let described = asset.describe();
            let text = described
                .children()
                .iter()
                .find(|c| c.label() == "text")
                .and_then(|c| c.value())
                .ok_or_else(|| Error::CustomError("asset has no text field".into()))?;
            Ok(text.as_bytes().to_vec())
        }
    }

    fn registry() -> HandlerRegistry {
        let mut registry = HandlerRegistry::new();
        registry.register(".txt", Arc::new(TextHandler));
        registry
    }

    #[test]
    fn dispatches_by_extension_ignoring_case() -> Result<()> {
        let registry = registry();

        let asset = registry.decode_entry("Readme.TXT", b"Hello World")?;
        assert_eq!(asset.kind(), "txt");

        Ok(())
    }

    #[test]
    fn unregistered_extension_is_rejected() {
        let registry = registry();

        assert!(matches!(
            registry.decode_entry("ant.mod", &[1, 2, 3]),
            Err(Error::UnsupportedExtension(_))
        ));
    }

    #[test]
    fn decode_then_encode_round_trips() -> Result<()> {
        let registry = registry();

        let asset = registry.decode_entry("readme.txt", b"Hello World")?;
        let handler = registry.by_extension("txt").unwrap();
        assert_eq!(handler.encode(asset.as_ref())?, b"Hello World");

        Ok(())
    }

    #[test]
    fn describe_renders_an_indented_tree() -> Result<()> {
        let registry = registry();

        let asset = registry.decode_entry("readme.txt", b"hi")?;
        assert_eq!(
            asset.describe().to_string(),
            "readme.txt\n  length: 2\n  text: hi\n"
        );

        Ok(())
    }
}

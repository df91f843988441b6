use clap::Args;
use eq_pfs::error::Error;
use eq_pfs::{Asset, AssetHandler, FieldNode, HandlerRegistry};
use itertools::Itertools;
use miette::Result;
use std::{path::PathBuf, sync::Arc};

use super::open_table;

#[derive(Args)]
pub struct ShowArgs {
    /// An input PFS file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Entry name to show
    #[arg(short, long, value_name = "NAME")]
    name: String,
}

impl ShowArgs {
    pub fn handle(&self) -> Result<()> {
        let table = open_table(&self.file)?;
        let data = table.get(&self.name)?;

        match builtin_registry().decode_entry(&self.name, data) {
            Ok(asset) => print!("{}", asset.describe()),
            Err(Error::UnsupportedExtension(_)) => print!("{}", raw_summary(&self.name, data)),
            Err(e) => return Err(e.into()),
        }

        Ok(())
    }
}

/// Handlers shipped with the tool; real sub-format handlers plug in the same way.
fn builtin_registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    registry.register("txt", Arc::new(TextHandler));
    registry
}

/// Fallback view for entries without a registered handler.
fn raw_summary(name: &str, data: &[u8]) -> FieldNode {
    let preview = data.iter().take(16).map(|b| format!("{b:02X}")).join(" ");

    FieldNode::branch(
        name.to_owned(),
        vec![
            FieldNode::leaf("size", data.len().to_string()),
            FieldNode::leaf("preview", preview),
        ],
    )
}

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
                FieldNode::leaf("lines", self.text.lines().count().to_string()),
                FieldNode::leaf("text", self.text.clone()),
            ],
        )
    }
}

struct TextHandler;

impl AssetHandler for TextHandler {
    fn decode(&self, name: &str, data: &[u8]) -> eq_pfs::error::Result<Box<dyn Asset>> {
        let text = String::from_utf8(data.to_vec())
            .map_err(|e| Error::CustomError(format!("{} is not valid utf-8: {e}", name)))?;

        Ok(Box::new(TextAsset {
            name: name.to_owned(),
            text,
        }))
    }

    fn encode(&self, asset: &dyn Asset) -> eq_pfs::error::Result<Vec<u8>> {
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

#[cfg(test)]
mod test {
    use super::{builtin_registry, raw_summary};

    #[test]
    fn text_entries_decode_through_the_registry() {
        let asset = builtin_registry()
            .decode_entry("readme.txt", b"line one\nline two")
            .unwrap();

        let described = asset.describe();
        assert_eq!(described.label(), "readme.txt");
        assert_eq!(
            described.children().first().and_then(|c| c.value()),
            Some("2")
        );
    }

    #[test]
    fn unknown_extensions_fall_back_to_a_raw_summary() {
        let summary = raw_summary("ant.mod", &[0xDE, 0xAD]);
        assert_eq!(
            summary.children().last().and_then(|c| c.value()),
            Some("DE AD")
        );
    }
}

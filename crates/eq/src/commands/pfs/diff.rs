use clap::{Args, ValueEnum};
use eq_pfs::PfsTable;
use itertools::Itertools;
use miette::Result;
use owo_colors::OwoColorize;
use similar::{ChangeTag, TextDiff};
use std::{collections::HashSet, fmt::Display, path::PathBuf};

use super::open_table;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Report added, removed and changed entries
    #[default]
    Entries,
    /// Also show inline diffs for text entries
    Full,
}

#[derive(Debug, Eq, PartialEq, PartialOrd, Ord)]
enum Change {
    Added(String),
    Removed(String),
    Modified {
        name: String,
        old_size: usize,
        new_size: usize,
        context: Vec<String>,
    },
}

impl Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Change::Added(name) => writeln!(f, "✅ {}", name.green()),
            Change::Removed(name) => writeln!(f, "❌ {}", name.red()),
            Change::Modified {
                name,
                old_size,
                new_size,
                context,
            } => {
                writeln!(f, "🔃 {}", name.blue())?;
                writeln!(
                    f,
                    "  * size: {} vs {}",
                    old_size.to_string().red(),
                    new_size.to_string().green()
                )?;
                for line in context {
                    writeln!(f, "  {}", line)?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Args)]
pub struct DiffArgs {
    /// An input PFS file
    #[arg(short, long, value_name = "FILE")]
    left: PathBuf,

    /// An input PFS file
    #[arg(short, long, value_name = "FILE")]
    right: PathBuf,

    /// Comparison mode
    #[arg(short, long, value_enum, default_value_t=Mode::Entries)]
    mode: Mode,
}

impl DiffArgs {
    fn text_context(&self, left: &[u8], right: &[u8]) -> Vec<String> {
        if self.mode != Mode::Full {
            return Vec::new();
        }
        let (Ok(old), Ok(new)) = (std::str::from_utf8(left), std::str::from_utf8(right)) else {
            return Vec::new();
        };

        let diff = TextDiff::from_lines(old, new);
        let mut context = Vec::new();
        for op in diff.ops().iter() {
            for change in diff.iter_inline_changes(op) {
                let mut line = String::new();
                for (emphasized, value) in change.iter_strings_lossy() {
                    if emphasized {
                        if change.tag() == ChangeTag::Insert {
                            line.push_str(&format!("{}", value.green().underline()));
                        } else {
                            line.push_str(&format!("{}", value.red().underline()));
                        }
                    } else {
                        line.push_str(&format!("{}", value.dimmed()));
                    }
                }
                context.push(line.trim_end().to_owned());
            }
        }
        context
    }

    fn handle_tables(&self, left: &PfsTable, right: &PfsTable) -> Result<Vec<Change>> {
        let left_names: HashSet<&str> = left.files().map(|e| e.name()).collect();
        let right_names: HashSet<&str> = right.files().map(|e| e.name()).collect();

        let mut changes = Vec::new();

        right_names
            .difference(&left_names)
            .map(|name| Change::Added(name.to_string()))
            .for_each(|c| changes.push(c));

        left_names
            .difference(&right_names)
            .map(|name| Change::Removed(name.to_string()))
            .for_each(|c| changes.push(c));

        for name in left_names.intersection(&right_names).sorted() {
            let old = left.get(name)?;
            let new = right.get(name)?;
            if old == new {
                continue;
            }

            changes.push(Change::Modified {
                name: name.to_string(),
                old_size: old.len(),
                new_size: new.len(),
                context: self.text_context(old, new),
            });
        }

        changes.sort();
        Ok(changes)
    }

    pub fn handle(&self) -> Result<()> {
        let left = open_table(&self.left)?;
        let right = open_table(&self.right)?;

        for change in self.handle_tables(&left, &right)? {
            print!("{}", change);
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{Change, DiffArgs, Mode};
    use eq_pfs::PfsTable;
    use miette::Result;

    fn args(mode: Mode) -> DiffArgs {
        DiffArgs {
            left: "left.eqg".into(),
            right: "right.eqg".into(),
            mode,
        }
    }

    fn table(files: &[(&str, &[u8])]) -> Result<PfsTable> {
        let mut table = PfsTable::new();
        for (name, data) in files {
            table.set(name, data.to_vec())?;
        }
        Ok(table)
    }

    #[test]
    fn reports_added_removed_and_modified_entries() -> Result<()> {
        let left = table(&[("a.mod", &[1]), ("b.txt", b"one")])?;
        let right = table(&[("b.txt", b"two"), ("c.wld", &[3])])?;

        let changes = args(Mode::Entries).handle_tables(&left, &right)?;

        assert_eq!(changes.len(), 3);
        assert!(changes.contains(&Change::Added("c.wld".into())));
        assert!(changes.contains(&Change::Removed("a.mod".into())));
        assert!(matches!(
            changes.iter().find(|c| matches!(c, Change::Modified { .. })),
            Some(Change::Modified {
                old_size: 3,
                new_size: 3,
                ..
            })
        ));

        Ok(())
    }

    #[test]
    fn identical_tables_produce_no_changes() -> Result<()> {
        let left = table(&[("a.mod", &[1])])?;
        let right = table(&[("a.mod", &[1])])?;

        assert!(args(Mode::Entries).handle_tables(&left, &right)?.is_empty());

        Ok(())
    }

    #[test]
    fn full_mode_adds_text_context() -> Result<()> {
        let left = table(&[("b.txt", b"one\n")])?;
        let right = table(&[("b.txt", b"two\n")])?;

        let changes = args(Mode::Full).handle_tables(&left, &right)?;

        assert!(matches!(
            changes.first(),
            Some(Change::Modified { context, .. }) if !context.is_empty()
        ));

        Ok(())
    }
}

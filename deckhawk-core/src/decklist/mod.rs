use crate::deck::{BuiltinCategory, DeckState};
use crate::source::CardSource;
use lazy_static::lazy_static;
use log::debug;
use regex::{Match, Regex};

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DecklistEntry {
    pub quantity: u32,
    pub name: String,
    pub set: Option<String>,
}

impl DecklistEntry {
    pub fn new(quantity: u32, name: &str, set: Option<&str>) -> DecklistEntry {
        DecklistEntry {
            quantity,
            name: name.to_string(),
            set: set.map(String::from),
        }
    }

    pub fn from_name(n: &str) -> DecklistEntry {
        DecklistEntry {
            quantity: 1,
            name: n.to_string(),
            set: None,
        }
    }

    pub fn from_quantity_name(q: u32, n: &str) -> DecklistEntry {
        DecklistEntry {
            quantity: q,
            name: n.to_string(),
            set: None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParsedDecklistLine<'a> {
    line: &'a str,
    entry: Option<DecklistEntry>,
}

impl ParsedDecklistLine<'_> {
    pub fn line(&self) -> &str {
        self.line
    }

    pub fn as_entry(&self) -> Option<DecklistEntry> {
        self.entry.clone()
    }
}

fn parse_quantity(group: Option<Match>) -> Option<u32> {
    group.and_then(|m| m.as_str().parse().ok())
}

/// Parses one decklist line: optional leading `N` / `Nx` or trailing `x N`
/// quantity (default 1), card name, optional trailing `(SET)` code of 3-4
/// alphanumerics. Section words and blank lines yield no entry.
pub fn parse_line(line: &str) -> Option<DecklistEntry> {
    lazy_static! {
        static ref LINE_RE: Regex = Regex::new(
            r"^\s*(?:(\d+)\s*[xX]?\s+)?(.+?)(?:\s+[xX]\s*(\d+))?(?:\s*\(([0-9A-Za-z]{3,4})\))?\s*$"
        )
        .unwrap();
    }

    let captures = LINE_RE.captures(line)?;
    let leading = parse_quantity(captures.get(1));
    let name = captures.get(2)?.as_str().trim().to_string();
    let trailing = parse_quantity(captures.get(3));
    let set = captures.get(4).map(|m| m.as_str().to_lowercase());

    if name.is_empty() {
        return None;
    }
    let name_lowercase = name.to_lowercase();
    let non_entries = ["deck", "decklist", "sideboard"];
    if non_entries.iter().any(|s| **s == name_lowercase) {
        return None;
    }

    // A leading quantity wins if the line somehow carries both.
    let quantity = leading.or(trailing).unwrap_or(1);
    debug!(
        "Parsed decklist line '{}' -> {}x '{}', set: {:?}",
        line.trim(),
        quantity,
        name,
        set
    );
    Some(DecklistEntry {
        quantity,
        name,
        set,
    })
}

pub fn parse_decklist(decklist: &str) -> Vec<ParsedDecklistLine<'_>> {
    decklist
        .lines()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| ParsedDecklistLine {
            line: s,
            entry: parse_line(s),
        })
        .collect()
}

/// One successfully imported line.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedEntry {
    pub name: String,
    pub quantity: u32,
    pub set: Option<String>,
    pub category: String,
    pub entry_id: String,
}

/// One line that failed to resolve, with a human-readable reason.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedImport {
    pub line: String,
    pub name: String,
    pub quantity: u32,
    pub set: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub imported: Vec<ImportedEntry>,
    pub failed: Vec<FailedImport>,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total_imported_cards(&self) -> u32 {
        self.imported.iter().map(|e| e.quantity).sum()
    }
}

/// Imports a pasted decklist into the deck.
///
/// Lines resolve sequentially through the card source by exact name
/// (constrained by set code when one was given). Each line is independent:
/// a failed resolution is recorded and the remaining lines continue. Cards
/// are added one copy at a time so repeated names merge exactly like
/// interactive adds; the category comes from type-line derivation.
pub async fn import_decklist<S: CardSource>(
    deck: &mut DeckState,
    decklist: &str,
    source: &S,
) -> ImportReport {
    let mut report = ImportReport::default();

    for parsed in parse_decklist(decklist) {
        let Some(entry) = parsed.as_entry() else {
            continue;
        };

        match source
            .find_by_name(&entry.name, entry.set.as_deref())
            .await
        {
            Ok(Some(card)) => {
                let category = BuiltinCategory::derive_from_type_line(&card.type_line)
                    .key()
                    .to_string();
                let mut entry_id = None;
                for _ in 0..entry.quantity.max(1) {
                    entry_id = deck.add_card(card.clone(), None);
                }
                match entry_id {
                    Some(entry_id) => report.imported.push(ImportedEntry {
                        name: card.name.clone(),
                        quantity: entry.quantity,
                        set: entry.set.clone(),
                        category,
                        entry_id,
                    }),
                    None => report.failed.push(failed(&parsed, &entry, "deck rejected the card")),
                }
            }
            Ok(None) => {
                let reason = match &entry.set {
                    Some(set) => format!("not found in set {}", set.to_uppercase()),
                    None => "not found".to_string(),
                };
                report.failed.push(failed(&parsed, &entry, &reason));
            }
            Err(e) => {
                report.failed.push(failed(&parsed, &entry, &e.to_string()));
            }
        }
    }

    report
}

fn failed(parsed: &ParsedDecklistLine<'_>, entry: &DecklistEntry, reason: &str) -> FailedImport {
    FailedImport {
        line: parsed.line().to_string(),
        name: entry.name.clone(),
        quantity: entry.quantity,
        set: entry.set.clone(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_only() {
        assert_eq!(
            parse_line("Lightning Bolt").unwrap(),
            DecklistEntry::from_name("Lightning Bolt")
        );
    }

    #[test]
    fn leading_quantity() {
        assert_eq!(
            parse_line("4 Lightning Bolt").unwrap(),
            DecklistEntry::from_quantity_name(4, "Lightning Bolt")
        );
    }

    #[test]
    fn leading_quantity_with_x() {
        assert_eq!(
            parse_line("2x Counterspell").unwrap(),
            DecklistEntry::from_quantity_name(2, "Counterspell")
        );
        assert_eq!(
            parse_line("2 x Counterspell").unwrap(),
            DecklistEntry::from_quantity_name(2, "Counterspell")
        );
    }

    #[test]
    fn trailing_quantity() {
        assert_eq!(
            parse_line("Forest x3").unwrap(),
            DecklistEntry::from_quantity_name(3, "Forest")
        );
        assert_eq!(
            parse_line("Forest x 3").unwrap(),
            DecklistEntry::from_quantity_name(3, "Forest")
        );
    }

    #[test]
    fn trailing_set_code() {
        assert_eq!(
            parse_line("1 Shatter (MRD)").unwrap(),
            DecklistEntry::new(1, "Shatter", Some("mrd"))
        );
        assert_eq!(
            parse_line("Counterspell (ICE)").unwrap(),
            DecklistEntry::new(1, "Counterspell", Some("ice"))
        );
        assert_eq!(
            parse_line("4 Thoughtseize (PLST)").unwrap(),
            DecklistEntry::new(4, "Thoughtseize", Some("plst"))
        );
    }

    #[test]
    fn split_card_name_survives() {
        assert_eq!(
            parse_line("2 Cut // Ribbons (AKH)").unwrap(),
            DecklistEntry::new(2, "Cut // Ribbons", Some("akh"))
        );
    }

    #[test]
    fn section_words_are_skipped() {
        assert!(parse_line("Deck").is_none());
        assert!(parse_line("Sideboard").is_none());
        assert!(parse_line("SIDEBOARD").is_none());
    }

    #[test]
    fn parse_decklist_keeps_raw_lines() {
        let decklist = "Deck\n4 Lightning Bolt\n\n2x Counterspell\nForest x3";
        let parsed = parse_decklist(decklist);
        let expected = vec![
            ParsedDecklistLine {
                line: "Deck",
                entry: None,
            },
            ParsedDecklistLine {
                line: "4 Lightning Bolt",
                entry: Some(DecklistEntry::from_quantity_name(4, "Lightning Bolt")),
            },
            ParsedDecklistLine {
                line: "2x Counterspell",
                entry: Some(DecklistEntry::from_quantity_name(2, "Counterspell")),
            },
            ParsedDecklistLine {
                line: "Forest x3",
                entry: Some(DecklistEntry::from_quantity_name(3, "Forest")),
            },
        ];
        assert_eq!(parsed, expected);
    }
}

use crate::deck::{BuiltinCategory, ColumnLayout, DeckBucket, DeckEntry, DeckState};

/// How exported lines are grouped into sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportGrouping {
    /// One flat list in category order.
    #[default]
    Flat,
    /// A section per deck column.
    ByCategory,
    /// A section per derived card type (creatures, artifacts, ...).
    ByCardType,
    /// Mainboard / Sideboard / Extra sections from the column options.
    ByBucket,
}

/// Configuration for the text export. Output is deterministic for a given
/// deck, layout and options.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub include_quantity: bool,
    /// Render only the front face of split/double-faced names.
    pub front_face_only: bool,
    pub include_set_code: bool,
    pub include_collector_number: bool,
    /// Appends the static foil marker `*F*`.
    pub foil_marker: bool,
    /// Appends the entry's category key in brackets.
    pub include_category: bool,
    /// Appends the static color-tag marker `#!none`.
    pub color_tag: bool,
    pub grouping: ExportGrouping,
    /// Include categories whose column option places them outside the main
    /// deck (sideboard, extra).
    pub include_out_of_deck: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            include_quantity: true,
            front_face_only: false,
            include_set_code: true,
            include_collector_number: false,
            foil_marker: false,
            include_category: false,
            color_tag: false,
            grouping: ExportGrouping::Flat,
            include_out_of_deck: true,
        }
    }
}

/// Renders the deck as line-oriented text, one line per entry.
pub fn export_decklist(deck: &DeckState, layout: &ColumnLayout, options: &ExportOptions) -> String {
    let keys: Vec<String> = layout
        .ordered_keys()
        .into_iter()
        .filter(|key| {
            options.include_out_of_deck
                || layout.option_of(key).bucket() == DeckBucket::Mainboard
        })
        .collect();

    match options.grouping {
        ExportGrouping::Flat => {
            let lines: Vec<String> = keys
                .iter()
                .flat_map(|key| deck.entries(key))
                .map(|entry| render_line(entry, options))
                .collect();
            lines.join("\n")
        }
        ExportGrouping::ByCategory => {
            let sections = keys.iter().map(|key| {
                let lines: Vec<String> = deck
                    .entries(key)
                    .iter()
                    .map(|entry| render_line(entry, options))
                    .collect();
                (layout.label_of(key), lines)
            });
            join_sections(sections)
        }
        ExportGrouping::ByCardType => {
            let sections = BuiltinCategory::ALL
                .iter()
                .filter(|b| **b != BuiltinCategory::Sideboard)
                .map(|bucket| {
                    let lines: Vec<String> = keys
                        .iter()
                        .flat_map(|key| deck.entries(key))
                        .filter(|entry| {
                            BuiltinCategory::derive_from_type_line(&entry.card.type_line) == *bucket
                        })
                        .map(|entry| render_line(entry, options))
                        .collect();
                    (bucket.display_name().to_string(), lines)
                });
            join_sections(sections)
        }
        ExportGrouping::ByBucket => {
            let sections = [DeckBucket::Mainboard, DeckBucket::Sideboard, DeckBucket::Extra]
                .iter()
                .map(|bucket| {
                    let lines: Vec<String> = keys
                        .iter()
                        .filter(|key| layout.option_of(key).bucket() == *bucket)
                        .flat_map(|key| deck.entries(key))
                        .map(|entry| render_line(entry, options))
                        .collect();
                    (bucket.display_name().to_string(), lines)
                });
            join_sections(sections)
        }
    }
}

fn join_sections(sections: impl Iterator<Item = (String, Vec<String>)>) -> String {
    let rendered: Vec<String> = sections
        .filter(|(_, lines)| !lines.is_empty())
        .map(|(title, lines)| format!("// {}\n{}", title, lines.join("\n")))
        .collect();
    rendered.join("\n\n")
}

fn render_line(entry: &DeckEntry, options: &ExportOptions) -> String {
    let mut parts: Vec<String> = Vec::new();

    if options.include_quantity {
        parts.push(entry.quantity.to_string());
    }
    let name = if options.front_face_only {
        entry.card.front_face_name()
    } else {
        &entry.card.name
    };
    parts.push(name.to_string());
    if options.include_set_code && !entry.card.set.is_empty() {
        parts.push(format!("({})", entry.card.set.to_uppercase()));
    }
    if options.include_collector_number && !entry.card.collector_number.is_empty() {
        parts.push(entry.card.collector_number.clone());
    }
    if options.foil_marker {
        parts.push("*F*".to_string());
    }
    if options.include_category {
        parts.push(format!("[{}]", entry.category));
    }
    if options.color_tag {
        parts.push("#!none".to_string());
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::ColumnOption;
    use crate::scryfall::CardReference;

    fn card(id: &str, name: &str, type_line: &str, set: &str) -> CardReference {
        CardReference {
            id: id.to_string(),
            name: name.to_string(),
            mana_cost: None,
            type_line: type_line.to_string(),
            set: set.to_string(),
            collector_number: "42".to_string(),
            rarity: "common".to_string(),
            image_url: None,
            image_url_back: None,
            price_usd: None,
        }
    }

    fn sample_deck() -> (DeckState, ColumnLayout) {
        let mut deck = DeckState::new();
        let layout = ColumnLayout::default();
        let id = deck
            .add_card(card("bears", "Grizzly Bears", "Creature — Bear", "lea"), None)
            .unwrap();
        deck.set_quantity(&id, "creatures", 4);
        let id = deck
            .add_card(card("bolt", "Lightning Bolt", "Instant", "leb"), None)
            .unwrap();
        deck.set_quantity(&id, "spells", 2);
        deck.add_card(card("duress", "Duress", "Sorcery", "usg"), Some("sideboard"));
        (deck, layout)
    }

    #[test]
    fn flat_export_with_defaults() {
        let (deck, layout) = sample_deck();
        let text = export_decklist(&deck, &layout, &ExportOptions::default());
        assert_eq!(
            text,
            "4 Grizzly Bears (LEA)\n2 Lightning Bolt (LEB)\n1 Duress (USG)"
        );
    }

    #[test]
    fn export_is_deterministic() {
        let (deck, layout) = sample_deck();
        let options = ExportOptions::default();
        assert_eq!(
            export_decklist(&deck, &layout, &options),
            export_decklist(&deck, &layout, &options)
        );
    }

    #[test]
    fn excluding_out_of_deck_drops_sideboard() {
        let (deck, layout) = sample_deck();
        let options = ExportOptions {
            include_out_of_deck: false,
            ..Default::default()
        };
        let text = export_decklist(&deck, &layout, &options);
        assert!(!text.contains("Duress"));
        assert!(text.contains("Grizzly Bears"));
    }

    #[test]
    fn grouped_by_category_uses_labels() {
        let (deck, mut layout) = sample_deck();
        layout.rename_column("creatures", "Beaters");
        let options = ExportOptions {
            grouping: ExportGrouping::ByCategory,
            ..Default::default()
        };
        let text = export_decklist(&deck, &layout, &options);
        assert!(text.starts_with("// Beaters\n4 Grizzly Bears (LEA)"));
        assert!(text.contains("// Sideboard\n1 Duress (USG)"));
        // Empty columns render no section
        assert!(!text.contains("// Artifacts"));
    }

    #[test]
    fn grouped_by_bucket_respects_column_options() {
        let (mut deck, mut layout) = sample_deck();
        let extra = layout.add_column("Companions");
        layout.set_column_option(&extra, ColumnOption::StartsInExtra);
        deck.ensure_category(&extra);
        deck.add_card(
            card("yorion", "Yorion, Sky Nomad", "Legendary Creature — Bird Serpent", "iko"),
            Some(&extra),
        );

        let options = ExportOptions {
            grouping: ExportGrouping::ByBucket,
            ..Default::default()
        };
        let text = export_decklist(&deck, &layout, &options);
        let mainboard = text.find("// Mainboard").unwrap();
        let sideboard = text.find("// Sideboard").unwrap();
        let extra_section = text.find("// Extra").unwrap();
        assert!(mainboard < sideboard && sideboard < extra_section);
        assert!(text.contains("1 Yorion, Sky Nomad (IKO)"));
    }

    #[test]
    fn all_line_options_render() {
        let mut deck = DeckState::new();
        let layout = ColumnLayout::default();
        deck.add_card(
            card("delver", "Delver of Secrets // Insectile Aberration", "Creature — Human Wizard", "isd"),
            None,
        );
        let options = ExportOptions {
            include_quantity: true,
            front_face_only: true,
            include_set_code: true,
            include_collector_number: true,
            foil_marker: true,
            include_category: true,
            color_tag: true,
            grouping: ExportGrouping::Flat,
            include_out_of_deck: true,
        };
        let text = export_decklist(&deck, &layout, &options);
        assert_eq!(
            text,
            "1 Delver of Secrets (ISD) 42 *F* [creatures] #!none"
        );
    }
}

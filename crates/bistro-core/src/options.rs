//! # Product Customization
//!
//! Interprets a product's option schema into a concrete selection set and a
//! computed final price.
//!
//! ## User Workflow Context
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Product Customization Flow                             │
//! │                                                                         │
//! │  Product.options_config (raw JSON, may be absent or garbage)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  OptionSchema::parse ── malformed? ──► warn + empty schema             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  OptionResolver::new                                                   │
//! │  ├── radio groups    → first value pre-selected                        │
//! │  └── checkbox groups → nothing selected                                │
//! │       │                                                                 │
//! │       │  select_radio("Taille", "Grande")                              │
//! │       │  toggle_checkbox("Suppléments", "Bacon")                       │
//! │       ▼                                                                 │
//! │  total_price() = base + Σ(price_extra of selected values)              │
//! │       │                                                                 │
//! │       ▼  "Ajouter au panier"                                           │
//! │  into_draft() ──► LineItemDraft { customization, final_price }         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Schema Shape
//! ```json
//! [
//!   {
//!     "title": "Taille",
//!     "type": "radio",
//!     "values": [
//!       { "label": "Normale", "price_extra_cents": 0 },
//!       { "label": "Grande", "price_extra_cents": 150 }
//!     ],
//!     "required": true
//!   },
//!   {
//!     "title": "Suppléments",
//!     "type": "checkbox",
//!     "values": [{ "label": "Bacon", "price_extra_cents": 150 }]
//!   }
//! ]
//! ```
//!
//! Absent config, the empty string, `[]`, `{}`, and anything that is not an
//! array all mean "no customization". A product stays orderable even when its
//! schema is broken; menu data is edited by hand and must not brick the app.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;
use ts_rs::TS;

use crate::cart::LineItemDraft;
use crate::money::Money;
use crate::types::Product;

// =============================================================================
// Schema Types
// =============================================================================

/// How a group accepts selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    /// Exactly one selection at a time.
    Radio,
    /// Zero or more selections.
    Checkbox,
}

/// One selectable value inside an option group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OptionValue {
    /// Label shown to the guest; doubles as the selection key within a group.
    pub label: String,

    /// Surcharge in cents added to the base price while selected.
    #[serde(default)]
    pub price_extra_cents: i64,
}

impl OptionValue {
    /// Returns the surcharge as Money.
    #[inline]
    pub fn price_extra(&self) -> Money {
        Money::from_cents(self.price_extra_cents)
    }
}

/// One customization group on a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OptionGroup {
    /// Group label; doubles as the key in the customization map.
    pub title: String,

    /// Radio or checkbox.
    #[serde(rename = "type")]
    pub kind: GroupKind,

    /// Selectable values, in display order.
    #[serde(default)]
    pub values: Vec<OptionValue>,

    /// Advisory flag; enforcement is a session-level policy, off by default.
    #[serde(default)]
    pub required: bool,
}

/// A product's parsed option schema: an ordered list of groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSchema {
    groups: Vec<OptionGroup>,
}

impl OptionSchema {
    /// Parses a raw `options_config` value leniently.
    ///
    /// Menu rows are edited by hand, so this never fails: malformed JSON is
    /// logged and treated as "no customization", and any well-formed value
    /// that is not an array (`null`, `{}`, a number...) is silently empty.
    pub fn parse(raw: Option<&str>) -> OptionSchema {
        let Some(raw) = raw else {
            return OptionSchema::default();
        };

        let raw = raw.trim();
        if raw.is_empty() {
            return OptionSchema::default();
        }

        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "malformed options_config, treating as no customization");
                return OptionSchema::default();
            }
        };

        match value {
            serde_json::Value::Array(_) => match serde_json::from_value(value) {
                Ok(groups) => OptionSchema { groups },
                Err(err) => {
                    warn!(error = %err, "unreadable option group, treating as no customization");
                    OptionSchema::default()
                }
            },
            // null, {}, scalars: well-formed but not a schema
            _ => OptionSchema::default(),
        }
    }

    /// Parses the schema attached to a product.
    pub fn for_product(product: &Product) -> OptionSchema {
        Self::parse(product.options_config.as_deref())
    }

    /// Builds a schema from already-structured groups (used by tests and
    /// seed data).
    pub fn from_groups(groups: Vec<OptionGroup>) -> OptionSchema {
        OptionSchema { groups }
    }

    /// The groups in display order.
    pub fn groups(&self) -> &[OptionGroup] {
        &self.groups
    }

    /// True when the product has no customization.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Serializes the schema back to the stored JSON form.
    pub fn to_json(&self) -> String {
        // Vec<OptionGroup> serialization cannot fail
        serde_json::to_string(&self.groups).unwrap_or_else(|_| "[]".to_string())
    }
}

// =============================================================================
// Customization Map
// =============================================================================

/// A guest's selection for one group: a single label for radio groups, a list
/// of labels for checkbox groups.
///
/// Serialized untagged, so the JSON reads naturally:
/// `{"Taille": "Grande", "Suppléments": ["Bacon", "Oeuf"]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum SelectedValues {
    /// A radio group's single selection.
    One(String),
    /// A checkbox group's selections, in toggle order.
    Many(Vec<String>),
}

/// Mapping from option-group title to the guest's selected value(s).
/// Groups with nothing selected are omitted.
pub type Customization = BTreeMap<String, SelectedValues>;

// =============================================================================
// Resolver
// =============================================================================

/// Tracks a guest's in-progress selections against one product's schema and
/// keeps the computed price current.
///
/// Selection calls referencing a group or label the schema does not contain
/// are silent no-ops; the resolver never panics on bad input.
#[derive(Debug, Clone)]
pub struct OptionResolver {
    base_price: Money,
    schema: OptionSchema,
    /// Selected labels per group, index-aligned with `schema.groups`.
    /// Radio groups hold zero or one label; checkbox groups hold any number.
    selected: Vec<Vec<String>>,
}

impl OptionResolver {
    /// Creates a resolver with default selections applied: the first value of
    /// every radio group, nothing for checkbox groups.
    pub fn new(base_price: Money, schema: OptionSchema) -> Self {
        let selected = schema
            .groups()
            .iter()
            .map(|group| match group.kind {
                GroupKind::Radio => group
                    .values
                    .first()
                    .map(|value| vec![value.label.clone()])
                    .unwrap_or_default(),
                GroupKind::Checkbox => Vec::new(),
            })
            .collect();

        OptionResolver {
            base_price,
            schema,
            selected,
        }
    }

    /// Creates a resolver for a product, parsing its schema leniently.
    pub fn for_product(product: &Product) -> Self {
        Self::new(product.price(), OptionSchema::for_product(product))
    }

    /// The schema driving this resolver.
    pub fn schema(&self) -> &OptionSchema {
        &self.schema
    }

    /// Replaces the single selection of a radio group.
    pub fn select_radio(&mut self, group_title: &str, label: &str) {
        let Some(idx) = self.group_index(group_title, GroupKind::Radio) else {
            return;
        };

        if self.schema.groups[idx].values.iter().any(|v| v.label == label) {
            self.selected[idx] = vec![label.to_string()];
        }
    }

    /// Toggles a checkbox label: adds it if absent, removes it if present.
    pub fn toggle_checkbox(&mut self, group_title: &str, label: &str) {
        let Some(idx) = self.group_index(group_title, GroupKind::Checkbox) else {
            return;
        };

        if let Some(pos) = self.selected[idx].iter().position(|l| l == label) {
            self.selected[idx].remove(pos);
        } else if self.schema.groups[idx].values.iter().any(|v| v.label == label) {
            self.selected[idx].push(label.to_string());
        }
    }

    /// Whether a label is currently selected in a group.
    pub fn is_selected(&self, group_title: &str, label: &str) -> bool {
        self.schema
            .groups()
            .iter()
            .zip(&self.selected)
            .any(|(group, labels)| {
                group.title == group_title && labels.iter().any(|l| l == label)
            })
    }

    /// Base price plus the surcharges of every selected value.
    pub fn total_price(&self) -> Money {
        let extras = self
            .schema
            .groups()
            .iter()
            .zip(&self.selected)
            .flat_map(|(group, labels)| {
                group
                    .values
                    .iter()
                    .filter(|value| labels.iter().any(|l| l == &value.label))
            })
            .fold(Money::zero(), |acc, value| acc + value.price_extra());

        self.base_price + extras
    }

    /// Titles of required groups that currently have no selection.
    ///
    /// Empty unless menu data marks groups `required` and the session enables
    /// enforcement; radio groups with at least one value are never reported
    /// because a default is always applied.
    pub fn missing_required(&self) -> Vec<&str> {
        self.schema
            .groups()
            .iter()
            .zip(&self.selected)
            .filter(|(group, labels)| group.required && labels.is_empty())
            .map(|(group, _)| group.title.as_str())
            .collect()
    }

    /// The current selections as a customization map.
    /// Groups with nothing selected are omitted.
    pub fn customization(&self) -> Customization {
        let mut map = Customization::new();

        for (group, labels) in self.schema.groups().iter().zip(&self.selected) {
            if labels.is_empty() {
                continue;
            }
            let value = match group.kind {
                GroupKind::Radio => SelectedValues::One(labels[0].clone()),
                GroupKind::Checkbox => SelectedValues::Many(labels.clone()),
            };
            map.insert(group.title.clone(), value);
        }

        map
    }

    /// Produces the add-to-cart payload: product identity frozen, final price
    /// set to the resolver's current total.
    pub fn into_draft(self, product: &Product) -> LineItemDraft {
        LineItemDraft {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            base_price: self.base_price,
            final_price: self.total_price(),
            customization: self.customization(),
            image_url: product.image_url.clone(),
        }
    }

    fn group_index(&self, title: &str, kind: GroupKind) -> Option<usize> {
        self.schema
            .groups()
            .iter()
            .position(|group| group.title == title && group.kind == kind)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn burger_schema() -> OptionSchema {
        OptionSchema::from_groups(vec![
            OptionGroup {
                title: "Taille".to_string(),
                kind: GroupKind::Radio,
                values: vec![
                    OptionValue {
                        label: "Normale".to_string(),
                        price_extra_cents: 0,
                    },
                    OptionValue {
                        label: "Grande".to_string(),
                        price_extra_cents: 150,
                    },
                ],
                required: true,
            },
            OptionGroup {
                title: "Suppléments".to_string(),
                kind: GroupKind::Checkbox,
                values: vec![
                    OptionValue {
                        label: "Bacon".to_string(),
                        price_extra_cents: 150,
                    },
                    OptionValue {
                        label: "Oeuf".to_string(),
                        price_extra_cents: 200,
                    },
                ],
                required: false,
            },
        ])
    }

    fn product_with_config(config: Option<&str>) -> Product {
        Product {
            id: "prod-1".to_string(),
            category_id: "cat-1".to_string(),
            name: "Burger Classique".to_string(),
            description: None,
            price_cents: 1000,
            image_url: None,
            options_config: config.map(str::to_string),
            is_available: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_parse_absent_and_empty() {
        assert!(OptionSchema::parse(None).is_empty());
        assert!(OptionSchema::parse(Some("")).is_empty());
        assert!(OptionSchema::parse(Some("   ")).is_empty());
        assert!(OptionSchema::parse(Some("[]")).is_empty());
        assert!(OptionSchema::parse(Some("{}")).is_empty());
        assert!(OptionSchema::parse(Some("null")).is_empty());
    }

    #[test]
    fn test_parse_malformed_is_soft() {
        // Broken JSON must not abort the flow
        assert!(OptionSchema::parse(Some("{not json")).is_empty());
        // Array of the wrong shape either
        assert!(OptionSchema::parse(Some("[{\"bogus\": true}]")).is_empty());
    }

    #[test]
    fn test_parse_valid_schema() {
        let json = burger_schema().to_json();
        let parsed = OptionSchema::parse(Some(&json));
        assert_eq!(parsed.groups().len(), 2);
        assert_eq!(parsed.groups()[0].title, "Taille");
        assert_eq!(parsed.groups()[0].kind, GroupKind::Radio);
        assert_eq!(parsed.groups()[1].values[1].price_extra_cents, 200);
    }

    #[test]
    fn test_defaults_radio_first_checkbox_empty() {
        let resolver = OptionResolver::new(Money::from_cents(1000), burger_schema());
        assert!(resolver.is_selected("Taille", "Normale"));
        assert!(!resolver.is_selected("Taille", "Grande"));
        assert!(!resolver.is_selected("Suppléments", "Bacon"));
        assert_eq!(resolver.total_price().cents(), 1000);
    }

    #[test]
    fn test_checkbox_pricing() {
        // Base 10.00 with extras A +1.50 and B +2.00:
        // both selected → 13.50, deselect A → 12.00
        let mut resolver = OptionResolver::new(Money::from_cents(1000), burger_schema());

        resolver.toggle_checkbox("Suppléments", "Bacon");
        resolver.toggle_checkbox("Suppléments", "Oeuf");
        assert_eq!(resolver.total_price().cents(), 1350);

        resolver.toggle_checkbox("Suppléments", "Bacon");
        assert_eq!(resolver.total_price().cents(), 1200);
    }

    #[test]
    fn test_radio_replaces_selection() {
        let mut resolver = OptionResolver::new(Money::from_cents(1000), burger_schema());

        resolver.select_radio("Taille", "Grande");
        assert!(resolver.is_selected("Taille", "Grande"));
        assert!(!resolver.is_selected("Taille", "Normale"));
        assert_eq!(resolver.total_price().cents(), 1150);

        resolver.select_radio("Taille", "Normale");
        assert_eq!(resolver.total_price().cents(), 1000);
    }

    #[test]
    fn test_unknown_group_or_label_is_noop() {
        let mut resolver = OptionResolver::new(Money::from_cents(1000), burger_schema());

        resolver.select_radio("Sauce", "Ketchup");
        resolver.select_radio("Taille", "Géante");
        resolver.toggle_checkbox("Suppléments", "Truffe");
        resolver.toggle_checkbox("Taille", "Grande"); // wrong kind

        assert_eq!(resolver.total_price().cents(), 1000);
        assert!(resolver.is_selected("Taille", "Normale"));
    }

    #[test]
    fn test_customization_map_shape() {
        let mut resolver = OptionResolver::new(Money::from_cents(1000), burger_schema());
        resolver.select_radio("Taille", "Grande");
        resolver.toggle_checkbox("Suppléments", "Bacon");

        let map = resolver.customization();
        assert_eq!(
            map.get("Taille"),
            Some(&SelectedValues::One("Grande".to_string()))
        );
        assert_eq!(
            map.get("Suppléments"),
            Some(&SelectedValues::Many(vec!["Bacon".to_string()]))
        );

        // The JSON shape the frontend and the order lines both rely on
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["Taille"], "Grande");
        assert_eq!(json["Suppléments"], serde_json::json!(["Bacon"]));
    }

    #[test]
    fn test_empty_checkbox_group_omitted() {
        let resolver = OptionResolver::new(Money::from_cents(1000), burger_schema());
        let map = resolver.customization();
        assert!(map.contains_key("Taille"));
        assert!(!map.contains_key("Suppléments"));
    }

    #[test]
    fn test_missing_required() {
        let schema = OptionSchema::from_groups(vec![OptionGroup {
            title: "Sauce".to_string(),
            kind: GroupKind::Checkbox,
            values: vec![OptionValue {
                label: "Ketchup".to_string(),
                price_extra_cents: 0,
            }],
            required: true,
        }]);

        let mut resolver = OptionResolver::new(Money::from_cents(500), schema);
        assert_eq!(resolver.missing_required(), vec!["Sauce"]);

        resolver.toggle_checkbox("Sauce", "Ketchup");
        assert!(resolver.missing_required().is_empty());
    }

    #[test]
    fn test_into_draft() {
        let product = product_with_config(Some(&burger_schema().to_json()));
        let mut resolver = OptionResolver::for_product(&product);
        resolver.toggle_checkbox("Suppléments", "Bacon");

        let draft = resolver.into_draft(&product);
        assert_eq!(draft.product_id, "prod-1");
        assert_eq!(draft.product_name, "Burger Classique");
        assert_eq!(draft.base_price.cents(), 1000);
        assert_eq!(draft.final_price.cents(), 1150);
        assert!(draft.customization.contains_key("Suppléments"));
    }

    #[test]
    fn test_product_without_config_has_plain_draft() {
        let product = product_with_config(None);
        let resolver = OptionResolver::for_product(&product);

        assert!(resolver.schema().is_empty());
        let draft = resolver.into_draft(&product);
        assert_eq!(draft.final_price, draft.base_price);
        assert!(draft.customization.is_empty());
    }
}

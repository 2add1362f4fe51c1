//! Column resolution: map arbitrary, inconsistently named headers to the
//! five label roles.
//!
//! Each role owns an ordered rule table; rules are tried in order against
//! the upper-cased header names and the first rule that selects a column
//! wins. Resolution runs once per dataset and the resulting [`RoleMap`] is
//! immutable.

use std::collections::BTreeMap;

use serde::Serialize;
use sticker_labels_diagnostics::{Diagnostic, codes};
use sticker_labels_profile::LocationVariant;

use crate::error::{DatasetProblem, LabelError};

/// A semantic field printed on every label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Goods-received-note number. Optional.
    GrnNumber,
    /// Part number. Always resolved.
    PartNumber,
    /// Item description. Always resolved.
    Description,
    /// Raw location string. Always resolved.
    Location,
    /// Receipt date. Optional.
    ReceiptDate,
}

impl Role {
    /// Every role, in resolution order. Later roles may fall back on
    /// earlier ones, never the reverse.
    pub const ALL: [Role; 5] = [
        Role::GrnNumber,
        Role::PartNumber,
        Role::Description,
        Role::Location,
        Role::ReceiptDate,
    ];

    /// `true` for roles that may legitimately stay unresolved.
    pub const fn is_optional(self) -> bool {
        matches!(self, Role::GrnNumber | Role::ReceiptDate)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Role::GrnNumber => "GRN number",
            Role::PartNumber => "part number",
            Role::Description => "description",
            Role::Location => "location",
            Role::ReceiptDate => "receipt date",
        })
    }
}

/// One matching rule. Needles are compared against upper-cased names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Name contains every needle in `all` and, when `any` is non-empty, at
    /// least one needle in `any`.
    Contains {
        /// Needles that must all appear.
        all: &'static [&'static str],
        /// Needles of which one must appear (ignored when empty).
        any: &'static [&'static str],
    },
    /// Name equals one of the given spellings.
    Exact(&'static [&'static str]),
    /// The column at this position, if the dataset is wide enough.
    Position(usize),
    /// Whatever column an earlier role resolved to.
    SameAs(Role),
}

impl Rule {
    /// `true` for rules that do not look at the column name.
    pub const fn is_fallback(self) -> bool {
        matches!(self, Rule::Position(_) | Rule::SameAs(_))
    }

    fn matches_name(self, upper: &str) -> bool {
        match self {
            Rule::Contains { all, any } => {
                all.iter().all(|n| upper.contains(n))
                    && (any.is_empty() || any.iter().any(|n| upper.contains(n)))
            }
            Rule::Exact(names) => names.iter().any(|n| *n == upper),
            Rule::Position(_) | Rule::SameAs(_) => false,
        }
    }
}

const NUMBER_MARKERS: &[&str] = &["NO", "NUM", "#"];

const GRN_RULES: &[Rule] = &[
    Rule::Contains {
        all: &["GRN"],
        any: NUMBER_MARKERS,
    },
    Rule::Exact(&["GRN", "GRNNO", "GRN_NO"]),
    Rule::Contains {
        all: &["GOODS", "RECEIPT"],
        any: &[],
    },
];

const PART_RULES: &[Rule] = &[
    Rule::Contains {
        all: &["PART"],
        any: NUMBER_MARKERS,
    },
    Rule::Exact(&["PARTNO", "PART"]),
    Rule::Position(0),
];

const DESCRIPTION_RULES: &[Rule] = &[
    Rule::Contains {
        all: &["DESC"],
        any: &[],
    },
    Rule::Contains {
        all: &["NAME"],
        any: &[],
    },
    Rule::Position(1),
    Rule::SameAs(Role::PartNumber),
];

const LOCATION_GENERIC: Rule = Rule::Contains {
    all: &[],
    any: &["LOC", "POS", "LOCATION"],
};

const STORE_LOCATION_RULES: &[Rule] = &[
    Rule::Contains {
        all: &["STORE", "LOC"],
        any: &[],
    },
    Rule::Exact(&["STORELOCATION", "STORE_LOCATION"]),
    LOCATION_GENERIC,
    Rule::Position(2),
    Rule::SameAs(Role::Description),
];

const PUT_AWAY_LOCATION_RULES: &[Rule] = &[
    Rule::Contains {
        all: &["PUT", "AWAY"],
        any: &[],
    },
    Rule::Exact(&["PUTAWAY", "PUT_AWAY"]),
    LOCATION_GENERIC,
    Rule::Position(2),
    Rule::SameAs(Role::Description),
];

const RECEIPT_DATE_RULES: &[Rule] = &[
    Rule::Contains {
        all: &["RECEIPT", "DATE"],
        any: &[],
    },
    Rule::Exact(&["RECEIPTDATE", "RECEIPT_DATE"]),
    Rule::Contains {
        all: &["DATE"],
        any: &[],
    },
];

/// The ordered rule table for `role` under `variant`.
pub fn rules(role: Role, variant: LocationVariant) -> &'static [Rule] {
    match role {
        Role::GrnNumber => GRN_RULES,
        Role::PartNumber => PART_RULES,
        Role::Description => DESCRIPTION_RULES,
        Role::Location => match variant {
            LocationVariant::Store => STORE_LOCATION_RULES,
            LocationVariant::PutAway => PUT_AWAY_LOCATION_RULES,
        },
        Role::ReceiptDate => RECEIPT_DATE_RULES,
    }
}

/// The column a role resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedColumn {
    /// Zero-based column position.
    pub index: usize,
    /// Column name with its original casing.
    pub name: String,
    /// Position of the winning rule in the role's table.
    pub rule: usize,
    /// `true` when the winning rule ignored the column name.
    pub fallback: bool,
}

/// Role → column assignment for one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RoleMap {
    grn_number: Option<ResolvedColumn>,
    part_number: Option<ResolvedColumn>,
    description: Option<ResolvedColumn>,
    location: Option<ResolvedColumn>,
    receipt_date: Option<ResolvedColumn>,
}

impl RoleMap {
    /// Resolution for `role`, if any.
    pub fn get(&self, role: Role) -> Option<&ResolvedColumn> {
        self.slot(role).as_ref()
    }

    /// Column index for `role`, if resolved.
    pub fn column(&self, role: Role) -> Option<usize> {
        self.get(role).map(|c| c.index)
    }

    /// Resolutions in [`Role::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Role, Option<&ResolvedColumn>)> {
        Role::ALL.into_iter().map(|r| (r, self.get(r)))
    }

    /// Informational notes about unresolved optional roles and name-blind
    /// fallbacks.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        for (role, resolved) in self.iter() {
            match resolved {
                None => out.push(
                    Diagnostic::info(
                        codes::ROLE_UNRESOLVED,
                        format!("no column looks like a {role}; labels leave it empty"),
                        None,
                    )
                    .with_context(BTreeMap::from([("role".into(), role.to_string())])),
                ),
                Some(col) if col.fallback => out.push(
                    Diagnostic::info(
                        codes::ROLE_FALLBACK,
                        format!("{role} taken from column '{}' by position", col.name),
                        None,
                    )
                    .with_context(BTreeMap::from([
                        ("role".into(), role.to_string()),
                        ("column".into(), col.name.clone()),
                    ])),
                ),
                Some(_) => {}
            }
        }
        out
    }

    fn slot(&self, role: Role) -> &Option<ResolvedColumn> {
        match role {
            Role::GrnNumber => &self.grn_number,
            Role::PartNumber => &self.part_number,
            Role::Description => &self.description,
            Role::Location => &self.location,
            Role::ReceiptDate => &self.receipt_date,
        }
    }

    fn slot_mut(&mut self, role: Role) -> &mut Option<ResolvedColumn> {
        match role {
            Role::GrnNumber => &mut self.grn_number,
            Role::PartNumber => &mut self.part_number,
            Role::Description => &mut self.description,
            Role::Location => &mut self.location,
            Role::ReceiptDate => &mut self.receipt_date,
        }
    }
}

/// Resolve every role against `columns`.
///
/// Fails only when there are no columns at all; every other outcome,
/// including unresolved optional roles, is valid.
pub fn resolve_columns<S: AsRef<str>>(
    columns: &[S],
    variant: LocationVariant,
) -> Result<RoleMap, LabelError> {
    if columns.is_empty() {
        return Err(LabelError::InvalidDataset(DatasetProblem::NoColumns));
    }

    let upper: Vec<String> = columns
        .iter()
        .map(|c| c.as_ref().to_uppercase())
        .collect();

    let mut map = RoleMap::default();
    for role in Role::ALL {
        let resolved = rules(role, variant)
            .iter()
            .enumerate()
            .find_map(|(rule_idx, rule)| {
                let index = match *rule {
                    Rule::Position(p) => (p < columns.len()).then_some(p),
                    Rule::SameAs(other) => map.column(other),
                    named => upper.iter().position(|u| named.matches_name(u)),
                }?;
                Some(ResolvedColumn {
                    index,
                    name: columns[index].as_ref().to_string(),
                    rule: rule_idx,
                    fallback: rule.is_fallback(),
                })
            });
        tracing::debug!(
            %role,
            column = resolved.as_ref().map(|c| c.name.as_str()),
            "resolved column"
        );
        *map.slot_mut(role) = resolved;
    }

    Ok(map)
}

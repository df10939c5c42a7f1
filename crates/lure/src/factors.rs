//! Built-in table of social engineering psychological factors.
//!
//! Percentages give the share of studied incidents in which each factor was
//! observed. The table is fixed for the lifetime of the process.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactorRecord {
  pub name: String,
  pub percentage: u8,
}

/// Source of name-ordered factor records
pub trait FactorProvider {
  fn records(&self) -> &[FactorRecord];

  /// Exact name match
  fn lookup(&self, name: &str) -> Option<&FactorRecord> {
    self.records().iter().find(|record| record.name == name)
  }
}

const BUILTIN: [(&str, u8); 22] = [
  ("Multiple/unknown", 60),
  ("Authority", 59),
  ("Credibility", 48),
  ("Familiarity", 43),
  ("Following business", 28),
  ("Fear/Loss Aversion", 24),
  ("Legitimacy", 19),
  ("Curiosity", 16),
  ("Attraction", 11),
  ("Urgency", 11),
  ("Reverse SE", 11),
  ("Intimidation", 10),
  ("Liking", 8),
  ("Building rapport", 7),
  ("Reciprocity", 7),
  ("Expertise", 7),
  ("Greed", 6),
  ("Desire to help", 6),
  ("SSO, Data, Finance", 5),
  ("Opportunity", 4),
  ("Consistency", 4),
  ("Utility", 4),
];

#[derive(Debug, Clone)]
pub struct FactorTable {
  records: Vec<FactorRecord>,
}

impl FactorTable {
  /// The built-in dataset, sorted by name
  pub fn builtin() -> Self {
    Self::from_records(
      BUILTIN
        .iter()
        .map(|(name, percentage)| FactorRecord { name: name.to_string(), percentage: *percentage })
        .collect(),
    )
  }

  pub fn from_records(mut records: Vec<FactorRecord>) -> Self {
    records.sort_by(|a, b| {
      a.name.to_lowercase().cmp(&b.name.to_lowercase()).then_with(|| a.name.cmp(&b.name))
    });
    Self { records }
  }

  /// Exact match first, then a case-insensitive one
  pub fn find(&self, name: &str) -> Option<&FactorRecord> {
    let name = name.trim();
    self
      .lookup(name)
      .or_else(|| self.records.iter().find(|record| record.name.eq_ignore_ascii_case(name)))
  }

  pub fn names(&self) -> Vec<&str> {
    self.records.iter().map(|record| record.name.as_str()).collect()
  }
}

impl FactorProvider for FactorTable {
  fn records(&self) -> &[FactorRecord] {
    &self.records
  }
}

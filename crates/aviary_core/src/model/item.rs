//! Aviary domain model.
//!
//! # Responsibility
//! - Define the tagged-union `Item` record shared by every aviary entity.
//! - Provide the category tag used to route records to remote tables.
//! - Provide the pure bird display-name helper.
//!
//! # Invariants
//! - `id` is an opaque string token, stable for the entity lifetime.
//! - Cross-entity references are weak: stored ids with no ownership implied
//!   and no guarantee the target still exists.
//! - `sale_details` presence iff `status == Sold` is caller convention only.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque string identifier shared by every entity.
///
/// Kept as a type alias: ids arrive from external stores and assistant
/// proposals as plain strings, so the model never assumes UUID shape.
pub type ItemId = String;

/// Generates a fresh collision-resistant id for a new entity.
pub fn generate_id() -> ItemId {
    Uuid::new_v4().to_string()
}

/// Discriminant for every `Item` variant.
///
/// The category routes a record to its named remote collection and narrows
/// the variant on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Bird,
    Cage,
    Pair,
    BreedingRecord,
    NoteReminder,
    Transaction,
    Permit,
    CustomSpecies,
    CustomMutation,
}

impl ItemCategory {
    /// Returns the remote collection name for this category.
    pub fn table(self) -> &'static str {
        match self {
            Self::Bird => "birds",
            Self::Cage => "cages",
            Self::Pair => "pairs",
            Self::BreedingRecord => "breeding_records",
            Self::NoteReminder => "note_reminders",
            Self::Transaction => "transactions",
            Self::Permit => "permits",
            Self::CustomSpecies => "custom_species",
            Self::CustomMutation => "custom_mutations",
        }
    }
}

impl Display for ItemCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
    Unsexed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BirdStatus {
    Available,
    Sold,
    Deceased,
    HandRearing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EggStatus {
    Laid,
    Hatched,
    Infertile,
    Broken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrencePattern {
    Daily,
    Weekly,
    Monthly,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

/// Genetic inheritance pattern for a custom mutation.
///
/// Fixed enumeration; the actual inheritance math is delegated to the
/// external inference endpoint and never computed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Inheritance {
    AutosomalRecessive,
    AutosomalDominant,
    AutosomalIncompleteDominant,
    AutosomalCoDominant,
    SexLinkedRecessive,
    SexLinkedDominant,
    SexLinkedIncompleteDominant,
    Polygenic,
    Unknown,
}

/// Sale record attached to a bird once it is sold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleDetails {
    pub date: NaiveDate,
    pub price: f64,
    pub buyer: String,
}

/// One veterinary/medical entry in a bird's ordered history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub date: NaiveDate,
    pub record_type: String,
    pub details: String,
    pub cost: Option<f64>,
}

/// A bird. The central entity; most weak references point here.
///
/// A bird does not store its own cage: `Cage::bird_ids` is the authoritative
/// location relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    pub id: ItemId,
    pub species: String,
    pub subspecies: Option<String>,
    pub sex: Sex,
    pub ring_number: Option<String>,
    pub unbanded: bool,
    /// Jan 1 by convention means only the year is known.
    pub birth_date: Option<NaiveDate>,
    pub visual_mutations: Vec<String>,
    pub split_mutations: Vec<String>,
    pub father_id: Option<ItemId>,
    pub mother_id: Option<ItemId>,
    pub mate_id: Option<ItemId>,
    pub offspring_ids: Vec<ItemId>,
    pub paid_price: Option<f64>,
    pub estimated_value: Option<f64>,
    pub status: BirdStatus,
    pub permit_id: Option<ItemId>,
    pub sale_details: Option<SaleDetails>,
    pub medical_records: Vec<MedicalRecord>,
}

impl Bird {
    /// Creates an available, unsexed bird with a generated id.
    pub fn new(species: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            species: species.into(),
            subspecies: None,
            sex: Sex::Unsexed,
            ring_number: None,
            unbanded: false,
            birth_date: None,
            visual_mutations: Vec::new(),
            split_mutations: Vec::new(),
            father_id: None,
            mother_id: None,
            mate_id: None,
            offspring_ids: Vec::new(),
            paid_price: None,
            estimated_value: None,
            status: BirdStatus::Available,
            permit_id: None,
            sale_details: None,
            medical_records: Vec::new(),
        }
    }

    /// Human-readable identification: `species (ring_number|Unbanded)`.
    pub fn display_name(&self) -> String {
        let ring = self.ring_number.as_deref().unwrap_or("Unbanded");
        format!("{} ({ring})", self.species)
    }
}

/// A cage. `bird_ids` is the authoritative housing relation; the mutation
/// engine keeps a bird in at most one cage at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cage {
    pub id: ItemId,
    pub name: String,
    pub bird_ids: Vec<ItemId>,
}

impl Cage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            bird_ids: Vec::new(),
        }
    }
}

/// A breeding pair. A pair with a missing member is meaningless, so deleting
/// either bird cascades to the pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pair {
    pub id: ItemId,
    pub male_id: ItemId,
    pub female_id: ItemId,
    pub image: Option<String>,
}

impl Pair {
    pub fn new(male_id: impl Into<ItemId>, female_id: impl Into<ItemId>) -> Self {
        Self {
            id: generate_id(),
            male_id: male_id.into(),
            female_id: female_id.into(),
            image: None,
        }
    }
}

/// One egg in a clutch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Egg {
    pub laid_date: NaiveDate,
    pub expected_hatch_date: Option<NaiveDate>,
    pub status: EggStatus,
    pub hatch_date: Option<NaiveDate>,
    /// Weak reference to the hatched chick's Bird record.
    pub chick_id: Option<ItemId>,
}

/// A clutch for one pair: start date, notes and the ordered egg list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedingRecord {
    pub id: ItemId,
    pub pair_id: ItemId,
    pub start_date: NaiveDate,
    pub notes: String,
    pub eggs: Vec<Egg>,
}

/// One sub-task line inside a note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubTask {
    pub text: String,
    pub completed: bool,
    pub associated_bird_ids: Vec<ItemId>,
}

/// A free-form note, optionally a (recurring) reminder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteReminder {
    pub id: ItemId,
    pub title: String,
    pub content: String,
    pub is_reminder: bool,
    pub reminder_date: Option<NaiveDate>,
    pub is_recurring: bool,
    pub recurrence_pattern: RecurrencePattern,
    pub associated_bird_ids: Vec<ItemId>,
    pub sub_tasks: Vec<SubTask>,
    pub completed: bool,
}

/// A financial entry, optionally tied to one bird.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: ItemId,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub related_bird_id: Option<ItemId>,
}

/// A keeping/breeding permit. Birds reference permits by `permit_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permit {
    pub id: ItemId,
    pub permit_number: String,
    pub issuing_authority: String,
    pub issue_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
}

/// A user-defined species with its incubation period and subspecies list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomSpecies {
    pub id: ItemId,
    pub name: String,
    pub incubation_period_days: u32,
    pub subspecies: Vec<String>,
}

/// A user-defined color mutation and its inheritance pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomMutation {
    pub id: ItemId,
    pub name: String,
    pub inheritance: Inheritance,
}

/// The tagged-union entity record.
///
/// Serialized internally tagged on `category` so the flat `items` collection
/// carries its discriminant inline and round-trips through the local cache
/// and the assistant boundary unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum Item {
    Bird(Bird),
    Cage(Cage),
    Pair(Pair),
    BreedingRecord(BreedingRecord),
    NoteReminder(NoteReminder),
    Transaction(Transaction),
    Permit(Permit),
    CustomSpecies(CustomSpecies),
    CustomMutation(CustomMutation),
}

impl Item {
    pub fn id(&self) -> &ItemId {
        match self {
            Self::Bird(b) => &b.id,
            Self::Cage(c) => &c.id,
            Self::Pair(p) => &p.id,
            Self::BreedingRecord(r) => &r.id,
            Self::NoteReminder(n) => &n.id,
            Self::Transaction(t) => &t.id,
            Self::Permit(p) => &p.id,
            Self::CustomSpecies(s) => &s.id,
            Self::CustomMutation(m) => &m.id,
        }
    }

    pub fn category(&self) -> ItemCategory {
        match self {
            Self::Bird(_) => ItemCategory::Bird,
            Self::Cage(_) => ItemCategory::Cage,
            Self::Pair(_) => ItemCategory::Pair,
            Self::BreedingRecord(_) => ItemCategory::BreedingRecord,
            Self::NoteReminder(_) => ItemCategory::NoteReminder,
            Self::Transaction(_) => ItemCategory::Transaction,
            Self::Permit(_) => ItemCategory::Permit,
            Self::CustomSpecies(_) => ItemCategory::CustomSpecies,
            Self::CustomMutation(_) => ItemCategory::CustomMutation,
        }
    }

    /// Checks required fields before any state change.
    ///
    /// # Invariants
    /// - `id` must be non-empty for every variant.
    /// - Required name/description fields must be non-empty.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.id().trim().is_empty() {
            return Err(ItemValidationError::EmptyId);
        }

        let category = self.category();
        let missing = |field: &'static str| ItemValidationError::MissingField { category, field };

        match self {
            Self::Bird(b) => {
                if b.species.trim().is_empty() {
                    return Err(missing("species"));
                }
            }
            Self::Cage(c) => {
                if c.name.trim().is_empty() {
                    return Err(missing("name"));
                }
            }
            Self::Pair(p) => {
                if p.male_id.trim().is_empty() {
                    return Err(missing("male_id"));
                }
                if p.female_id.trim().is_empty() {
                    return Err(missing("female_id"));
                }
            }
            Self::BreedingRecord(r) => {
                if r.pair_id.trim().is_empty() {
                    return Err(missing("pair_id"));
                }
            }
            Self::NoteReminder(n) => {
                if n.title.trim().is_empty() {
                    return Err(missing("title"));
                }
            }
            Self::Transaction(t) => {
                if t.description.trim().is_empty() {
                    return Err(missing("description"));
                }
            }
            Self::Permit(p) => {
                if p.permit_number.trim().is_empty() {
                    return Err(missing("permit_number"));
                }
            }
            Self::CustomSpecies(s) => {
                if s.name.trim().is_empty() {
                    return Err(missing("name"));
                }
            }
            Self::CustomMutation(m) => {
                if m.name.trim().is_empty() {
                    return Err(missing("name"));
                }
            }
        }

        Ok(())
    }
}

/// Validation error for entity required fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemValidationError {
    EmptyId,
    MissingField {
        category: ItemCategory,
        field: &'static str,
    },
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "entity id must not be empty"),
            Self::MissingField { category, field } => {
                write!(f, "{category}: required field `{field}` is missing or empty")
            }
        }
    }
}

impl Error for ItemValidationError {}

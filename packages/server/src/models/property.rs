use std::collections::HashMap;
use std::fmt;

use sea_orm::{FromQueryResult, Value};

use crate::entity::property_input;

/// Identifies one staging row. Every read and write is scoped by all three parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyKey {
    pub company_id: i32,
    pub portfolio_id: String,
    pub property_id: String,
}

impl PropertyKey {
    pub fn new(company_id: i32, portfolio_id: impl Into<String>, property_id: impl Into<String>) -> Self {
        Self {
            company_id,
            portfolio_id: portfolio_id.into(),
            property_id: property_id.into(),
        }
    }
}

/// Row shown in the property picker.
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct PropertySummary {
    pub property_id: String,
    pub property_name: Option<String>,
    pub property_address: Option<String>,
    pub city: Option<String>,
    pub unit_count: Option<f64>,
    pub building_class: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Numeric,
}

/// Form section a field is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Header,
    PropertyTraits,
}

impl Section {
    pub const ALL: [Section; 2] = [Section::Header, Section::PropertyTraits];

    pub fn title(self) -> &'static str {
        match self {
            Section::Header => "Header",
            Section::PropertyTraits => "Property Traits",
        }
    }
}

/// The columns an operator may edit. Form keys outside this set never reach SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditableField {
    PropertyName,
    PropertyAddress,
    City,
    Zip,
    BuildingClass,
    UnitCount,
    CapexPerUnit,
}

impl EditableField {
    pub const ALL: [EditableField; 7] = [
        EditableField::PropertyName,
        EditableField::PropertyAddress,
        EditableField::City,
        EditableField::Zip,
        EditableField::BuildingClass,
        EditableField::UnitCount,
        EditableField::CapexPerUnit,
    ];

    /// Form field name, identical to the column name.
    pub fn name(self) -> &'static str {
        match self {
            EditableField::PropertyName => "property_name",
            EditableField::PropertyAddress => "property_address",
            EditableField::City => "city",
            EditableField::Zip => "zip",
            EditableField::BuildingClass => "building_class",
            EditableField::UnitCount => "unit_count",
            EditableField::CapexPerUnit => "capex_per_unit",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EditableField::PropertyName => "Property Name",
            EditableField::PropertyAddress => "Address",
            EditableField::City => "City",
            EditableField::Zip => "ZIP",
            EditableField::BuildingClass => "Building Class",
            EditableField::UnitCount => "Unit Count",
            EditableField::CapexPerUnit => "CapEx per Unit",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            EditableField::UnitCount | EditableField::CapexPerUnit => FieldKind::Numeric,
            _ => FieldKind::Text,
        }
    }

    pub fn section(self) -> Section {
        match self.kind() {
            FieldKind::Text => Section::Header,
            FieldKind::Numeric => Section::PropertyTraits,
        }
    }

    pub fn column(self) -> property_input::Column {
        match self {
            EditableField::PropertyName => property_input::Column::PropertyName,
            EditableField::PropertyAddress => property_input::Column::PropertyAddress,
            EditableField::City => property_input::Column::City,
            EditableField::Zip => property_input::Column::Zip,
            EditableField::BuildingClass => property_input::Column::BuildingClass,
            EditableField::UnitCount => property_input::Column::UnitCount,
            EditableField::CapexPerUnit => property_input::Column::CapexPerUnit,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Current value formatted for a form input. Whole numbers drop the
    /// trailing `.0` so an untouched integer round-trips as an integer.
    pub fn display_value(self, model: &property_input::Model) -> String {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let number = |v: Option<f64>| v.map(format_number).unwrap_or_default();

        match self {
            EditableField::PropertyName => text(&model.property_name),
            EditableField::PropertyAddress => text(&model.property_address),
            EditableField::City => text(&model.city),
            EditableField::Zip => text(&model.zip),
            EditableField::BuildingClass => text(&model.building_class),
            EditableField::UnitCount => number(model.unit_count),
            EditableField::CapexPerUnit => number(model.capex_per_unit),
        }
    }

    fn parse(self, raw: &str) -> Result<FieldValue, ValidationError> {
        match self.kind() {
            FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),
            FieldKind::Numeric => parse_number(raw).ok_or(ValidationError { field: self }),
        }
    }
}

impl fmt::Display for EditableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

/// A validated value ready to be bound to its column.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl From<FieldValue> for Value {
    fn from(v: FieldValue) -> Self {
        match v {
            FieldValue::Text(s) => s.into(),
            FieldValue::Integer(i) => i.into(),
            FieldValue::Float(f) => f.into(),
        }
    }
}

/// A value containing a decimal point is a float, anything else must be an integer.
pub fn parse_number(raw: &str) -> Option<FieldValue> {
    let raw = raw.trim();
    if raw.contains('.') {
        raw.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(FieldValue::Float)
    } else {
        raw.parse::<i64>().ok().map(FieldValue::Integer)
    }
}

/// A submitted value could not be coerced to its column's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid value for {field}")]
pub struct ValidationError {
    pub field: EditableField,
}

/// A validated, non-empty set of column assignments.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyUpdate {
    changes: Vec<(EditableField, FieldValue)>,
}

impl PropertyUpdate {
    /// Validate submitted form values.
    ///
    /// Unknown keys are ignored; recognised keys that are blank after
    /// trimming leave their column untouched. The first value that fails to
    /// coerce rejects the whole submission.
    pub fn from_form(form: &HashMap<String, String>) -> Result<Self, ValidationError> {
        let mut changes = Vec::new();

        for field in EditableField::ALL {
            let Some(raw) = form.get(field.name()) else {
                continue;
            };
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            changes.push((field, field.parse(raw)?));
        }

        Ok(Self { changes })
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    #[cfg(test)]
    pub fn get(&self, field: EditableField) -> Option<&FieldValue> {
        self.changes
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v)
    }

    pub fn fields(&self) -> impl Iterator<Item = EditableField> + '_ {
        self.changes.iter().map(|(f, _)| *f)
    }

    pub fn changes(&self) -> &[(EditableField, FieldValue)] {
        &self.changes
    }
}

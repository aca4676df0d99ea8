use serde::Serialize;
use thiserror::Error;

use super::schema::ProfileField;

pub type StepId = u8;

#[derive(Debug, Clone, Serialize)]
pub struct StepDefinition {
    pub id: StepId,
    /// Fluent key of the step label.
    pub label_key: &'static str,
    pub label: &'static str,
    pub fields: &'static [ProfileField],
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StepTableError {
    #[error("a step table needs at least one step")]
    Empty,

    #[error("step at position {position} has id {found}, expected {expected}")]
    OutOfOrder {
        position: usize,
        expected: StepId,
        found: StepId,
    },
}

/// Ordered steps, numbered `1..=n` without gaps.
#[derive(Debug, Clone, Copy)]
pub struct StepTable {
    steps: &'static [StepDefinition],
}

static PROFILE_STEPS: &[StepDefinition] = &[
    StepDefinition {
        id: 1,
        label_key: "step-personal",
        label: "Dados pessoais",
        fields: &[
            ProfileField::FullName,
            ProfileField::Cpf,
            ProfileField::BirthDate,
            ProfileField::Phone,
            ProfileField::Email,
            ProfileField::PhotoUrl,
        ],
    },
    StepDefinition {
        id: 2,
        label_key: "step-documents",
        label: "Documentos e veículo",
        fields: &[
            ProfileField::LicenseNumber,
            ProfileField::LicenseCategory,
            ProfileField::LicenseExpiry,
            ProfileField::LicensePoints,
            ProfileField::WorkMode,
            ProfileField::VehiclePlate,
            ProfileField::PermitExpiry,
        ],
    },
    StepDefinition {
        id: 3,
        label_key: "step-address",
        label: "Endereço",
        fields: &[
            ProfileField::ZipCode,
            ProfileField::Street,
            ProfileField::StreetNumber,
            ProfileField::Complement,
            ProfileField::Neighborhood,
            ProfileField::City,
            ProfileField::State,
        ],
    },
    StepDefinition {
        id: 4,
        label_key: "step-experience",
        label: "Experiência profissional",
        fields: &[ProfileField::ExperienceYears, ProfileField::WorkHistory],
    },
    StepDefinition {
        id: 5,
        label_key: "step-rental",
        label: "Preferências de locação",
        fields: &[
            ProfileField::VehicleTypes,
            ProfileField::Transmission,
            ProfileField::FuelTypes,
            ProfileField::MaxWeeklyRate,
        ],
    },
    StepDefinition {
        id: 6,
        label_key: "step-qualifications",
        label: "Qualificações e referência",
        fields: &[
            ProfileField::LanguageLevel,
            ProfileField::ReferenceName,
            ProfileField::ReferencePhone,
            ProfileField::ReferenceRelationship,
        ],
    },
];

impl StepTable {
    pub fn new(steps: &'static [StepDefinition]) -> Result<Self, StepTableError> {
        if steps.is_empty() {
            return Err(StepTableError::Empty);
        }
        for (position, step) in steps.iter().enumerate() {
            let expected = (position + 1) as StepId;
            if step.id != expected {
                return Err(StepTableError::OutOfOrder {
                    position,
                    expected,
                    found: step.id,
                });
            }
        }
        Ok(Self { steps })
    }

    /// The six-step driver profile.
    pub fn profile() -> Self {
        Self {
            steps: PROFILE_STEPS,
        }
    }

    pub fn total(&self) -> StepId {
        self.steps.len() as StepId
    }

    pub fn get(&self, id: StepId) -> Option<&'static StepDefinition> {
        let steps: &'static [StepDefinition] = self.steps;
        id.checked_sub(1).and_then(|index| steps.get(index as usize))
    }

    pub fn contains(&self, id: StepId) -> bool {
        (1..=self.total()).contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static StepDefinition> {
        let steps: &'static [StepDefinition] = self.steps;
        steps.iter()
    }

    /// Every field governed by some step.
    pub fn fields(&self) -> impl Iterator<Item = ProfileField> {
        self.iter().flat_map(|step| step.fields.iter().copied())
    }
}

impl Default for StepTable {
    fn default() -> Self {
        Self::profile()
    }
}

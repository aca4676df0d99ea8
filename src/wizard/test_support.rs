use time::macros::date;

use crate::db::models::{
    FuelType, ProfileDraft, Qualifications, ReferenceContact, RentalPreferences, Transmission,
    VehicleType, WorkHistoryEntry, WorkMode,
};

/// An owner-driver draft that passes every rule.
pub fn complete_draft() -> ProfileDraft {
    ProfileDraft {
        full_name: Some("Maria Souza".to_string()),
        cpf: Some("529.982.247-25".to_string()),
        birth_date: Some(date!(1985 - 05 - 10)),
        phone: Some("(11) 98765-4321".to_string()),
        email: Some("maria.souza@example.com".to_string()),
        photo_url: Some("https://cdn.example.com/drivers/maria.jpg".to_string()),
        license_number: Some("12345678901".to_string()),
        license_category: Some("B".to_string()),
        license_expiry: Some(date!(2035 - 08 - 20)),
        license_points: Some(3),
        work_mode: Some(WorkMode::Owner),
        vehicle_plate: Some("ABC1D23".to_string()),
        permit_expiry: Some(date!(2034 - 12 - 31)),
        zip_code: Some("01310-100".to_string()),
        street: Some("Avenida Paulista".to_string()),
        street_number: Some("1000".to_string()),
        complement: None,
        neighborhood: Some("Bela Vista".to_string()),
        city: Some("São Paulo".to_string()),
        state: Some("SP".to_string()),
        experience_years: Some(8),
        work_history: vec![WorkHistoryEntry {
            employer: "Coopertáxi".to_string(),
            period: "2016-2022".to_string(),
            reason_for_leaving: None,
            has_outstanding_debt: false,
        }],
        rental_preferences: RentalPreferences {
            vehicle_types: vec![VehicleType::Sedan],
            transmission: Some(Transmission::Automatic),
            fuel_types: vec![FuelType::Flex, FuelType::Cng],
            max_weekly_rate: Some(900),
        },
        qualifications: Qualifications {
            defensive_driving: true,
            ..Default::default()
        },
        reference: ReferenceContact {
            name: Some("Carlos Souza".to_string()),
            phone: Some("(11) 91234-5678".to_string()),
            relationship: Some("Irmão".to_string()),
        },
    }
}

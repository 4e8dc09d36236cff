//! Shared fixtures for the end-to-end tests.

pub mod program {
    use jiff::civil::{Date, date};
    use vermi_sources::{InMemorySource, ReactorRecord, ReactorStatus, SchoolRecord};

    /// Two schools with a mix of filled, empty, and measured reactors.
    #[must_use]
    pub fn two_schools() -> InMemorySource {
        let schools = vec![
            SchoolRecord {
                id: "north".into(),
                name: "North Primary".into(),
                established_on: Some(date(2023, 2, 1)),
            },
            SchoolRecord {
                id: "south".into(),
                name: "South Primary".into(),
                established_on: None,
            },
        ];

        let reactors = vec![
            reactor("n1", "north", Some(100.0), Some(date(2023, 11, 20))),
            reactor("n2", "north", Some(100.0), None),
            ReactorRecord {
                height_cm: Some(40.0),
                width_cm: Some(50.0),
                length_cm: Some(50.0),
                ..reactor("s1", "south", None, Some(date(2024, 2, 5)))
            },
            reactor("s2", "south", Some(60.0), Some(date(2024, 9, 30))),
        ];

        InMemorySource::new(schools, reactors)
    }

    #[must_use]
    pub fn reactor(
        id: &str,
        school_id: &str,
        capacity_liters: Option<f64>,
        fill_date: Option<Date>,
    ) -> ReactorRecord {
        ReactorRecord {
            id: id.into(),
            school_id: school_id.into(),
            capacity_liters,
            height_cm: None,
            width_cm: None,
            length_cm: None,
            fill_date,
            harvest_date: None,
            status: if fill_date.is_some() {
                ReactorStatus::Full
            } else {
                ReactorStatus::Active
            },
        }
    }
}

pub mod settings {
    /// A configuration touching every section.
    pub const FULL: &str = r#"
[scenario.landfill]
temperature_c = 25.0
doc = 0.15

[scenario.composting]
moisture = 0.85

[scenario.gwp]
report = "ar6"
horizon = "20"

[scenario.horizon]
distributed = true
years = 20
decay_rate = 0.06

[price]
fallback_price_per_tonne = 85.50
currency = "EUR"
fallback_exchange_rate = 5.50
reporting_currency = "BRL"
max_age = "PT6H"

[data]
density_kg_per_l = 0.5
fallback_capacity_liters = 100.0
"#;
}

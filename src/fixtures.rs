//! Shared test family.
//!
//! ```text
//! 1 गद्दर (Gaddar Pandey, 1880)
//! ├─ 2 रामदत्त (Ramdatt, 1905)
//! │  ├─ 5 राहुल (Rahul, 1930)
//! │  │  ├─ 8 अन्वेषा (Anvesha, 1950)
//! │  │  └─ 9 विनोद (Vinod, 1955)
//! │  │     └─ 11 माही (Mahi, 1980)
//! │  └─ 6 सिद्धार्थ (Siddharth, 1935)
//! ├─ 3 कृष्णचंद्र (Krishnachandra, 1910)
//! │  └─ 7 मोहन (Mohan, 1940)
//! │     └─ 10 सुरेश (Suresh, 1960)
//! │        └─ 12 दीपक (Deepak, year unknown)
//! └─ 4 तारा (Tara, 1915)
//! ```

use vanshavali_types::{PersonId, PersonRecord};

use crate::index::PersonIndex;
use crate::tree::build_tree;

pub(crate) fn record(
    id: PersonId,
    name: &str,
    name_en: Option<&str>,
    birth_year: Option<i32>,
    generation: u32,
    parent_id: Option<PersonId>,
) -> PersonRecord {
    PersonRecord {
        id,
        name: name.to_string(),
        name_en: name_en.map(str::to_string),
        birth_year,
        generation,
        parent_id,
    }
}

pub(crate) fn pandey_records() -> Vec<PersonRecord> {
    vec![
        record(1, "गद्दर पाण्डेय", Some("Gaddar Pandey"), Some(1880), 1, None),
        record(2, "रामदत्त पाण्डेय", Some("Ramdatt Pandey"), Some(1905), 2, Some(1)),
        record(3, "कृष्णचंद्र पाण्डेय", Some("Krishnachandra Pandey"), Some(1910), 2, Some(1)),
        record(4, "तारा पाण्डेय", Some("Tara Pandey"), Some(1915), 2, Some(1)),
        record(5, "राहुल पाण्डेय", Some("Rahul Pandey"), Some(1930), 3, Some(2)),
        record(6, "सिद्धार्थ पाण्डेय", Some("Siddharth Pandey"), Some(1935), 3, Some(2)),
        record(7, "मोहन पाण्डेय", Some("Mohan Pandey"), Some(1940), 3, Some(3)),
        record(8, "अन्वेषा पाण्डेय", Some("Anvesha Pandey"), Some(1950), 4, Some(5)),
        record(9, "विनोद पाण्डेय", Some("Vinod Pandey"), Some(1955), 4, Some(5)),
        record(10, "सुरेश पाण्डेय", Some("Suresh Pandey"), Some(1960), 4, Some(7)),
        record(11, "माही पाण्डेय", Some("Mahi Pandey"), Some(1980), 5, Some(9)),
        record(12, "दीपक पाण्डेय", Some("Deepak Pandey"), None, 5, Some(10)),
    ]
}

pub(crate) fn pandey_index() -> PersonIndex {
    let built = build_tree(&pandey_records()).expect("fixture builds");
    PersonIndex::from_tree(&built.root)
}

//! Service-category heuristic for marker colors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker category, in match priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Dental,
    MentalHealth,
    Pediatric,
    Pharmacy,
    Vision,
    Medical,
}

/// Keywords per category, checked in this order. First hit wins.
const RULES: [(Category, &[&str]); 5] = [
    (Category::Dental, &["dental", "dentist"]),
    (Category::MentalHealth, &["mental", "behavioral", "behavioural", "counsel", "psych"]),
    (Category::Pediatric, &["pediatric", "paediatric", "child", "kid"]),
    (Category::Pharmacy, &["pharmacy"]),
    (Category::Vision, &["vision", "eye", "optometr"]),
];

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Dental,
        Category::MentalHealth,
        Category::Pediatric,
        Category::Pharmacy,
        Category::Vision,
        Category::Medical,
    ];

    /// Marker fill color.
    pub fn color(self) -> &'static str {
        match self {
            Category::Dental => "#0EA5E9",
            Category::MentalHealth => "#8B5CF6",
            Category::Pediatric => "#F59E0B",
            Category::Pharmacy => "#10B981",
            Category::Vision => "#EC4899",
            Category::Medical => "#EF4444",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Dental => "Dental",
            Category::MentalHealth => "Mental health",
            Category::Pediatric => "Pediatric",
            Category::Pharmacy => "Pharmacy",
            Category::Vision => "Vision",
            Category::Medical => "Medical",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Categorize a clinic by case-insensitive substring match over its name
/// and service tags.
///
/// # Example
/// ```
/// use clinicfinder_map::{classify, Category};
///
/// assert_eq!(classify("Smile Dental Center", &[]), Category::Dental);
/// assert_eq!(classify("Northside", &["Behavioral Health".to_string()]), Category::MentalHealth);
/// assert_eq!(classify("Northside", &[]), Category::Medical);
/// ```
pub fn classify(name: &str, services: &[String]) -> Category {
    let mut haystack = name.to_lowercase();
    for service in services {
        haystack.push(' ');
        haystack.push_str(&service.to_lowercase());
    }

    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| haystack.contains(k)))
        .map_or(Category::Medical, |(category, _)| *category)
}

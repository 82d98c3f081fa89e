use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::CarDraft;

pub const BRANDS: &[&str] = &[
    "Volvo", "Toyota", "BMW", "Ford", "Nissan", "Hyundai", "Audi", "Mazda", "Kia", "Volkswagen",
];

pub const MODELS: &[&str] = &[
    "XC 90", "Camry", "X5", "Mustang", "Qashqai", "Elantra", "Q7", "CX-5", "Soul", "Passat",
];

pub const COLORS: &[&str] = &[
    "#DC143C", "#1E90FF", "#00FF00", "#2F4F4F", "#87CEEB", "#C0C0C0", "#FFD700", "#FF8C00",
    "#A0522D", "#4B0082",
];

/// `count` random "{brand} {model}" cars.
pub fn random_cars<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<CarDraft> {
    (0..count)
        .map(|_| {
            let brand = BRANDS.choose(rng).copied().unwrap_or("Volvo");
            let model = MODELS.choose(rng).copied().unwrap_or("XC 90");
            let color = COLORS.choose(rng).copied().unwrap_or("#DC143C");
            CarDraft {
                name: format!("{} {}", brand, model),
                color: color.to_string(),
            }
        })
        .collect()
}

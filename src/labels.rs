pub const UNKNOWN_CROP: &str = "Unknown";

/// Crop names indexed by `label - 1`.
pub const CROP_NAMES: [&str; 22] = [
    "Rice",
    "Maize",
    "Jute",
    "Cotton",
    "Coconut",
    "Papaya",
    "Orange",
    "Apple",
    "Muskmelon",
    "Watermelon",
    "Grapes",
    "Mango",
    "Banana",
    "Pomegranate",
    "Lentil",
    "Blackgram",
    "Mungbean",
    "Mothbeans",
    "Pigeonpeas",
    "Kidneybeans",
    "Chickpea",
    "Coffee",
];

pub fn crop_name(label: i64) -> &'static str {
    usize::try_from(label)
        .ok()
        .and_then(|l| l.checked_sub(1))
        .and_then(|i| CROP_NAMES.get(i))
        .copied()
        .unwrap_or(UNKNOWN_CROP)
}

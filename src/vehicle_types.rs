//! Vehicle type label harmonization
//! Maps the free-text vehicle type labels found in trip spreadsheets to the
//! canonical class names used by fleet definitions

use std::collections::HashMap;
use std::sync::LazyLock;

/// Alias table - keys are folded labels (see [`fold_label`])
pub static VEHICLE_TYPE_ALIASES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    // Three-quarter trucks
    m.insert("3/4", "3/4");
    m.insert("3-4", "3/4");
    m.insert("34", "3/4");
    m.insert("tres quartos", "3/4");
    m.insert("caminhao 3/4", "3/4");

    // Light semi-trailers
    m.insert("semi leve", "Semi Leve");
    m.insert("semileve", "Semi Leve");
    m.insert("semi-leve", "Semi Leve");

    // Urban cargo vehicles
    m.insert("vuc", "VUC");
    m.insert("veiculo urbano de carga", "VUC");

    // Vans
    m.insert("fiorino", "Fiorino");
    m.insert("fiat fiorino", "Fiorino");

    // Heavier classes that show up in history files
    m.insert("toco", "Toco");
    m.insert("truck", "Truck");
    m.insert("carreta", "Carreta");

    m
});

/// Lower-case, strip accents and collapse inner whitespace
pub fn fold_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .map(strip_accent)
        .flat_map(char::to_lowercase)
        .collect()
}

fn strip_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        _ => c,
    }
}

/// Canonical vehicle type for a label; unknown labels are kept trimmed as-is
pub fn canonical_vehicle_type(label: &str) -> String {
    let folded = fold_label(label);
    VEHICLE_TYPE_ALIASES
        .get(folded.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| label.split_whitespace().collect::<Vec<_>>().join(" "))
}

//! Brazilian federative units: two-letter code and canonical full name.

/// (code, canonical name)
pub const BR_STATES: [(&str, &str); 27] = [
    ("AC", "Acre"),
    ("AL", "Alagoas"),
    ("AP", "Amapá"),
    ("AM", "Amazonas"),
    ("BA", "Bahia"),
    ("CE", "Ceará"),
    ("DF", "Distrito Federal"),
    ("ES", "Espírito Santo"),
    ("GO", "Goiás"),
    ("MA", "Maranhão"),
    ("MT", "Mato Grosso"),
    ("MS", "Mato Grosso do Sul"),
    ("MG", "Minas Gerais"),
    ("PA", "Pará"),
    ("PB", "Paraíba"),
    ("PR", "Paraná"),
    ("PE", "Pernambuco"),
    ("PI", "Piauí"),
    ("RJ", "Rio de Janeiro"),
    ("RN", "Rio Grande do Norte"),
    ("RS", "Rio Grande do Sul"),
    ("RO", "Rondônia"),
    ("RR", "Roraima"),
    ("SC", "Santa Catarina"),
    ("SP", "São Paulo"),
    ("SE", "Sergipe"),
    ("TO", "Tocantins"),
];

/// Uppercases and strips Portuguese diacritics so "São Paulo", "SAO PAULO"
/// and "sao paulo" compare equal.
fn fold(input: &str) -> String {
    input
        .trim()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'Á' | 'À' | 'Â' | 'Ã' => 'A',
            'é' | 'ê' | 'É' | 'Ê' => 'E',
            'í' | 'Í' => 'I',
            'ó' | 'ô' | 'õ' | 'Ó' | 'Ô' | 'Õ' => 'O',
            'ú' | 'ü' | 'Ú' | 'Ü' => 'U',
            'ç' | 'Ç' => 'C',
            other => other.to_ascii_uppercase(),
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn lookup(input: &str) -> Option<(&'static str, &'static str)> {
    let folded = fold(input);
    if folded.is_empty() {
        return None;
    }
    BR_STATES
        .iter()
        .find(|(code, name)| *code == folded || fold(name) == folded)
        .copied()
}

/// Maps a code or a free-text name to the canonical full name.
///
/// Unmapped values pass through unchanged; empty input yields `""`.
pub fn normalize_state_name(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }
    match lookup(input) {
        Some((_, name)) => name.to_string(),
        None => input.to_string(),
    }
}

/// Reverse lookup: two-letter code for a code or name, if known.
pub fn state_code(input: &str) -> Option<&'static str> {
    lookup(input).map(|(code, _)| code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_map_to_full_names() {
        assert_eq!(normalize_state_name("SP"), "São Paulo");
        assert_eq!(normalize_state_name(" rj "), "Rio de Janeiro");
        assert_eq!(normalize_state_name("DF"), "Distrito Federal");
    }

    #[test]
    fn test_free_text_without_accents() {
        assert_eq!(normalize_state_name("SAO PAULO"), "São Paulo");
        assert_eq!(normalize_state_name("ceara"), "Ceará");
        assert_eq!(normalize_state_name("Mato  Grosso do Sul"), "Mato Grosso do Sul");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for (_, name) in BR_STATES {
            assert_eq!(normalize_state_name(name), name);
            let once = normalize_state_name(name);
            assert_eq!(normalize_state_name(&once), once);
        }
    }

    #[test]
    fn test_unmapped_passes_through() {
        assert_eq!(normalize_state_name("Exterior"), "Exterior");
        assert_eq!(normalize_state_name(""), "");
        assert_eq!(normalize_state_name("   "), "");
    }

    #[test]
    fn test_state_code() {
        assert_eq!(state_code("São Paulo"), Some("SP"));
        assert_eq!(state_code("pr"), Some("PR"));
        assert_eq!(state_code("Lisboa"), None);
    }
}
